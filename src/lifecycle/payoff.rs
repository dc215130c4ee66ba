use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{EngineError, Result};
use crate::events::{Event, EventStore};
use crate::lifecycle::{Payment, PaymentLifecycleManager};
use crate::types::{PaymentStatus, PlannedPaymentStatus};

/// a remediation schedule of catch-up payments for a past-due obligation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffPlan {
    pub created_date: NaiveDate,
    pub total_past_due: Money,
    pub target_payoff_date: NaiveDate,
    pub planned_payments: Vec<PlannedPayment>,
    pub progress: PayoffProgress,
}

impl PayoffPlan {
    /// re-derive progress aggregates from the planned payments
    fn recompute_progress(&mut self, today: NaiveDate) {
        let total_paid = self
            .planned_payments
            .iter()
            .filter(|p| p.status == PlannedPaymentStatus::Paid)
            .filter_map(|p| p.actual_amount)
            .fold(Money::ZERO, |acc, x| acc + x);

        let remaining = (self.total_past_due - total_paid).max(Money::ZERO);

        let percent_complete = (Decimal::from(100) * total_paid.as_decimal()
            / self.total_past_due.as_decimal())
        .round()
        .to_u32()
        .unwrap_or(0)
        .min(100);

        let on_track = !self
            .planned_payments
            .iter()
            .any(|p| p.status == PlannedPaymentStatus::Pending && p.planned_date < today);

        self.progress = PayoffProgress {
            total_paid,
            remaining,
            percent_complete,
            on_track,
        };
    }

    pub fn is_complete(&self) -> bool {
        self.planned_payments
            .iter()
            .all(|p| p.status == PlannedPaymentStatus::Paid)
            && self.progress.remaining.is_zero()
    }
}

/// a single catch-up payment inside a payoff plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedPayment {
    pub id: Uuid,
    pub planned_date: NaiveDate,
    pub planned_amount: Money,
    pub actual_date: Option<NaiveDate>,
    pub actual_amount: Option<Money>,
    pub status: PlannedPaymentStatus,
}

/// running progress of a payoff plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffProgress {
    pub total_paid: Money,
    pub remaining: Money,
    pub percent_complete: u32,
    pub on_track: bool,
}

/// input for creating a payoff plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffPlanInput {
    pub total_past_due: Money,
    pub target_payoff_date: NaiveDate,
    pub planned_payments: Vec<PlannedPaymentInput>,
}

/// input for a single planned payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedPaymentInput {
    pub planned_date: NaiveDate,
    pub planned_amount: Money,
}

impl<'a> PaymentLifecycleManager<'a> {
    /// attach a payoff plan to a past-due payment
    ///
    /// A plan is a remediation path for missed payments, not a substitute
    /// for normal payment, so the payment must be past due and the parent
    /// stays past due until the plan completes.
    pub fn create_payoff_plan(
        &self,
        payment: &mut Payment,
        input: PayoffPlanInput,
        events: &mut EventStore,
    ) -> Result<()> {
        if payment.status != PaymentStatus::PastDue {
            return Err(EngineError::InvalidState {
                current: format!("{:?}", payment.status),
                expected: "PastDue".to_string(),
            });
        }

        if payment.payoff_plan.is_some() {
            return Err(EngineError::InvalidState {
                current: "payoff plan already attached".to_string(),
                expected: "no payoff plan".to_string(),
            });
        }

        if !input.total_past_due.is_positive() {
            return Err(EngineError::InvalidAmount {
                amount: input.total_past_due,
            });
        }

        // an empty plan can never pay down a positive past-due balance
        if input.planned_payments.is_empty() {
            return Err(EngineError::InvalidAmount { amount: Money::ZERO });
        }

        for planned in &input.planned_payments {
            if !planned.planned_amount.is_positive() {
                return Err(EngineError::InvalidAmount {
                    amount: planned.planned_amount,
                });
            }
        }

        let planned_payments = input
            .planned_payments
            .into_iter()
            .map(|p| PlannedPayment {
                id: Uuid::new_v4(),
                planned_date: p.planned_date,
                planned_amount: p.planned_amount,
                actual_date: None,
                actual_amount: None,
                status: PlannedPaymentStatus::Pending,
            })
            .collect::<Vec<_>>();

        let planned_payment_count = planned_payments.len();

        payment.payoff_plan = Some(PayoffPlan {
            created_date: self.time().now().date_naive(),
            total_past_due: input.total_past_due,
            target_payoff_date: input.target_payoff_date,
            planned_payments,
            progress: PayoffProgress {
                total_paid: Money::ZERO,
                remaining: input.total_past_due,
                percent_complete: 0,
                on_track: true,
            },
        });

        events.emit(Event::PayoffPlanCreated {
            payment_id: payment.id,
            total_past_due: input.total_past_due,
            target_payoff_date: input.target_payoff_date,
            planned_payment_count,
            timestamp: self.time().now(),
        });

        Ok(())
    }

    /// record an actual payment against a planned payment and recompute
    /// plan progress, promoting the parent to paid when the plan completes
    pub fn record_planned_payment(
        &self,
        payment: &mut Payment,
        planned_payment_id: Uuid,
        actual_date: NaiveDate,
        actual_amount: Money,
        events: &mut EventStore,
    ) -> Result<()> {
        if !actual_amount.is_positive() {
            return Err(EngineError::InvalidAmount {
                amount: actual_amount,
            });
        }

        let today = self.time().now().date_naive();
        let payment_id = payment.id;

        let plan = payment
            .payoff_plan
            .as_mut()
            .ok_or_else(|| EngineError::InvalidState {
                current: "no payoff plan".to_string(),
                expected: "active payoff plan".to_string(),
            })?;

        let planned = plan
            .planned_payments
            .iter_mut()
            .find(|p| p.id == planned_payment_id)
            .ok_or(EngineError::NotFound {
                id: planned_payment_id,
            })?;

        if planned.status == PlannedPaymentStatus::Paid {
            return Err(EngineError::AlreadySettled {
                id: planned_payment_id,
            });
        }

        planned.status = PlannedPaymentStatus::Paid;
        planned.actual_date = Some(actual_date);
        planned.actual_amount = Some(actual_amount);

        plan.recompute_progress(today);

        let completed = plan.is_complete();
        let total_past_due = plan.total_past_due;
        let total_paid = plan.progress.total_paid;
        let percent_complete = plan.progress.percent_complete;

        events.emit(Event::PlannedPaymentRecorded {
            payment_id,
            planned_payment_id,
            actual_amount,
            percent_complete,
            timestamp: self.time().now(),
        });

        if completed {
            payment.status = PaymentStatus::Paid;
            payment.actual_amount = Some(total_past_due);
            payment.actual_date = Some(actual_date);
            payment.remaining_balance = Some(Money::ZERO);

            events.emit(Event::PayoffPlanCompleted {
                payment_id,
                total_paid,
                timestamp: self.time().now(),
            });
        }

        Ok(())
    }
}
