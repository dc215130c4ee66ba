/// serialization support for payment records
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::lifecycle::Payment;
use crate::types::{PaymentId, PaymentStatus, PlannedPaymentStatus};

/// serializable snapshot of a payment with derived aggregates
#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentView {
    pub id: PaymentId,
    pub tenant_id: String,
    pub account_id: String,
    pub due_date: NaiveDate,
    pub scheduled_amount: Money,
    pub status: PaymentStatus,
    pub actual_amount: Option<Money>,
    pub actual_date: Option<NaiveDate>,
    pub remaining_balance: Option<Money>,
    pub partial_payment_count: usize,
    pub total_partial_paid: Money,
    pub payoff_plan: Option<PayoffPlanView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PayoffPlanView {
    pub created_date: NaiveDate,
    pub total_past_due: Money,
    pub target_payoff_date: NaiveDate,
    pub planned_payment_count: usize,
    pub paid_payment_count: usize,
    pub total_paid: Money,
    pub remaining: Money,
    pub percent_complete: u32,
    pub on_track: bool,
}

impl PaymentView {
    pub fn from_payment(payment: &Payment) -> Self {
        PaymentView {
            id: payment.id,
            tenant_id: payment.tenant_id.clone(),
            account_id: payment.account_id.clone(),
            due_date: payment.due_date,
            scheduled_amount: payment.scheduled_amount,
            status: payment.status,
            actual_amount: payment.actual_amount,
            actual_date: payment.actual_date,
            remaining_balance: payment.remaining_balance,
            partial_payment_count: payment.partial_payments.len(),
            total_partial_paid: payment.total_partial_paid(),
            payoff_plan: payment.payoff_plan.as_ref().map(|plan| PayoffPlanView {
                created_date: plan.created_date,
                total_past_due: plan.total_past_due,
                target_payoff_date: plan.target_payoff_date,
                planned_payment_count: plan.planned_payments.len(),
                paid_payment_count: plan
                    .planned_payments
                    .iter()
                    .filter(|p| p.status == PlannedPaymentStatus::Paid)
                    .count(),
                total_paid: plan.progress.total_paid,
                remaining: plan.progress.remaining,
                percent_complete: plan.progress.percent_complete,
                on_track: plan.progress.on_track,
            }),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// parse from json string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
