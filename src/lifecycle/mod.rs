pub mod payoff;
pub mod sweeper;

use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::LifecyclePolicy;
use crate::decimal::Money;
use crate::errors::{EngineError, Result};
use crate::events::{Event, EventStore};
use crate::types::{PaymentId, PaymentStatus, ProjectedPayment};

pub use payoff::{
    PayoffPlan, PayoffPlanInput, PayoffProgress, PlannedPayment, PlannedPaymentInput,
};
pub use sweeper::StatusSweeper;

/// a persisted scheduled payment, mutated only through the lifecycle manager
///
/// Tenant and account identifiers are opaque: scoping inputs and outputs
/// to the right tenant is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub tenant_id: String,
    pub account_id: String,
    pub due_date: NaiveDate,
    pub scheduled_amount: Money,
    pub status: PaymentStatus,
    pub actual_amount: Option<Money>,
    pub actual_date: Option<NaiveDate>,
    pub remaining_balance: Option<Money>,
    pub partial_payments: Vec<PartialPayment>,
    pub payoff_plan: Option<PayoffPlan>,
}

impl Payment {
    /// convert a projected payment into a persistable upcoming record
    pub fn from_projection(
        projection: &ProjectedPayment,
        tenant_id: impl Into<String>,
        account_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id: tenant_id.into(),
            account_id: account_id.into(),
            due_date: projection.due_date,
            scheduled_amount: projection.scheduled_amount,
            status: PaymentStatus::Upcoming,
            actual_amount: None,
            actual_date: None,
            remaining_balance: None,
            partial_payments: Vec::new(),
            payoff_plan: None,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.status == PaymentStatus::Paid
    }

    /// sum of all partial payments applied so far
    pub fn total_partial_paid(&self) -> Money {
        self.partial_payments
            .iter()
            .map(|p| p.amount)
            .fold(Money::ZERO, |acc, x| acc + x)
    }
}

/// a sub-payment applied against a single scheduled payment
///
/// Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialPayment {
    pub id: Uuid,
    pub date: NaiveDate,
    pub amount: Money,
    pub method: Option<String>,
    pub note: Option<String>,
}

/// input for applying a partial payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialPaymentInput {
    pub date: NaiveDate,
    pub amount: Money,
    pub method: Option<String>,
    pub note: Option<String>,
}

/// state machine over a single payment record
///
/// Every operation validates fully before mutating, so a failure leaves
/// the caller's record untouched. The caller owns the read-modify-write
/// cycle against its store; the engine provides no locking.
pub struct PaymentLifecycleManager<'a> {
    time: &'a SafeTimeProvider,
    policy: LifecyclePolicy,
}

impl<'a> PaymentLifecycleManager<'a> {
    pub fn new(time: &'a SafeTimeProvider) -> Self {
        Self {
            time,
            policy: LifecyclePolicy::default(),
        }
    }

    pub fn with_policy(time: &'a SafeTimeProvider, policy: LifecyclePolicy) -> Self {
        Self { time, policy }
    }

    pub(crate) fn time(&self) -> &SafeTimeProvider {
        self.time
    }

    /// apply a partial payment and re-derive status and balances
    ///
    /// Returns the id of the appended partial payment.
    pub fn apply_partial_payment(
        &self,
        payment: &mut Payment,
        input: PartialPaymentInput,
        events: &mut EventStore,
    ) -> Result<Uuid> {
        if !input.amount.is_positive() {
            return Err(EngineError::InvalidAmount {
                amount: input.amount,
            });
        }

        if payment.is_settled() {
            return Err(EngineError::AlreadySettled { id: payment.id });
        }

        let new_total = payment.total_partial_paid() + input.amount;
        if new_total > payment.scheduled_amount && !self.policy.allow_overpayment {
            return Err(EngineError::InvalidAmount {
                amount: input.amount,
            });
        }

        let partial = PartialPayment {
            id: Uuid::new_v4(),
            date: input.date,
            amount: input.amount,
            method: input.method,
            note: input.note,
        };
        let partial_id = partial.id;
        payment.partial_payments.push(partial);

        let remaining = (payment.scheduled_amount - new_total).max(Money::ZERO);
        payment.actual_amount = Some(new_total);
        payment.remaining_balance = Some(remaining);

        if remaining.is_zero() {
            payment.status = PaymentStatus::Paid;
            payment.actual_date = Some(input.date);
            events.emit(Event::PaymentSettled {
                payment_id: payment.id,
                actual_amount: new_total,
                actual_date: input.date,
                timestamp: self.time.now(),
            });
        } else {
            payment.status = PaymentStatus::Partial;
        }

        events.emit(Event::PartialPaymentApplied {
            payment_id: payment.id,
            partial_payment_id: partial_id,
            amount: input.amount,
            remaining_balance: remaining,
            status: payment.status,
            timestamp: self.time.now(),
        });

        Ok(partial_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::TimeSource;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn test_time() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
        ))
    }

    fn upcoming_payment(scheduled: i64) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            tenant_id: "tenant-1".to_string(),
            account_id: "account-1".to_string(),
            due_date: ymd(2024, 7, 1),
            scheduled_amount: Money::from_major(scheduled),
            status: PaymentStatus::Upcoming,
            actual_amount: None,
            actual_date: None,
            remaining_balance: None,
            partial_payments: Vec::new(),
            payoff_plan: None,
        }
    }

    fn partial(amount: i64, day: u32) -> PartialPaymentInput {
        PartialPaymentInput {
            date: ymd(2024, 6, day),
            amount: Money::from_major(amount),
            method: Some("ach".to_string()),
            note: None,
        }
    }

    #[test]
    fn test_single_partial_payment() {
        let time = test_time();
        let manager = PaymentLifecycleManager::new(&time);
        let mut events = EventStore::new();
        let mut payment = upcoming_payment(100);

        manager
            .apply_partial_payment(&mut payment, partial(40, 1), &mut events)
            .unwrap();

        assert_eq!(payment.status, PaymentStatus::Partial);
        assert_eq!(payment.actual_amount, Some(Money::from_major(40)));
        assert_eq!(payment.remaining_balance, Some(Money::from_major(60)));
        assert!(payment.actual_date.is_none());
        assert_eq!(payment.partial_payments.len(), 1);
    }

    #[test]
    fn test_partial_payments_accumulate_to_paid() {
        let time = test_time();
        let manager = PaymentLifecycleManager::new(&time);
        let mut events = EventStore::new();
        let mut payment = upcoming_payment(100);

        manager
            .apply_partial_payment(&mut payment, partial(30, 1), &mut events)
            .unwrap();
        manager
            .apply_partial_payment(&mut payment, partial(30, 5), &mut events)
            .unwrap();
        manager
            .apply_partial_payment(&mut payment, partial(40, 10), &mut events)
            .unwrap();

        assert_eq!(payment.status, PaymentStatus::Paid);
        assert_eq!(payment.actual_amount, Some(Money::from_major(100)));
        assert_eq!(payment.remaining_balance, Some(Money::ZERO));
        assert_eq!(payment.actual_date, Some(ymd(2024, 6, 10)));
        assert_eq!(payment.total_partial_paid(), Money::from_major(100));

        let settled = events
            .events()
            .iter()
            .filter(|e| matches!(e, Event::PaymentSettled { .. }))
            .count();
        assert_eq!(settled, 1);
    }

    #[test]
    fn test_rejects_nonpositive_amount() {
        let time = test_time();
        let manager = PaymentLifecycleManager::new(&time);
        let mut events = EventStore::new();
        let mut payment = upcoming_payment(100);

        let result = manager.apply_partial_payment(&mut payment, partial(0, 1), &mut events);
        assert!(matches!(result, Err(EngineError::InvalidAmount { .. })));

        // record untouched on failure
        assert_eq!(payment.status, PaymentStatus::Upcoming);
        assert!(payment.partial_payments.is_empty());
        assert!(payment.actual_amount.is_none());
    }

    #[test]
    fn test_rejects_partial_on_settled_payment() {
        let time = test_time();
        let manager = PaymentLifecycleManager::new(&time);
        let mut events = EventStore::new();
        let mut payment = upcoming_payment(100);

        manager
            .apply_partial_payment(&mut payment, partial(100, 1), &mut events)
            .unwrap();
        assert_eq!(payment.status, PaymentStatus::Paid);

        let result = manager.apply_partial_payment(&mut payment, partial(10, 2), &mut events);
        assert!(matches!(result, Err(EngineError::AlreadySettled { .. })));

        // settlement date not overwritten
        assert_eq!(payment.actual_date, Some(ymd(2024, 6, 1)));
    }

    #[test]
    fn test_rejects_overpayment_by_default() {
        let time = test_time();
        let manager = PaymentLifecycleManager::new(&time);
        let mut events = EventStore::new();
        let mut payment = upcoming_payment(100);

        manager
            .apply_partial_payment(&mut payment, partial(80, 1), &mut events)
            .unwrap();

        let result = manager.apply_partial_payment(&mut payment, partial(30, 2), &mut events);
        assert!(matches!(result, Err(EngineError::InvalidAmount { .. })));
        assert_eq!(payment.status, PaymentStatus::Partial);
        assert_eq!(payment.remaining_balance, Some(Money::from_major(20)));
    }

    #[test]
    fn test_overpayment_allowed_by_policy() {
        let time = test_time();
        let manager = PaymentLifecycleManager::with_policy(
            &time,
            LifecyclePolicy {
                allow_overpayment: true,
            },
        );
        let mut events = EventStore::new();
        let mut payment = upcoming_payment(100);

        manager
            .apply_partial_payment(&mut payment, partial(80, 1), &mut events)
            .unwrap();
        manager
            .apply_partial_payment(&mut payment, partial(30, 2), &mut events)
            .unwrap();

        assert_eq!(payment.status, PaymentStatus::Paid);
        assert_eq!(payment.actual_amount, Some(Money::from_major(110)));
        assert_eq!(payment.remaining_balance, Some(Money::ZERO));
    }

    #[test]
    fn test_partial_on_past_due_payment() {
        let time = test_time();
        let manager = PaymentLifecycleManager::new(&time);
        let mut events = EventStore::new();
        let mut payment = upcoming_payment(100);
        payment.status = PaymentStatus::PastDue;

        manager
            .apply_partial_payment(&mut payment, partial(25, 20), &mut events)
            .unwrap();

        assert_eq!(payment.status, PaymentStatus::Partial);
    }

    #[test]
    fn test_from_projection() {
        let projection = ProjectedPayment {
            sequence_number: 1,
            due_date: ymd(2024, 8, 1),
            scheduled_amount: Money::from_major(250),
            breakdown: None,
        };

        let payment = Payment::from_projection(&projection, "tenant-1", "account-9");

        assert_eq!(payment.status, PaymentStatus::Upcoming);
        assert_eq!(payment.due_date, ymd(2024, 8, 1));
        assert_eq!(payment.scheduled_amount, Money::from_major(250));
        assert_eq!(payment.tenant_id, "tenant-1");
        assert_eq!(payment.account_id, "account-9");
        assert!(payment.partial_payments.is_empty());
    }
}
