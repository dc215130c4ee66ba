use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;

use crate::errors::Result;
use crate::events::{Event, EventStore};
use crate::lifecycle::Payment;
use crate::store::PaymentStore;
use crate::types::PaymentStatus;

/// batch pass that re-derives time-dependent status without other changes
///
/// Run opportunistically before any read that must reflect the current
/// date. Idempotent, and each record's transition is independent of every
/// other record's.
pub struct StatusSweeper<'a> {
    time: &'a SafeTimeProvider,
}

impl<'a> StatusSweeper<'a> {
    pub fn new(time: &'a SafeTimeProvider) -> Self {
        Self { time }
    }

    /// the pure transition rule applied per payment
    pub fn needs_past_due_transition(payment: &Payment, today: NaiveDate) -> bool {
        payment.status == PaymentStatus::Upcoming
            && payment.due_date < today
            && payment.actual_date.is_none()
    }

    /// sweep a batch of records in place, returning the transition count
    pub fn sweep(&self, payments: &mut [Payment], events: &mut EventStore) -> usize {
        let today = self.time.now().date_naive();
        let mut transitioned = 0;

        for payment in payments.iter_mut() {
            if Self::needs_past_due_transition(payment, today) {
                payment.status = PaymentStatus::PastDue;
                events.emit(Event::PaymentMarkedPastDue {
                    payment_id: payment.id,
                    due_date: payment.due_date,
                    timestamp: self.time.now(),
                });
                transitioned += 1;
            }
        }

        transitioned
    }

    /// store-backed sweep over one account's records, writing back only
    /// the records that transitioned
    pub fn sweep_account(
        &self,
        store: &mut dyn PaymentStore,
        tenant_id: &str,
        account_id: &str,
        events: &mut EventStore,
    ) -> Result<usize> {
        let today = self.time.now().date_naive();
        let mut transitioned = 0;

        for mut payment in store.find_by_account(tenant_id, account_id) {
            if Self::needs_past_due_transition(&payment, today) {
                payment.status = PaymentStatus::PastDue;
                events.emit(Event::PaymentMarkedPastDue {
                    payment_id: payment.id,
                    due_date: payment.due_date,
                    timestamp: self.time.now(),
                });
                store.update(payment)?;
                transitioned += 1;
            }
        }

        Ok(transitioned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use crate::store::InMemoryPaymentStore;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use uuid::Uuid;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn test_time() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
        ))
    }

    fn payment(status: PaymentStatus, due: NaiveDate, account_id: &str) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            tenant_id: "tenant-1".to_string(),
            account_id: account_id.to_string(),
            due_date: due,
            scheduled_amount: Money::from_major(100),
            status,
            actual_amount: None,
            actual_date: None,
            remaining_balance: None,
            partial_payments: Vec::new(),
            payoff_plan: None,
        }
    }

    #[test]
    fn test_sweep_transitions_only_overdue_upcoming() {
        let time = test_time();
        let sweeper = StatusSweeper::new(&time);
        let mut events = EventStore::new();

        let mut payments = vec![
            payment(PaymentStatus::Upcoming, ymd(2024, 6, 1), "a"), // overdue
            payment(PaymentStatus::Upcoming, ymd(2024, 6, 15), "a"), // due today, not past
            payment(PaymentStatus::Upcoming, ymd(2024, 7, 1), "a"), // future
            payment(PaymentStatus::Partial, ymd(2024, 6, 1), "a"),
            payment(PaymentStatus::Paid, ymd(2024, 6, 1), "a"),
            payment(PaymentStatus::PastDue, ymd(2024, 5, 1), "a"),
        ];

        let transitioned = sweeper.sweep(&mut payments, &mut events);

        assert_eq!(transitioned, 1);
        assert_eq!(payments[0].status, PaymentStatus::PastDue);
        assert_eq!(payments[1].status, PaymentStatus::Upcoming);
        assert_eq!(payments[2].status, PaymentStatus::Upcoming);
        assert_eq!(payments[3].status, PaymentStatus::Partial);
        assert_eq!(payments[4].status, PaymentStatus::Paid);
        assert_eq!(events.events().len(), 1);
    }

    #[test]
    fn test_sweep_is_idempotent() {
        let time = test_time();
        let sweeper = StatusSweeper::new(&time);
        let mut events = EventStore::new();

        let mut payments = vec![
            payment(PaymentStatus::Upcoming, ymd(2024, 6, 1), "a"),
            payment(PaymentStatus::Upcoming, ymd(2024, 5, 1), "a"),
        ];

        assert_eq!(sweeper.sweep(&mut payments, &mut events), 2);
        assert_eq!(sweeper.sweep(&mut payments, &mut events), 0);
    }

    #[test]
    fn test_sweep_skips_records_with_actual_date() {
        let time = test_time();
        let sweeper = StatusSweeper::new(&time);
        let mut events = EventStore::new();

        let mut settled_early = payment(PaymentStatus::Upcoming, ymd(2024, 6, 1), "a");
        settled_early.actual_date = Some(ymd(2024, 5, 30));
        let mut payments = vec![settled_early];

        assert_eq!(sweeper.sweep(&mut payments, &mut events), 0);
        assert_eq!(payments[0].status, PaymentStatus::Upcoming);
    }

    #[test]
    fn test_store_backed_sweep_scopes_to_account() {
        let time = test_time();
        let sweeper = StatusSweeper::new(&time);
        let mut events = EventStore::new();
        let mut store = InMemoryPaymentStore::new();

        let overdue_a = payment(PaymentStatus::Upcoming, ymd(2024, 6, 1), "a");
        let overdue_b = payment(PaymentStatus::Upcoming, ymd(2024, 6, 1), "b");
        let id_a = overdue_a.id;
        let id_b = overdue_b.id;
        store.create_many(vec![overdue_a, overdue_b]).unwrap();

        let transitioned = sweeper
            .sweep_account(&mut store, "tenant-1", "a", &mut events)
            .unwrap();

        assert_eq!(transitioned, 1);
        assert_eq!(
            store.find_by_id(id_a).unwrap().status,
            PaymentStatus::PastDue
        );
        assert_eq!(
            store.find_by_id(id_b).unwrap().status,
            PaymentStatus::Upcoming
        );
    }
}
