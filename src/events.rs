use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::{PaymentId, PaymentStatus};

/// all events emitted by lifecycle operations and status sweeps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    PartialPaymentApplied {
        payment_id: PaymentId,
        partial_payment_id: Uuid,
        amount: Money,
        remaining_balance: Money,
        status: PaymentStatus,
        timestamp: DateTime<Utc>,
    },
    PaymentSettled {
        payment_id: PaymentId,
        actual_amount: Money,
        actual_date: NaiveDate,
        timestamp: DateTime<Utc>,
    },
    PayoffPlanCreated {
        payment_id: PaymentId,
        total_past_due: Money,
        target_payoff_date: NaiveDate,
        planned_payment_count: usize,
        timestamp: DateTime<Utc>,
    },
    PlannedPaymentRecorded {
        payment_id: PaymentId,
        planned_payment_id: Uuid,
        actual_amount: Money,
        percent_complete: u32,
        timestamp: DateTime<Utc>,
    },
    PayoffPlanCompleted {
        payment_id: PaymentId,
        total_paid: Money,
        timestamp: DateTime<Utc>,
    },
    PaymentMarkedPastDue {
        payment_id: PaymentId,
        due_date: NaiveDate,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
