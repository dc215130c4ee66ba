use std::collections::HashMap;

use uuid::Uuid;

use crate::errors::{EngineError, Result};
use crate::lifecycle::Payment;

/// persistence contract the engine consumes
///
/// Implementations own atomicity: two concurrent callers racing to update
/// the same payment must be serialized by the store (e.g. an optimistic
/// version check), not by the engine.
pub trait PaymentStore {
    /// persist a batch of newly projected payments
    fn create_many(&mut self, payments: Vec<Payment>) -> Result<()>;

    /// fetch a single payment
    fn find_by_id(&self, id: Uuid) -> Option<Payment>;

    /// fetch all payments for a tenant's account, ordered by due date
    fn find_by_account(&self, tenant_id: &str, account_id: &str) -> Vec<Payment>;

    /// write back a mutated payment
    fn update(&mut self, payment: Payment) -> Result<()>;
}

/// hashmap-backed store for tests and demos
#[derive(Debug, Default)]
pub struct InMemoryPaymentStore {
    payments: HashMap<Uuid, Payment>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self {
            payments: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.payments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }
}

impl PaymentStore for InMemoryPaymentStore {
    fn create_many(&mut self, payments: Vec<Payment>) -> Result<()> {
        for payment in payments {
            self.payments.insert(payment.id, payment);
        }
        Ok(())
    }

    fn find_by_id(&self, id: Uuid) -> Option<Payment> {
        self.payments.get(&id).cloned()
    }

    fn find_by_account(&self, tenant_id: &str, account_id: &str) -> Vec<Payment> {
        let mut results: Vec<Payment> = self
            .payments
            .values()
            .filter(|p| p.tenant_id == tenant_id && p.account_id == account_id)
            .cloned()
            .collect();
        results.sort_by_key(|p| (p.due_date, p.id));
        results
    }

    fn update(&mut self, payment: Payment) -> Result<()> {
        match self.payments.get_mut(&payment.id) {
            Some(existing) => {
                *existing = payment;
                Ok(())
            }
            None => Err(EngineError::NotFound { id: payment.id }),
        }
    }
}
