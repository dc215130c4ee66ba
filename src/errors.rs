use thiserror::Error;
use uuid::Uuid;

use crate::decimal::Money;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid loan terms: {message}")]
    InvalidLoanTerms {
        message: String,
    },

    #[error("invalid recurrence rule: {message}")]
    InvalidRecurrenceRule {
        message: String,
    },

    #[error("invalid amount: {amount}")]
    InvalidAmount {
        amount: Money,
    },

    #[error("invalid state: current {current}, expected {expected}")]
    InvalidState {
        current: String,
        expected: String,
    },

    #[error("already settled: {id}")]
    AlreadySettled {
        id: Uuid,
    },

    #[error("not found: {id}")]
    NotFound {
        id: Uuid,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
