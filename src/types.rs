use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{EngineError, Result};

/// unique identifier for a persisted payment
pub type PaymentId = Uuid;

/// lifecycle status of a persisted payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// due date in the future, nothing received
    Upcoming,
    /// due date passed with nothing received
    PastDue,
    /// partially satisfied by one or more partial payments
    Partial,
    /// fully satisfied
    Paid,
}

/// status of a single planned catch-up payment inside a payoff plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlannedPaymentStatus {
    Pending,
    Paid,
}

/// fixed-rate loan terms supplied by the caller, not persisted here
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub annual_rate_percent: Decimal,
    pub term_months: u32,
    /// defaults to principal when absent
    pub current_balance: Option<Money>,
    /// caller-fixed payment amount instead of the computed annuity payment
    pub override_payment_amount: Option<Money>,
}

impl LoanTerms {
    pub fn new(principal: Money, annual_rate_percent: Decimal, term_months: u32) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_months,
            current_balance: None,
            override_payment_amount: None,
        }
    }

    /// balance the projection starts from
    pub fn starting_balance(&self) -> Money {
        self.current_balance.unwrap_or(self.principal)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.principal.is_positive() {
            return Err(EngineError::InvalidLoanTerms {
                message: format!("principal must be positive, got {}", self.principal),
            });
        }

        if self.annual_rate_percent.is_sign_negative() {
            return Err(EngineError::InvalidLoanTerms {
                message: format!("annual rate must not be negative, got {}", self.annual_rate_percent),
            });
        }

        if self.term_months < 1 {
            return Err(EngineError::InvalidLoanTerms {
                message: "term must be at least one month".to_string(),
            });
        }

        Ok(())
    }
}

/// recurrence rule for generating due-date sequences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecurrenceRule {
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    SemiAnnually,
    Annually,
    OneTime,
    Custom(CustomRecurrence),
}

/// custom recurrence kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomRecurrence {
    /// several fixed days in every month, e.g. the 1st and the 15th
    MultipleDatesPerMonth { days_of_month: Vec<u32> },
    /// one fixed day every month, clamped to the month's length
    DayOfMonth { day: u32 },
    /// a weekday repeating every n weeks
    DayOfWeek { weekday: Weekday, every_n_weeks: u32 },
    /// a fixed day interval, optionally from an explicit anchor
    Interval {
        every_n_days: u32,
        anchor_date: Option<NaiveDate>,
    },
}

impl RecurrenceRule {
    pub fn validate(&self) -> Result<()> {
        match self {
            RecurrenceRule::Custom(custom) => custom.validate(),
            _ => Ok(()),
        }
    }
}

impl CustomRecurrence {
    pub fn validate(&self) -> Result<()> {
        match self {
            CustomRecurrence::MultipleDatesPerMonth { days_of_month } => {
                if days_of_month.is_empty() {
                    return Err(EngineError::InvalidRecurrenceRule {
                        message: "days_of_month must not be empty".to_string(),
                    });
                }
                for &day in days_of_month {
                    if !(1..=31).contains(&day) {
                        return Err(EngineError::InvalidRecurrenceRule {
                            message: format!("day of month out of range: {day}"),
                        });
                    }
                }
                Ok(())
            }
            CustomRecurrence::DayOfMonth { day } => {
                if !(1..=31).contains(day) {
                    return Err(EngineError::InvalidRecurrenceRule {
                        message: format!("day of month out of range: {day}"),
                    });
                }
                Ok(())
            }
            CustomRecurrence::DayOfWeek { every_n_weeks, .. } => {
                if *every_n_weeks < 1 {
                    return Err(EngineError::InvalidRecurrenceRule {
                        message: "every_n_weeks must be at least 1".to_string(),
                    });
                }
                Ok(())
            }
            CustomRecurrence::Interval { every_n_days, .. } => {
                if *every_n_days < 1 {
                    return Err(EngineError::InvalidRecurrenceRule {
                        message: "every_n_days must be at least 1".to_string(),
                    });
                }
                Ok(())
            }
        }
    }
}

/// principal/interest split for a single amortized payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationBreakdown {
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub balance_after: Money,
}

/// a future payment materialized by the schedule projector
///
/// Ephemeral: computed on demand and handed to the persistence layer
/// to become payment records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPayment {
    pub sequence_number: u32,
    pub due_date: NaiveDate,
    pub scheduled_amount: Money,
    pub breakdown: Option<AmortizationBreakdown>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_loan_terms_validation() {
        let terms = LoanTerms::new(Money::from_major(10_000), dec!(5), 24);
        assert!(terms.validate().is_ok());

        let zero_principal = LoanTerms::new(Money::ZERO, dec!(5), 24);
        assert!(matches!(
            zero_principal.validate(),
            Err(EngineError::InvalidLoanTerms { .. })
        ));

        let negative_rate = LoanTerms::new(Money::from_major(10_000), dec!(-1), 24);
        assert!(matches!(
            negative_rate.validate(),
            Err(EngineError::InvalidLoanTerms { .. })
        ));

        let zero_term = LoanTerms::new(Money::from_major(10_000), dec!(5), 0);
        assert!(matches!(
            zero_term.validate(),
            Err(EngineError::InvalidLoanTerms { .. })
        ));
    }

    #[test]
    fn test_starting_balance_defaults_to_principal() {
        let mut terms = LoanTerms::new(Money::from_major(10_000), dec!(5), 24);
        assert_eq!(terms.starting_balance(), Money::from_major(10_000));

        terms.current_balance = Some(Money::from_major(7_500));
        assert_eq!(terms.starting_balance(), Money::from_major(7_500));
    }

    #[test]
    fn test_custom_rule_validation() {
        let empty = CustomRecurrence::MultipleDatesPerMonth { days_of_month: vec![] };
        assert!(matches!(
            empty.validate(),
            Err(EngineError::InvalidRecurrenceRule { .. })
        ));

        let out_of_range = CustomRecurrence::DayOfMonth { day: 32 };
        assert!(matches!(
            out_of_range.validate(),
            Err(EngineError::InvalidRecurrenceRule { .. })
        ));

        let zero_weeks = CustomRecurrence::DayOfWeek {
            weekday: Weekday::Mon,
            every_n_weeks: 0,
        };
        assert!(matches!(
            zero_weeks.validate(),
            Err(EngineError::InvalidRecurrenceRule { .. })
        ));

        let zero_days = CustomRecurrence::Interval {
            every_n_days: 0,
            anchor_date: None,
        };
        assert!(matches!(
            zero_days.validate(),
            Err(EngineError::InvalidRecurrenceRule { .. })
        ));

        let ok = CustomRecurrence::MultipleDatesPerMonth { days_of_month: vec![1, 8, 20] };
        assert!(ok.validate().is_ok());
    }
}
