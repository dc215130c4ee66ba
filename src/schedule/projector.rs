use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{EngineError, Result};
use crate::schedule::amortization::AmortizationCalculator;
use crate::schedule::recurrence::RecurrenceGenerator;
use crate::types::{LoanTerms, ProjectedPayment, RecurrenceRule};

/// how scheduled amounts are derived for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScheduleBasis {
    /// the same amount on every due date
    Flat(Money),
    /// amortized payments threading a running balance through the loan terms
    Amortized(LoanTerms),
}

/// materializes future scheduled payments for an account
///
/// Pure: returns data for the caller to persist.
pub struct ScheduleProjector;

impl ScheduleProjector {
    pub const DEFAULT_HORIZON: usize = 12;

    /// project at the default 12-occurrence horizon
    pub fn project_default(
        basis: &ScheduleBasis,
        rule: &RecurrenceRule,
        start_date: NaiveDate,
    ) -> Result<Vec<ProjectedPayment>> {
        Self::project(basis, rule, start_date, Self::DEFAULT_HORIZON)
    }

    /// project up to `count` future payments
    ///
    /// An amortized projection stops early once the balance reaches zero.
    pub fn project(
        basis: &ScheduleBasis,
        rule: &RecurrenceRule,
        start_date: NaiveDate,
        count: usize,
    ) -> Result<Vec<ProjectedPayment>> {
        let due_dates = RecurrenceGenerator::generate(rule, start_date, count)?;

        match basis {
            ScheduleBasis::Flat(amount) => {
                if !amount.is_positive() {
                    return Err(EngineError::InvalidAmount { amount: *amount });
                }

                Ok(due_dates
                    .into_iter()
                    .enumerate()
                    .map(|(i, due_date)| ProjectedPayment {
                        sequence_number: i as u32 + 1,
                        due_date,
                        scheduled_amount: *amount,
                        breakdown: None,
                    })
                    .collect())
            }
            ScheduleBasis::Amortized(terms) => {
                terms.validate()?;

                let payment_amount = match terms.override_payment_amount {
                    Some(amount) if amount.is_positive() => amount,
                    Some(amount) => return Err(EngineError::InvalidAmount { amount }),
                    None => AmortizationCalculator::monthly_payment(
                        terms.principal,
                        terms.annual_rate_percent,
                        terms.term_months,
                    )?,
                };

                let mut balance = terms.starting_balance();
                let mut payments = Vec::with_capacity(due_dates.len());

                for (i, due_date) in due_dates.into_iter().enumerate() {
                    if balance.is_zero() {
                        break;
                    }

                    let breakdown = AmortizationCalculator::breakdown(
                        balance,
                        payment_amount,
                        terms.annual_rate_percent,
                    )?;

                    // the final payment shrinks to what the balance supports
                    let scheduled_amount = breakdown.principal_paid + breakdown.interest_paid;
                    balance = breakdown.balance_after;

                    payments.push(ProjectedPayment {
                        sequence_number: i as u32 + 1,
                        due_date,
                        scheduled_amount,
                        breakdown: Some(breakdown),
                    });
                }

                Ok(payments)
            }
        }
    }
}
