use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::Result;
use crate::schedule::{ScheduleBasis, ScheduleProjector};
use crate::types::{LoanTerms, ProjectedPayment, RecurrenceRule};

/// projection horizon configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// maximum number of future payments to materialize
    pub horizon: usize,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            horizon: ScheduleProjector::DEFAULT_HORIZON,
        }
    }
}

/// lifecycle policy knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LifecyclePolicy {
    /// accept partial payments summing past the scheduled amount,
    /// clamping the remaining balance at zero instead of rejecting
    pub allow_overpayment: bool,
}

/// payment terms established for an account
///
/// Bundles amount basis, recurrence, and start date; re-project whenever
/// the terms change and hand the result to the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentTerms {
    pub basis: ScheduleBasis,
    pub rule: RecurrenceRule,
    pub start_date: NaiveDate,
}

impl PaymentTerms {
    /// amortized fixed-rate loan paid monthly
    pub fn amortized_monthly(
        principal: Money,
        annual_rate_percent: Decimal,
        term_months: u32,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            basis: ScheduleBasis::Amortized(LoanTerms::new(
                principal,
                annual_rate_percent,
                term_months,
            )),
            rule: RecurrenceRule::Monthly,
            start_date,
        }
    }

    /// fixed amount on an arbitrary recurrence
    pub fn flat(amount: Money, rule: RecurrenceRule, start_date: NaiveDate) -> Self {
        Self {
            basis: ScheduleBasis::Flat(amount),
            rule,
            start_date,
        }
    }

    /// materialize the future schedule under these terms
    pub fn project(&self, config: &ProjectionConfig) -> Result<Vec<ProjectedPayment>> {
        ScheduleProjector::project(&self.basis, &self.rule, self.start_date, config.horizon)
    }
}
