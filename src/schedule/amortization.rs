use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::errors::{EngineError, Result};
use crate::types::AmortizationBreakdown;

/// fixed-rate amortization math
///
/// Simple monthly compounding only. All money values round to cent
/// precision at computation time, never deferred.
pub struct AmortizationCalculator;

impl AmortizationCalculator {
    /// periodic payment for a fixed-rate loan
    ///
    /// Standard annuity formula M = P * r * (1 + r)^n / ((1 + r)^n - 1)
    /// with monthly rate r. A zero rate degrades to straight division.
    pub fn monthly_payment(
        principal: Money,
        annual_rate_percent: Decimal,
        term_months: u32,
    ) -> Result<Money> {
        if term_months < 1 {
            return Err(EngineError::InvalidLoanTerms {
                message: "term must be at least one month".to_string(),
            });
        }

        if !principal.is_positive() {
            return Err(EngineError::InvalidLoanTerms {
                message: format!("principal must be positive, got {principal}"),
            });
        }

        if annual_rate_percent.is_sign_negative() {
            return Err(EngineError::InvalidLoanTerms {
                message: format!("annual rate must not be negative, got {annual_rate_percent}"),
            });
        }

        let monthly_rate = Self::monthly_rate(annual_rate_percent);

        if monthly_rate.is_zero() {
            return Ok(principal / Decimal::from(term_months));
        }

        let r = monthly_rate.as_decimal();

        // (1 + r)^n
        let mut compound = Decimal::ONE;
        let base = Decimal::ONE + r;
        for _ in 0..term_months {
            compound *= base;
        }

        let numerator = principal.as_decimal() * r * compound;
        let denominator = compound - Decimal::ONE;

        Ok(Money::from_decimal(numerator / denominator))
    }

    /// split a payment against a balance into principal, interest, and
    /// the resulting balance
    ///
    /// Interest accrues on the full balance at the monthly rate; the
    /// principal portion never exceeds what remains, and the balance
    /// never goes negative.
    pub fn breakdown(
        balance: Money,
        payment_amount: Money,
        annual_rate_percent: Decimal,
    ) -> Result<AmortizationBreakdown> {
        if annual_rate_percent.is_sign_negative() {
            return Err(EngineError::InvalidLoanTerms {
                message: format!("annual rate must not be negative, got {annual_rate_percent}"),
            });
        }

        if !payment_amount.is_positive() {
            return Err(EngineError::InvalidAmount {
                amount: payment_amount,
            });
        }

        if balance.is_negative() {
            return Err(EngineError::InvalidAmount { amount: balance });
        }

        let monthly_rate = Self::monthly_rate(annual_rate_percent);

        let interest_paid = balance * monthly_rate.as_decimal();
        let principal_paid = (payment_amount - interest_paid).min(balance);
        let balance_after = (balance - principal_paid).max(Money::ZERO);

        Ok(AmortizationBreakdown {
            principal_paid,
            interest_paid,
            balance_after,
        })
    }

    fn monthly_rate(annual_rate_percent: Decimal) -> Rate {
        Rate::from_percentage(annual_rate_percent).monthly_rate()
    }
}
