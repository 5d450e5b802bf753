use std::num::NonZeroU32;

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::MortgageError;
use crate::time_value;
use crate::types::{Money, Percent, Rate};
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Largest accepted principal. Keeps interest and total products far from
/// the decimal range limit.
pub const MAX_PRINCIPAL: Money = dec!(1_000_000_000_000_000);

/// Largest accepted annual rate, in percent.
pub const MAX_ANNUAL_RATE_PERCENT: Percent = dec!(1000);

/// Longest accepted term (500 years).
pub const MAX_TERM_MONTHS: u32 = 6_000;

/// Largest balance error the cent rounding of the payment may compound to
/// over the term. Bounds every running balance of the schedule.
pub const MAX_ROUNDING_DRIFT: Money = MAX_PRINCIPAL;

/// Worst-case rounding error of the payment, half a cent.
const HALF_CENT: Money = dec!(0.005);

const MONTHS_PER_YEAR: u32 = 12;

// ---------------------------------------------------------------------------
// LoanTerms
// ---------------------------------------------------------------------------

/// Immutable parameters of a fixed-rate loan.
///
/// Only obtainable through [`LoanTerms::new`], [`LoanTerms::from_years`] or
/// deserialization, all of which validate, so every value in circulation
/// is amortizable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLoanTerms")]
pub struct LoanTerms {
    principal: Money,
    annual_rate_percent: Percent,
    term_months: NonZeroU32,
}

#[derive(Deserialize)]
struct RawLoanTerms {
    principal: Money,
    annual_rate_percent: Percent,
    term_months: u32,
}

impl TryFrom<RawLoanTerms> for LoanTerms {
    type Error = MortgageError;

    fn try_from(raw: RawLoanTerms) -> MortgageResult<Self> {
        LoanTerms::new(raw.principal, raw.annual_rate_percent, raw.term_months)
    }
}

impl LoanTerms {
    pub fn new(
        principal: Money,
        annual_rate_percent: Percent,
        term_months: u32,
    ) -> MortgageResult<Self> {
        validate_principal(principal)?;
        validate_rate(annual_rate_percent)?;
        let term_months = validate_term(term_months)?;
        validate_rounding_drift(annual_rate_percent, term_months)?;

        Ok(Self {
            principal,
            annual_rate_percent,
            term_months,
        })
    }

    /// Terms with the length given in whole years.
    pub fn from_years(
        principal: Money,
        annual_rate_percent: Percent,
        term_years: u32,
    ) -> MortgageResult<Self> {
        let term_months = term_years.checked_mul(MONTHS_PER_YEAR).ok_or_else(|| {
            MortgageError::invalid("term_years", "Term in years is too large")
        })?;
        if term_years == 0 {
            return Err(MortgageError::invalid(
                "term_years",
                "Term must be at least one year",
            ));
        }
        Self::new(principal, annual_rate_percent, term_months)
    }

    pub fn principal(&self) -> Money {
        self.principal
    }

    pub fn annual_rate_percent(&self) -> Percent {
        self.annual_rate_percent
    }

    pub fn term_months(&self) -> u32 {
        self.term_months.get()
    }

    pub fn periods(&self) -> NonZeroU32 {
        self.term_months
    }

    /// Derived monthly rate; zero for interest-free loans.
    pub fn monthly_rate(&self) -> Rate {
        time_value::monthly_rate(self.annual_rate_percent)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_principal(principal: Money) -> MortgageResult<()> {
    if principal <= Decimal::ZERO {
        return Err(MortgageError::invalid(
            "principal",
            "Principal must be positive",
        ));
    }
    if principal > MAX_PRINCIPAL {
        return Err(MortgageError::InvalidInput {
            field: "principal".into(),
            reason: format!("Principal cannot exceed {MAX_PRINCIPAL}"),
        });
    }
    Ok(())
}

fn validate_rate(annual_rate_percent: Percent) -> MortgageResult<()> {
    if annual_rate_percent < Decimal::ZERO {
        return Err(MortgageError::invalid(
            "annual_rate_percent",
            "Annual rate cannot be negative",
        ));
    }
    if annual_rate_percent > MAX_ANNUAL_RATE_PERCENT {
        return Err(MortgageError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: format!("Annual rate cannot exceed {MAX_ANNUAL_RATE_PERCENT}%"),
        });
    }
    Ok(())
}

fn validate_term(term_months: u32) -> MortgageResult<NonZeroU32> {
    if term_months > MAX_TERM_MONTHS {
        return Err(MortgageError::InvalidInput {
            field: "term_months".into(),
            reason: format!("Term cannot exceed {MAX_TERM_MONTHS} months"),
        });
    }
    NonZeroU32::new(term_months).ok_or_else(|| {
        MortgageError::invalid("term_months", "Term must be at least one month")
    })
}

/// The schedule applies a payment that is off by up to half a cent, and
/// the error grows by `(1 + r)` every month: after `n` months it is at most
/// `0.005 * ((1 + r)^n - 1) / r`.
fn validate_rounding_drift(
    annual_rate_percent: Percent,
    term_months: NonZeroU32,
) -> MortgageResult<()> {
    let rate = time_value::monthly_rate(annual_rate_percent);
    if rate.is_zero() {
        return Ok(());
    }

    let drift = (Decimal::ONE + rate)
        .checked_powu(u64::from(term_months.get()))
        .and_then(|growth| (growth - Decimal::ONE).checked_div(rate))
        .and_then(|factor| factor.checked_mul(HALF_CENT));

    match drift {
        Some(drift) if drift <= MAX_ROUNDING_DRIFT => Ok(()),
        _ => Err(MortgageError::InvalidInput {
            field: "term_months".into(),
            reason: format!(
                "Term of {term_months} months at {annual_rate_percent}% compounds payment \
                 rounding beyond {MAX_ROUNDING_DRIFT}"
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn assert_invalid(result: MortgageResult<LoanTerms>, expected_field: &str) {
        match result {
            Err(MortgageError::InvalidInput { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("Expected InvalidInput on {expected_field}, got {other:?}"),
        }
    }

    #[test]
    fn test_new_valid_terms() {
        let terms = LoanTerms::new(dec!(250_000), dec!(6), 360).unwrap();
        assert_eq!(terms.principal(), dec!(250_000));
        assert_eq!(terms.annual_rate_percent(), dec!(6));
        assert_eq!(terms.term_months(), 360);
        assert_eq!(terms.monthly_rate(), dec!(0.005));
    }

    #[test]
    fn test_zero_rate_is_valid() {
        let terms = LoanTerms::new(dec!(120_000), dec!(0), 12).unwrap();
        assert!(terms.monthly_rate().is_zero());
    }

    #[test]
    fn test_rejects_non_positive_principal() {
        assert_invalid(LoanTerms::new(dec!(0), dec!(5), 12), "principal");
        assert_invalid(LoanTerms::new(dec!(-100), dec!(5), 12), "principal");
    }

    #[test]
    fn test_rejects_negative_rate() {
        assert_invalid(LoanTerms::new(dec!(1000), dec!(-0.5), 12), "annual_rate_percent");
    }

    #[test]
    fn test_rejects_zero_term() {
        assert_invalid(LoanTerms::new(dec!(1000), dec!(5), 0), "term_months");
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert_invalid(
            LoanTerms::new(MAX_PRINCIPAL + dec!(1), dec!(5), 12),
            "principal",
        );
        assert_invalid(LoanTerms::new(dec!(1000), dec!(1000.01), 12), "annual_rate_percent");
        assert_invalid(
            LoanTerms::new(dec!(1000), dec!(5), MAX_TERM_MONTHS + 1),
            "term_months",
        );
    }

    #[test]
    fn test_rejects_rate_and_term_that_compound_rounding_out_of_range() {
        // 24%: the half-cent bound stays under the limit through month 1814.
        assert!(LoanTerms::new(dec!(100_001.23), dec!(24), 1814).is_ok());
        assert_invalid(LoanTerms::new(dec!(100_001.23), dec!(24), 1815), "term_months");
        assert_invalid(LoanTerms::new(dec!(100_001.23), dec!(24), MAX_TERM_MONTHS), "term_months");

        assert!(LoanTerms::new(dec!(1000), MAX_ANNUAL_RATE_PERCENT, 65).is_ok());
        assert_invalid(LoanTerms::new(dec!(1000), MAX_ANNUAL_RATE_PERCENT, 66), "term_months");

        // Interest-free loans accumulate no compounding error.
        assert!(LoanTerms::new(dec!(1000), dec!(0), MAX_TERM_MONTHS).is_ok());
    }

    #[test]
    fn test_from_years() {
        let terms = LoanTerms::from_years(dec!(1_000_000), dec!(7.5), 10).unwrap();
        assert_eq!(terms.term_months(), 120);

        assert_invalid(LoanTerms::from_years(dec!(1000), dec!(5), 0), "term_years");
        assert_invalid(LoanTerms::from_years(dec!(1000), dec!(5), u32::MAX), "term_years");
        assert_invalid(LoanTerms::from_years(dec!(1000), dec!(5), 501), "term_months");
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: LoanTerms = serde_json::from_str(
            r#"{"principal": "50000", "annual_rate_percent": "10", "term_months": 24}"#,
        )
        .unwrap();
        assert_eq!(ok.term_months(), 24);

        let bad = serde_json::from_str::<LoanTerms>(
            r#"{"principal": "50000", "annual_rate_percent": "10", "term_months": 0}"#,
        );
        assert!(bad.is_err());
    }
}
