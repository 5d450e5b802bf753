//! Loan analysis envelope: summary figures, optional schedule and
//! warnings, wrapped with methodology and metadata for callers that
//! serialize the result.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::engine::{AmortizationEngine, PaymentRecord};
use super::terms::LoanTerms;
use crate::error::MortgageError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::MortgageResult;

/// Terms longer than this (40 years) draw a warning.
const LONG_TERM_MONTHS: u32 = 480;

/// Annual rates above this percentage draw a warning.
const HIGH_RATE_PERCENT: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

/// Loan analysis request. Exactly one of `term_months` / `term_years`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanAnalysisInput {
    /// Amount borrowed.
    pub principal: Money,
    /// Annual interest rate in percent (7.5 = 7.5%).
    pub annual_rate_percent: Percent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_months: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_years: Option<u32>,
    /// Attach the amortization schedule to the result.
    #[serde(default)]
    pub include_schedule: bool,
    /// Keep only the first N schedule rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanAnalysis {
    pub monthly_rate: Rate,
    pub term_months: u32,
    pub monthly_payment: Money,
    /// Rounded monthly payment times the term.
    pub total_payment: Money,
    pub overpayment: Money,
    /// Reconciling payment of the last month.
    pub final_payment: Money,
    /// Sum of the payments actually listed in the schedule.
    pub schedule_total_paid: Money,
    pub schedule_total_interest: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<PaymentRecord>>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyse a fixed-rate loan: payment, totals and (optionally) the schedule.
pub fn analyze_loan(
    input: &LoanAnalysisInput,
) -> MortgageResult<ComputationOutput<LoanAnalysis>> {
    let start = Instant::now();

    let terms = resolve_terms(input)?;
    let engine = AmortizationEngine::from_terms(terms);

    let monthly_payment = engine.monthly_payment();
    let total_payment = engine.total_payment();
    let overpayment = engine.overpayment();
    let mut schedule = engine.payment_schedule();

    let schedule_total_paid: Money = schedule.iter().map(|r| r.payment).sum();
    let schedule_total_interest: Money = schedule.iter().map(|r| r.interest).sum();
    let final_payment = schedule.last().map(|r| r.payment).unwrap_or_default();

    let warnings = collect_warnings(&terms, monthly_payment, overpayment, &schedule);

    if let Some(limit) = input.schedule_limit {
        schedule.truncate(limit as usize);
    }

    let output = LoanAnalysis {
        monthly_rate: terms.monthly_rate(),
        term_months: terms.term_months(),
        monthly_payment,
        total_payment,
        overpayment,
        final_payment,
        schedule_total_paid,
        schedule_total_interest,
        schedule: input.include_schedule.then_some(schedule),
    };

    let methodology = if terms.monthly_rate().is_zero() {
        "Fixed-Rate Amortization (zero rate, even division)"
    } else {
        "Fixed-Rate Amortization (annuity formula)"
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, warnings, elapsed, output))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resolve_terms(input: &LoanAnalysisInput) -> MortgageResult<LoanTerms> {
    match (input.term_months, input.term_years) {
        (Some(months), None) => {
            LoanTerms::new(input.principal, input.annual_rate_percent, months)
        }
        (None, Some(years)) => {
            LoanTerms::from_years(input.principal, input.annual_rate_percent, years)
        }
        (Some(_), Some(_)) => Err(MortgageError::invalid(
            "term",
            "Provide either term_months or term_years, not both",
        )),
        (None, None) => Err(MortgageError::invalid(
            "term",
            "One of term_months or term_years is required",
        )),
    }
}

fn collect_warnings(
    terms: &LoanTerms,
    monthly_payment: Money,
    overpayment: Money,
    schedule: &[PaymentRecord],
) -> Vec<String> {
    let mut warnings = Vec::new();

    let first_interest = terms.principal() * terms.monthly_rate();
    if !first_interest.is_zero() && monthly_payment <= first_interest {
        warnings.push(format!(
            "Rounded monthly payment {monthly_payment} does not cover first-month interest {}; \
             the balance only falls in the final month",
            first_interest.round_dp(2)
        ));
    }

    if let Some(record) = schedule.iter().find(|r| r.balance < Decimal::ZERO) {
        warnings.push(format!(
            "Payment rounding drift overshoots the balance from month {}; \
             the final payment ({}) refunds the excess",
            record.month,
            schedule.last().map(|r| r.payment).unwrap_or_default()
        ));
    }

    if overpayment < Decimal::ZERO {
        warnings.push(format!(
            "Overpayment is negative ({overpayment}): the rounded monthly payment \
             times the term falls short of the principal"
        ));
    }

    if terms.term_months() > LONG_TERM_MONTHS {
        warnings.push(format!(
            "Term of {} months is unusually long; the rate is assumed fixed throughout",
            terms.term_months()
        ));
    }

    if terms.annual_rate_percent() > HIGH_RATE_PERCENT {
        warnings.push(format!(
            "Annual rate {}% is unusually high; results may be unreliable",
            terms.annual_rate_percent()
        ));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(principal: Money, rate: Percent, months: u32) -> LoanAnalysisInput {
        LoanAnalysisInput {
            principal,
            annual_rate_percent: rate,
            term_months: Some(months),
            term_years: None,
            include_schedule: false,
            schedule_limit: None,
        }
    }

    #[test]
    fn test_analyze_summary() {
        let out = analyze_loan(&input(dec!(1_000_000), dec!(7.5), 120)).unwrap();
        let a = &out.result;
        assert_eq!(a.monthly_payment, dec!(11870.18));
        assert_eq!(a.total_payment, dec!(1424421.60));
        assert_eq!(a.overpayment, dec!(424421.60));
        assert_eq!(a.final_payment, dec!(11869.63));
        assert_eq!(a.monthly_rate, dec!(0.00625));
        assert!(a.schedule.is_none());
        assert!(out.warnings.is_empty());
        assert_eq!(out.methodology, "Fixed-Rate Amortization (annuity formula)");
    }

    #[test]
    fn test_schedule_total_differs_from_total_payment() {
        let out = analyze_loan(&input(dec!(50_000), dec!(10), 24)).unwrap();
        let a = &out.result;
        assert_eq!(a.total_payment, dec!(55374.00));
        assert_eq!(a.schedule_total_paid, dec!(55373.90));
    }

    #[test]
    fn test_schedule_limit_truncates() {
        let mut req = input(dec!(100_000), dec!(6), 36);
        req.include_schedule = true;
        req.schedule_limit = Some(12);
        let out = analyze_loan(&req).unwrap();
        let schedule = out.result.schedule.as_ref().unwrap();
        assert_eq!(schedule.len(), 12);
        assert_eq!(schedule[11].month, 12);
        // Totals still cover the full term.
        assert_eq!(out.result.final_payment, dec!(3042.34));
    }

    #[test]
    fn test_term_in_years() {
        let mut req = input(dec!(120_000), dec!(0), 0);
        req.term_months = None;
        req.term_years = Some(1);
        let out = analyze_loan(&req).unwrap();
        assert_eq!(out.result.term_months, 12);
        assert_eq!(out.result.monthly_payment, dec!(10_000.00));
        assert!(out.methodology.contains("zero rate"));
    }

    #[test]
    fn test_term_must_be_unambiguous() {
        let mut both = input(dec!(1000), dec!(5), 12);
        both.term_years = Some(1);
        assert!(matches!(
            analyze_loan(&both),
            Err(MortgageError::InvalidInput { ref field, .. }) if field == "term"
        ));

        let mut neither = input(dec!(1000), dec!(5), 12);
        neither.term_months = None;
        assert!(analyze_loan(&neither).is_err());
    }

    #[test]
    fn test_negative_overpayment_warns() {
        let out = analyze_loan(&input(dec!(100), dec!(0), 3)).unwrap();
        assert_eq!(out.result.overpayment, dec!(-0.01));
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("negative"));
    }

    #[test]
    fn test_rounding_drift_overshoot_warns() {
        // A cent of rounding compounds over 30 years at 1%/month.
        let out = analyze_loan(&input(dec!(1000), dec!(12), 360)).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("overshoots")));
    }

    #[test]
    fn test_long_term_and_high_rate_warn() {
        let long = analyze_loan(&input(dec!(100_000), dec!(5), 600)).unwrap();
        assert!(long.warnings.iter().any(|w| w.contains("unusually long")));

        let high = analyze_loan(&input(dec!(100_000), dec!(150), 120)).unwrap();
        assert!(high.warnings.iter().any(|w| w.contains("unusually high")));
    }

    #[test]
    fn test_invalid_input_propagates() {
        assert!(analyze_loan(&input(dec!(0), dec!(5), 12)).is_err());
        assert!(analyze_loan(&input(dec!(1000), dec!(5), 0)).is_err());
        assert!(analyze_loan(&input(dec!(100_001.23), dec!(24), 6000)).is_err());
    }
}
