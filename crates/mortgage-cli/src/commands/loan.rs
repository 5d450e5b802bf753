use clap::Args;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_core::amortization::analysis::{self, LoanAnalysisInput};

use crate::input;

/// Loan parameters shared by every non-interactive command
#[derive(Args, Debug)]
#[command(allow_hyphen_values = true)]
pub struct LoanArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (7.5 = 7.5%)
    #[arg(long, alias = "rate")]
    pub annual_rate: Option<Decimal>,

    /// Term in months
    #[arg(long, conflicts_with = "years")]
    pub term_months: Option<u32>,

    /// Term in whole years
    #[arg(long)]
    pub years: Option<u32>,
}

/// Arguments for the amortization schedule
#[derive(Args, Debug)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Only list the first N months
    #[arg(long)]
    pub limit: Option<u32>,
}

pub fn run_summary(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut loan_input = load_input(&args)?;
    loan_input.include_schedule = false;
    analyze(&loan_input)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut loan_input = load_input(&args.loan)?;
    loan_input.include_schedule = true;
    loan_input.schedule_limit = args.limit.or(loan_input.schedule_limit);
    analyze(&loan_input)
}

fn analyze(loan_input: &LoanAnalysisInput) -> Result<Value, Box<dyn std::error::Error>> {
    debug!("analysing loan: {:?}", loan_input);
    let result = analysis::analyze_loan(loan_input)?;
    for w in &result.warnings {
        warn!("{}", w);
    }
    debug!(
        "monthly payment {} computed in {}us",
        result.result.monthly_payment, result.metadata.computation_time_us
    );
    Ok(serde_json::to_value(result)?)
}

fn load_input(args: &LoanArgs) -> Result<LoanAnalysisInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_input_file(path);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(data);
    }
    loan_from_flags(args)
}

fn loan_from_flags(args: &LoanArgs) -> Result<LoanAnalysisInput, Box<dyn std::error::Error>> {
    Ok(LoanAnalysisInput {
        principal: args
            .principal
            .ok_or("--principal is required (or provide --input)")?,
        annual_rate_percent: args
            .annual_rate
            .ok_or("--annual-rate is required (or provide --input)")?,
        term_months: args.term_months,
        term_years: args.years,
        include_schedule: false,
        schedule_limit: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn flags() -> LoanArgs {
        LoanArgs {
            input: None,
            principal: Some(dec!(50_000)),
            annual_rate: Some(dec!(10)),
            term_months: None,
            years: Some(2),
        }
    }

    #[test]
    fn test_loan_from_flags() {
        let input = loan_from_flags(&flags()).unwrap();
        assert_eq!(input.principal, dec!(50_000));
        assert_eq!(input.term_years, Some(2));
        assert_eq!(input.term_months, None);
    }

    #[test]
    fn test_missing_principal_flag() {
        let mut args = flags();
        args.principal = None;
        let err = loan_from_flags(&args).unwrap_err();
        assert!(err.to_string().contains("--principal"));
    }

    #[test]
    fn test_analyze_schedule_envelope() {
        let mut input = loan_from_flags(&flags()).unwrap();
        input.include_schedule = true;
        input.schedule_limit = Some(12);
        let value = analyze(&input).unwrap();
        assert_eq!(value["result"]["monthly_payment"], "2307.25");
        assert_eq!(value["result"]["schedule"].as_array().map(Vec::len), Some(12));
    }

    #[test]
    fn test_analyze_rejects_invalid_terms() {
        let mut input = loan_from_flags(&flags()).unwrap();
        input.principal = dec!(-1);
        let err = analyze(&input).unwrap_err();
        assert!(err.to_string().contains("principal"));
    }
}
