//! Prompt-driven session: ask for the loan, print the summary and, on
//! request, the first year of the schedule.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use colored::Colorize;
use log::debug;
use rust_decimal::Decimal;
use tabled::{builder::Builder, Table};
use thiserror::Error;

use mortgage_core::{AmortizationEngine, LoanTerms, MortgageError, PaymentRecord};

/// Months of schedule shown in the session.
const PREVIEW_MONTHS: usize = 12;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("could not read {field} from '{text}'")]
    Parse { field: &'static str, text: String },

    #[error("input ended before {0} was entered")]
    UnexpectedEof(&'static str),

    #[error(transparent)]
    Input(#[from] MortgageError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Run the session on the terminal. Input errors end the session with a
/// message; nothing of the summary is printed before all inputs are valid.
pub fn run_interactive() -> Result<(), SessionError> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    match run_session(&mut stdin.lock(), &mut stdout.lock()) {
        Err(
            e @ (SessionError::Parse { .. }
            | SessionError::UnexpectedEof(_)
            | SessionError::Input(_)),
        ) => {
            eprintln!("{}: {}", "input error".red().bold(), e);
            Ok(())
        }
        other => other,
    }
}

pub fn run_session<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<(), SessionError> {
    writeln!(out, "=== Mortgage Calculator ===")?;

    let principal = prompt_decimal(input, out, "Loan amount: ", "loan amount")?;
    let annual_rate = prompt_decimal(input, out, "Annual interest rate (%): ", "annual rate")?;
    let years: u32 = prompt_parse(input, out, "Loan term (years): ", "loan term")?;

    let terms = LoanTerms::from_years(principal, annual_rate, years)?;
    debug!("session terms: {:?}", terms);
    let engine = AmortizationEngine::from_terms(terms);

    writeln!(out)?;
    writeln!(out, "Results:")?;
    writeln!(out, "Monthly payment: {}", engine.monthly_payment())?;
    writeln!(out, "Total payment: {}", engine.total_payment())?;
    writeln!(out, "Overpayment: {}", engine.overpayment())?;

    writeln!(out)?;
    let answer = prompt(input, out, "Show payment schedule? (yes/no): ")?;
    if matches!(answer.to_lowercase().as_str(), "yes" | "y") {
        let schedule = engine.payment_schedule();
        writeln!(out)?;
        writeln!(out, "Payment schedule (first {} months):", PREVIEW_MONTHS)?;
        writeln!(out, "{}", preview_table(&schedule))?;
    }

    Ok(())
}

fn preview_table(schedule: &[PaymentRecord]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Month", "Payment", "Principal", "Interest", "Balance"]);
    for record in schedule.iter().take(PREVIEW_MONTHS) {
        builder.push_record([
            record.month.to_string(),
            record.payment.to_string(),
            record.principal.to_string(),
            record.interest.to_string(),
            record.balance.to_string(),
        ]);
    }
    Table::from(builder).to_string()
}

/// Print `message` and read one trimmed line. End of input yields an empty answer.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, message: &str) -> io::Result<String> {
    write!(out, "{}", message)?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_parse<T: FromStr, R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    message: &str,
    field: &'static str,
) -> Result<T, SessionError> {
    prompt_with(input, out, message, field, |text| text.parse().ok())
}

/// Decimal prompt that also takes exponent notation such as `1e6`.
fn prompt_decimal<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    message: &str,
    field: &'static str,
) -> Result<Decimal, SessionError> {
    prompt_with(input, out, message, field, parse_decimal)
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn prompt_with<T, R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    message: &str,
    field: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, SessionError> {
    let text = prompt(input, out, message)?;
    if text.is_empty() {
        return Err(SessionError::UnexpectedEof(field));
    }
    parse(&text).ok_or(SessionError::Parse { field, text })
}
