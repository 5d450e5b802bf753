mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use log::debug;
use std::process;

use commands::loan::{LoanArgs, ScheduleArgs};

/// Fixed-rate mortgage payments and amortization schedules
#[derive(Parser)]
#[command(
    name = "mortgage",
    version,
    about = "Fixed-rate mortgage payments and amortization schedules",
    long_about = "A CLI for fixed-rate loan calculations with decimal precision. \
                  Computes the monthly payment, total payment, overpayment and the \
                  month-by-month amortization schedule."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly payment, total payment and overpayment
    Summary(LoanArgs),
    /// Month-by-month amortization schedule
    Schedule(ScheduleArgs),
    /// Prompt for the loan interactively
    Interactive,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    debug!("output format: {:?}", cli.output);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Summary(args) => commands::loan::run_summary(args),
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::Interactive => match commands::interactive::run_interactive() {
            Ok(()) => process::exit(0),
            Err(e) => Err(e.into()),
        },
        Commands::Version => {
            println!("mortgage {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
