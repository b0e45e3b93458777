mod commands;
mod input;
mod output;
mod telemetry;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::lead::ValidateLeadArgs;
use commands::ppa::{EvaluateArgs, FeesArgs, MaxCreditArgs, RequestArgs};
use commands::simulation::SimulateArgs;

/// Motorcycle financing pre-pre-approval
#[derive(Parser)]
#[command(
    name = "ppa",
    version,
    about = "Motorcycle financing pre-pre-approval (PPA)",
    long_about = "Instant affordability check for motorcycle financing with decimal \
                  precision. Evaluates a request against the down-payment, credit \
                  ceiling and income rules, solves the maximum financeable amount, \
                  simulates installments and validates lead forms."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Policy override file (JSON or YAML)
    #[arg(long, env = "PPA_POLICY", global = true)]
    policy: Option<String>,

    /// Log level or filter when RUST_LOG is unset
    #[arg(long, env = "PPA_LOG_LEVEL", default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the PPA rules on a loan request
    Evaluate(EvaluateArgs),
    /// Maximum financeable amount for a monthly income
    MaxCredit(MaxCreditArgs),
    /// Show the fee table, or the costs for one financed amount
    Fees(FeesArgs),
    /// Quote installments within an approved limit
    Simulate(SimulateArgs),
    /// Validate a lead form and build its submission payload
    ValidateLead(ValidateLeadArgs),
    /// Print the customer-facing PPA message (pt-BR)
    Message(RequestArgs),
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
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = telemetry::init(&cli.log_level) {
        eprintln!("{}: {}", "error".red().bold(), e);
        process::exit(1);
    }

    let result = run(cli.command, cli.policy.as_deref());

    match result {
        Ok(Some(value)) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Ok(None) => process::exit(0),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

fn run(
    command: Commands,
    policy_path: Option<&str>,
) -> Result<Option<serde_json::Value>, Box<dyn std::error::Error>> {
    if let Commands::Version = command {
        println!("ppa {}", env!("CARGO_PKG_VERSION"));
        return Ok(None);
    }

    let policy = input::policy::load_policy(policy_path)?;

    let value = match command {
        Commands::Evaluate(args) => commands::ppa::run_evaluate(args, &policy)?,
        Commands::MaxCredit(args) => commands::ppa::run_max_credit(args, &policy)?,
        Commands::Fees(args) => commands::ppa::run_fees(args, &policy)?,
        Commands::Simulate(args) => commands::simulation::run_simulate(args, &policy)?,
        Commands::ValidateLead(args) => commands::lead::run_validate_lead(args, &policy)?,
        Commands::Message(args) => commands::ppa::run_message(args, &policy)?,
        Commands::Version => return Ok(None),
    };
    Ok(Some(value))
}
