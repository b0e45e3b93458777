use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use moto_ppa_core::ppa::{evaluate_with_policy, validate_request, LoanRequest, PpaPolicy};
use moto_ppa_core::simulation::{simulate, SimulationInput};

use crate::input;
use crate::input::amount::parse_amount;

/// Arguments for the installment simulation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SimulateArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Motorcycle price (BRL)
    #[arg(long, value_parser = parse_amount)]
    pub price: Option<Decimal>,

    /// Down payment (BRL)
    #[arg(long, alias = "entrada", value_parser = parse_amount)]
    pub down_payment: Option<Decimal>,

    /// Approved financing limit (BRL)
    #[arg(long, conflicts_with = "income", value_parser = parse_amount)]
    pub limit: Option<Decimal>,

    /// Derive the limit from this monthly income instead of --limit
    #[arg(long, alias = "renda", value_parser = parse_amount)]
    pub income: Option<Decimal>,

    /// Monthly interest rate as a decimal (default 0.025)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Allowed terms in months, comma-separated (default 12,24,36)
    #[arg(long, value_delimiter = ',')]
    pub terms: Vec<u32>,

    /// Term to select (default: first allowed term)
    #[arg(long)]
    pub term: Option<u32>,
}

pub fn run_simulate(
    args: SimulateArgs,
    policy: &PpaPolicy,
) -> Result<Value, Box<dyn std::error::Error>> {
    let sim_input = match input::read_input::<SimulationInput>(args.input.as_deref())? {
        Some(i) => i,
        None => from_flags(&args, policy)?,
    };

    let result = simulate(&sim_input)?;
    Ok(serde_json::to_value(result)?)
}

fn from_flags(
    args: &SimulateArgs,
    policy: &PpaPolicy,
) -> Result<SimulationInput, Box<dyn std::error::Error>> {
    let price = args.price.ok_or("--price is required (or provide --input)")?;
    let down = args
        .down_payment
        .ok_or("--down-payment is required (or provide --input)")?;

    let approved_limit = match (args.limit, args.income) {
        (Some(limit), _) => limit,
        (None, Some(income)) => {
            let req = LoanRequest::new(price, down, income);
            validate_request(&req)?;
            let limit = evaluate_with_policy(&req, policy)?.max_financeable_amount;
            tracing::debug!(%income, %limit, "limit derived from income");
            limit
        }
        (None, None) => return Err("--limit or --income is required (or provide --input)".into()),
    };

    Ok(SimulationInput {
        motorcycle_price: price,
        down_payment: down,
        approved_limit,
        monthly_rate: args.rate,
        allowed_terms: if args.terms.is_empty() {
            None
        } else {
            Some(args.terms.clone())
        },
        selected_term: args.term,
    })
}
