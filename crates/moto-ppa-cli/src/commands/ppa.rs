use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use moto_ppa_core::ppa::{
    affordability_with, calculate_max_credit, ensure_within_max, fee_tier_for_with,
    format_decision_with_policy, run_ppa_with_policy, LoanRequest, MaxCreditInput, PpaPolicy,
};

use crate::input;
use crate::input::amount::parse_amount;

/// Loan figures, shared by `evaluate` and `message`
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct RequestArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Motorcycle price (BRL)
    #[arg(long, value_parser = parse_amount)]
    pub price: Option<Decimal>,

    /// Down payment (BRL)
    #[arg(long, alias = "entrada", value_parser = parse_amount)]
    pub down_payment: Option<Decimal>,

    /// Monthly income (BRL)
    #[arg(long, alias = "renda", value_parser = parse_amount)]
    pub income: Option<Decimal>,
}

/// Arguments for a PPA evaluation
#[derive(Args)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Add the customer-facing message to the output
    #[arg(long)]
    pub explain: bool,
}

/// Arguments for the maximum-credit solve
#[derive(Args)]
pub struct MaxCreditArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly income (BRL)
    #[arg(long, alias = "renda", value_parser = parse_amount)]
    pub income: Option<Decimal>,
}

/// Arguments for the fee table
#[derive(Args)]
pub struct FeesArgs {
    /// Show the tier and costs for this financed amount instead of the table
    #[arg(long, value_parser = parse_amount)]
    pub amount: Option<Decimal>,
}

fn loan_request(args: &RequestArgs) -> Result<LoanRequest, Box<dyn std::error::Error>> {
    if let Some(req) = input::read_input::<LoanRequest>(args.input.as_deref())? {
        return Ok(req);
    }
    Ok(LoanRequest::new(
        args.price.ok_or("--price is required (or provide --input)")?,
        args.down_payment
            .ok_or("--down-payment is required (or provide --input)")?,
        args.income.ok_or("--income is required (or provide --input)")?,
    ))
}

pub fn run_evaluate(
    args: EvaluateArgs,
    policy: &PpaPolicy,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request = loan_request(&args.request)?;
    let output = run_ppa_with_policy(&request, policy)?;

    let mut value = serde_json::to_value(&output)?;
    if args.explain {
        let message = format_decision_with_policy(&request, &output.result, policy);
        value["message"] = Value::String(message);
    }
    Ok(value)
}

pub fn run_message(
    args: RequestArgs,
    policy: &PpaPolicy,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request = loan_request(&args)?;
    let output = run_ppa_with_policy(&request, policy)?;
    Ok(Value::String(format_decision_with_policy(
        &request,
        &output.result,
        policy,
    )))
}

pub fn run_max_credit(
    args: MaxCreditArgs,
    policy: &PpaPolicy,
) -> Result<Value, Box<dyn std::error::Error>> {
    let max_input = match input::read_input::<MaxCreditInput>(args.input.as_deref())? {
        Some(i) => i,
        None => MaxCreditInput {
            monthly_income: args
                .income
                .ok_or("--income is required (or provide --input)")?,
        },
    };

    let result = calculate_max_credit(&max_input, policy)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_fees(args: FeesArgs, policy: &PpaPolicy) -> Result<Value, Box<dyn std::error::Error>> {
    let Some(amount) = args.amount else {
        return Ok(serde_json::to_value(&policy.fee_tiers)?);
    };
    if amount < Decimal::ZERO {
        return Err("--amount cannot be negative".into());
    }
    ensure_within_max("amount", amount)?;

    let tier = fee_tier_for_with(&policy.fee_tiers, amount);
    let costs = affordability_with(policy, amount);
    Ok(json!({
        "financed_amount": costs.financed_amount,
        "upper_bound": tier.and_then(|t| t.upper_bound),
        "fee": costs.fee,
        "total_payable": costs.total_payable,
        "reference_installment": costs.reference_installment,
    }))
}
