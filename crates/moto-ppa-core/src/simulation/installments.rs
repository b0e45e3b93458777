use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::ppa::policy::{ensure_within_max, MAX_TERM_MONTHS};
use crate::time_value::loan_installment;
use crate::{types::*, PpaError, PpaOutcome};

/// Monthly rate quoted when no rate is supplied (2.5% a.m.).
pub const DEFAULT_MONTHLY_RATE: Rate = dec!(0.025);

/// Terms offered after approval, in months.
pub const DEFAULT_TERMS: [u32; 3] = [12, 24, 36];

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationInput {
    pub motorcycle_price: Money,
    pub down_payment: Money,
    /// Largest amount the approval allows to be financed.
    pub approved_limit: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_rate: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_terms: Option<Vec<u32>>,
    /// Term the buyer picked; defaults to the first allowed term.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_term: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentOption {
    pub term_months: u32,
    /// Rounded to cents.
    pub installment: Money,
    pub total_paid: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub motorcycle_price: Money,
    /// May be raised above the input so the financed amount fits the limit.
    pub down_payment: Money,
    pub financed_amount: Money,
    pub at_limit: bool,
    pub monthly_rate: Rate,
    pub options: Vec<InstallmentOption>,
    pub selected: InstallmentOption,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Quote level installments for each allowed term, keeping the financed
/// amount within the approved limit.
pub fn simulate(input: &SimulationInput) -> PpaOutcome<ComputationOutput<SimulationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let rate = input.monthly_rate.unwrap_or(DEFAULT_MONTHLY_RATE);
    let terms: Vec<u32> = input
        .allowed_terms
        .clone()
        .unwrap_or_else(|| DEFAULT_TERMS.to_vec());

    let price = input.motorcycle_price;
    let mut down = input.down_payment.min(price);
    if down < input.down_payment {
        warnings.push("Down payment exceeded the price and was reduced to it.".into());
    }

    let mut financed = price - down;
    let at_limit = financed >= input.approved_limit;
    if financed > input.approved_limit {
        down = price - input.approved_limit;
        financed = input.approved_limit;
        warnings.push(format!(
            "Down payment raised to {down} to keep the financed amount within the approved limit."
        ));
    }

    let mut options = Vec::with_capacity(terms.len());
    for term in &terms {
        options.push(quote(financed, rate, *term)?);
    }

    let selected_term = input.selected_term.unwrap_or(terms[0]);
    let selected = options
        .iter()
        .find(|o| o.term_months == selected_term)
        .cloned()
        .ok_or_else(|| PpaError::InvalidInput {
            field: "selected_term".into(),
            reason: format!("Term {selected_term} is not among the allowed terms."),
        })?;

    tracing::debug!(
        financed_amount = %financed,
        term = selected.term_months,
        installment = %selected.installment,
        "installments simulated"
    );

    let output = SimulationOutput {
        motorcycle_price: price,
        down_payment: down,
        financed_amount: financed,
        at_limit,
        monthly_rate: rate,
        options,
        selected,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "monthly_rate": rate.to_string(),
        "allowed_terms": terms,
        "approved_limit": input.approved_limit.to_string(),
    });

    Ok(with_metadata(
        "Level-payment installment simulation (PMT)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn quote(financed: Money, rate: Rate, term: u32) -> PpaOutcome<InstallmentOption> {
    let installment = loan_installment(financed, rate, term)?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    Ok(InstallmentOption {
        term_months: term,
        installment,
        total_paid: installment * Decimal::from(term),
    })
}

fn validate_input(input: &SimulationInput) -> PpaOutcome<()> {
    ensure_within_max("motorcycle_price", input.motorcycle_price)?;
    ensure_within_max("down_payment", input.down_payment)?;
    ensure_within_max("approved_limit", input.approved_limit)?;
    if input.motorcycle_price <= Decimal::ZERO {
        return Err(PpaError::InvalidInput {
            field: "motorcycle_price".into(),
            reason: "Motorcycle price must be positive.".into(),
        });
    }
    if input.down_payment < Decimal::ZERO {
        return Err(PpaError::InvalidInput {
            field: "down_payment".into(),
            reason: "Down payment cannot be negative.".into(),
        });
    }
    if input.approved_limit < Decimal::ZERO {
        return Err(PpaError::InvalidInput {
            field: "approved_limit".into(),
            reason: "Approved limit cannot be negative.".into(),
        });
    }
    if let Some(rate) = input.monthly_rate {
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(PpaError::InvalidInput {
                field: "monthly_rate".into(),
                reason: "Monthly rate must be between 0 and 1.".into(),
            });
        }
    }
    if let Some(ref terms) = input.allowed_terms {
        if terms.is_empty() {
            return Err(PpaError::InvalidInput {
                field: "allowed_terms".into(),
                reason: "At least one term must be allowed.".into(),
            });
        }
        if terms.iter().any(|&t| t == 0 || t > MAX_TERM_MONTHS) {
            return Err(PpaError::InvalidInput {
                field: "allowed_terms".into(),
                reason: format!("Terms must be between 1 and {MAX_TERM_MONTHS} months."),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
