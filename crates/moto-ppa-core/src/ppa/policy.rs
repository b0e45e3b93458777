use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::fees::{FeeTier, FEE_TIERS};
use crate::types::{Money, Rate};
use crate::{PpaError, PpaOutcome};

/// Smallest down payment accepted, whatever the price.
pub const MIN_DOWN_PAYMENT: Money = dec!(4000);
/// Smallest down payment as a fraction of the motorcycle price.
pub const MIN_DOWN_PAYMENT_RATIO: Rate = dec!(0.4);
/// Company-wide cap on the financed amount, regardless of income.
pub const CREDIT_CEILING: Money = dec!(12000);
/// The reference installment may commit at most income / 3.
pub const INCOME_COMMITMENT_DIVISOR: Decimal = dec!(3);
/// Opaque finance-cost multiplier applied to the total payable.
pub const FINANCE_COST_FACTOR: Decimal = dec!(2.44);
/// Term of the reference installment, independent of the term finally chosen.
pub const REFERENCE_TERM_MONTHS: u32 = 36;

/// Largest amount (price, down payment, income, limit) accepted at any input
/// boundary. Keeps every product and quotient well inside `Decimal` range.
pub const MAX_AMOUNT: Money = dec!(1_000_000_000);
/// Longest term, in months, accepted for a reference or simulated loan.
pub const MAX_TERM_MONTHS: u32 = 480;

/// Reject amounts above [`MAX_AMOUNT`]. Sign checks stay with the caller.
pub fn ensure_within_max(field: &str, amount: Money) -> PpaOutcome<()> {
    if amount > MAX_AMOUNT {
        return Err(PpaError::InvalidInput {
            field: field.into(),
            reason: format!("Amount cannot exceed {MAX_AMOUNT}."),
        });
    }
    Ok(())
}

/// Every business constant the PPA rules depend on.
///
/// `PpaPolicy::default()` is the production rule set. An override can be
/// deserialised from a file, but must pass [`PpaPolicy::validate`] before it
/// is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PpaPolicy {
    pub min_down_payment: Money,
    pub min_down_payment_ratio: Rate,
    pub credit_ceiling: Money,
    pub income_commitment_divisor: Decimal,
    pub finance_cost_factor: Decimal,
    pub reference_term_months: u32,
    pub fee_tiers: Vec<FeeTier>,
}

impl Default for PpaPolicy {
    fn default() -> Self {
        PpaPolicy {
            min_down_payment: MIN_DOWN_PAYMENT,
            min_down_payment_ratio: MIN_DOWN_PAYMENT_RATIO,
            credit_ceiling: CREDIT_CEILING,
            income_commitment_divisor: INCOME_COMMITMENT_DIVISOR,
            finance_cost_factor: FINANCE_COST_FACTOR,
            reference_term_months: REFERENCE_TERM_MONTHS,
            fee_tiers: FEE_TIERS.to_vec(),
        }
    }
}

impl PpaPolicy {
    pub fn validate(&self) -> PpaOutcome<()> {
        if self.min_down_payment < Decimal::ZERO {
            return Err(PpaError::InvalidPolicy(
                "min_down_payment cannot be negative".into(),
            ));
        }
        if self.min_down_payment_ratio <= Decimal::ZERO || self.min_down_payment_ratio > Decimal::ONE {
            return Err(PpaError::InvalidPolicy(
                "min_down_payment_ratio must be in (0, 1]".into(),
            ));
        }
        if self.credit_ceiling <= Decimal::ZERO {
            return Err(PpaError::InvalidPolicy(
                "credit_ceiling must be positive".into(),
            ));
        }
        if self.min_down_payment > MAX_AMOUNT || self.credit_ceiling > MAX_AMOUNT {
            return Err(PpaError::InvalidPolicy(format!(
                "min_down_payment and credit_ceiling cannot exceed {MAX_AMOUNT}"
            )));
        }
        if !(Decimal::ONE..=dec!(100)).contains(&self.income_commitment_divisor) {
            return Err(PpaError::InvalidPolicy(
                "income_commitment_divisor must be in [1, 100]".into(),
            ));
        }
        if !(Decimal::ONE..=dec!(100)).contains(&self.finance_cost_factor) {
            return Err(PpaError::InvalidPolicy(
                "finance_cost_factor must be in [1, 100]".into(),
            ));
        }
        if self.reference_term_months == 0 || self.reference_term_months > MAX_TERM_MONTHS {
            return Err(PpaError::InvalidPolicy(format!(
                "reference_term_months must be in [1, {MAX_TERM_MONTHS}]"
            )));
        }
        validate_fee_tiers(&self.fee_tiers)
    }

    /// Largest installment the income allows (income / divisor).
    pub fn max_installment(&self, monthly_income: Money) -> Money {
        monthly_income / self.income_commitment_divisor
    }

    pub(crate) fn reference_term(&self) -> Decimal {
        Decimal::from(self.reference_term_months)
    }
}

fn validate_fee_tiers(tiers: &[FeeTier]) -> PpaOutcome<()> {
    let Some((last, bounded)) = tiers.split_last() else {
        return Err(PpaError::InvalidPolicy("fee_tiers cannot be empty".into()));
    };

    if last.upper_bound.is_some() {
        return Err(PpaError::InvalidPolicy(
            "the last fee tier must be unbounded".into(),
        ));
    }

    let mut previous: Option<Money> = None;
    for (i, tier) in bounded.iter().enumerate() {
        let Some(ceiling) = tier.upper_bound else {
            return Err(PpaError::InvalidPolicy(format!(
                "fee tier {i} is unbounded but is not the last tier"
            )));
        };
        if previous.is_some_and(|p| ceiling <= p) {
            return Err(PpaError::InvalidPolicy(format!(
                "fee tier {i} ceiling must be above the previous tier's"
            )));
        }
        previous = Some(ceiling);
    }

    if tiers.iter().any(|t| t.fixed_fee < Decimal::ZERO) {
        return Err(PpaError::InvalidPolicy("fees cannot be negative".into()));
    }
    if tiers
        .iter()
        .any(|t| t.fixed_fee > MAX_AMOUNT || t.upper_bound.is_some_and(|b| b > MAX_AMOUNT))
    {
        return Err(PpaError::InvalidPolicy(format!(
            "fee tier amounts cannot exceed {MAX_AMOUNT}"
        )));
    }

    Ok(())
}
