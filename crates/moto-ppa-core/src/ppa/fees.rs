use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// One bracket of the origination fee table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTier {
    /// Inclusive financed-amount ceiling. `None` marks the open-ended tier.
    pub upper_bound: Option<Money>,
    /// Flat fee added to the financed amount.
    pub fixed_fee: Money,
}

impl FeeTier {
    pub const fn bounded(upper_bound: Money, fixed_fee: Money) -> Self {
        FeeTier {
            upper_bound: Some(upper_bound),
            fixed_fee,
        }
    }

    pub const fn unbounded(fixed_fee: Money) -> Self {
        FeeTier {
            upper_bound: None,
            fixed_fee,
        }
    }

    /// Whether `amount` falls at or below this tier's ceiling.
    pub fn covers(&self, amount: Money) -> bool {
        self.upper_bound.map_or(true, |ceiling| amount <= ceiling)
    }
}

/// The stepped fee table, ascending by ceiling. Business constant: the
/// steps are not a smoothed formula and approvals near 5k/7k/10k depend on
/// them exactly.
pub static FEE_TIERS: [FeeTier; 4] = [
    FeeTier::bounded(dec!(5000), dec!(770)),
    FeeTier::bounded(dec!(7000), dec!(820)),
    FeeTier::bounded(dec!(10000), dec!(870)),
    FeeTier::unbounded(dec!(920)),
];

/// Fixed fee for a financed amount under the standard table.
///
/// Amounts at or below zero land in the lowest tier; the evaluator floors
/// the financed amount at zero before it gets here.
pub fn fee_for(financed_amount: Money) -> Money {
    fee_for_with(&FEE_TIERS, financed_amount)
}

/// The standard tier that applies to `financed_amount`.
pub fn fee_tier_for(financed_amount: Money) -> &'static FeeTier {
    fee_tier_for_with(&FEE_TIERS, financed_amount).unwrap_or(&FEE_TIERS[FEE_TIERS.len() - 1])
}

/// Tier lookup against an explicit table; `None` only for an empty table.
pub fn fee_tier_for_with(tiers: &[FeeTier], financed_amount: Money) -> Option<&FeeTier> {
    tiers
        .iter()
        .find(|tier| tier.covers(financed_amount))
        .or_else(|| tiers.last())
}

/// Fee lookup against an explicit table. The first tier whose ceiling is at
/// or above the amount wins; when none does, the last tier applies.
pub fn fee_for_with(tiers: &[FeeTier], financed_amount: Money) -> Money {
    fee_tier_for_with(tiers, financed_amount)
        .map(|tier| tier.fixed_fee)
        .unwrap_or(Decimal::ZERO)
}
