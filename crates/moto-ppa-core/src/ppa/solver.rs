use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::fees::FeeTier;
use super::policy::{ensure_within_max, PpaPolicy};
use crate::{types::*, PpaError, PpaOutcome};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxCreditInput {
    pub monthly_income: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxCreditOutput {
    /// income / 3
    pub max_installment: Money,
    /// What the income alone supports, before the credit ceiling.
    pub income_supported_amount: Money,
    /// `income_supported_amount` capped at the credit ceiling.
    pub max_financeable_amount: Money,
    /// The fee tier whose assumption produced the answer, if any did.
    pub fee_tier: Option<FeeTier>,
    pub capped_by_ceiling: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Largest financed amount whose reference installment fits in a third of
/// `monthly_income`, under the standard policy. Not capped by the credit
/// ceiling; the evaluator applies that.
pub fn max_financeable_by_income(monthly_income: Money) -> Money {
    solve(&PpaPolicy::default(), monthly_income).0
}

/// Validated solver run with the credit ceiling applied, wrapped in the
/// standard envelope.
pub fn calculate_max_credit(
    input: &MaxCreditInput,
    policy: &PpaPolicy,
) -> PpaOutcome<ComputationOutput<MaxCreditOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    policy.validate()?;
    if input.monthly_income < Decimal::ZERO {
        return Err(PpaError::InvalidInput {
            field: "monthly_income".into(),
            reason: "Monthly income cannot be negative.".into(),
        });
    }
    ensure_within_max("monthly_income", input.monthly_income)?;

    let (income_supported, tier) = solve(policy, input.monthly_income);
    let capped = income_supported > policy.credit_ceiling;
    if income_supported.is_zero() {
        warnings.push("Income does not cover the fixed fee of the lowest tier; no credit available.".into());
    }

    let output = MaxCreditOutput {
        max_installment: policy.max_installment(input.monthly_income),
        income_supported_amount: income_supported,
        max_financeable_amount: income_supported.min(policy.credit_ceiling),
        fee_tier: tier,
        capped_by_ceiling: capped,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "income_commitment_divisor": policy.income_commitment_divisor.to_string(),
        "finance_cost_factor": policy.finance_cost_factor.to_string(),
        "reference_term_months": policy.reference_term_months,
        "credit_ceiling": policy.credit_ceiling.to_string(),
    });

    Ok(with_metadata(
        "Inverse reference-installment solve (first consistent fee tier)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Inverse of `installment = (amount + fee) * factor / term`, tried against
/// each fee tier in ascending order. The first tier whose ceiling admits its
/// own candidate wins; negative candidates clamp to zero.
///
/// First-fit means the answer dips by the fee step just past a tier ceiling
/// (e.g. 5000 then ~4950 as the candidate crosses into the 820 tier).
///
/// Policy must be valid: the divisor and cost factor are used as divisors.
pub(crate) fn solve(policy: &PpaPolicy, monthly_income: Money) -> (Money, Option<FeeTier>) {
    let max_installment = policy.max_installment(monthly_income);
    let gross = max_installment * policy.reference_term() / policy.finance_cost_factor;

    for tier in &policy.fee_tiers {
        let candidate = gross - tier.fixed_fee;
        if tier.covers(candidate) {
            return (candidate.max(Decimal::ZERO), Some(*tier));
        }
    }

    (Decimal::ZERO, None)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ppa::affordability::reference_installment;
    use rust_decimal_macros::dec;

    #[test]
    fn test_low_income_stays_in_first_tier() {
        // 1000 / 3 * 36 / 2.44 = 4918.03..., minus 770 = 4148.03...
        let max = max_financeable_by_income(dec!(1000));
        let expected = dec!(1000) / dec!(3) * dec!(36) / dec!(2.44) - dec!(770);
        assert_eq!(max, expected);
        assert!(max <= dec!(5000));
    }

    #[test]
    fn test_income_below_fee_clamps_to_zero() {
        // 50 / 3 * 36 / 2.44 = ~245.9 < 770
        assert_eq!(max_financeable_by_income(dec!(50)), Decimal::ZERO);
        assert_eq!(max_financeable_by_income(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_high_income_uses_open_tier_uncapped() {
        let max = max_financeable_by_income(dec!(9000));
        // 3000 * 36 / 2.44 = 44262.29..., minus 920
        let expected = dec!(9000) / dec!(3) * dec!(36) / dec!(2.44) - dec!(920);
        assert_eq!(max, expected);
        assert!(max > dec!(12000));
    }

    #[test]
    fn test_solution_fits_income() {
        for income in [dec!(800), dec!(1500), dec!(2200), dec!(2600), dec!(4000)] {
            let max = max_financeable_by_income(income);
            let inst = reference_installment(max);
            assert!(
                inst <= income / dec!(3) + dec!(0.000001),
                "income {income}: installment {inst} over limit"
            );
        }
    }

    #[test]
    fn test_first_fit_dips_past_tier_ceiling() {
        // gross = income * 36 / (3 * 2.44)
        // 1173 -> 5768.85..., tier 1 candidate 4998.85...
        // 1174 -> 5773.77..., tier 1 candidate over 5000, tier 2 gives 4953.77...
        let below = max_financeable_by_income(dec!(1173));
        let above = max_financeable_by_income(dec!(1174));
        assert!(below > dec!(4998) && below < dec!(5000));
        assert!(above > dec!(4953) && above < dec!(4954));
        assert!(above < below);
    }

    #[test]
    fn test_calculate_max_credit_caps_at_ceiling() {
        let input = MaxCreditInput { monthly_income: dec!(9000) };
        let out = calculate_max_credit(&input, &PpaPolicy::default()).unwrap();
        assert_eq!(out.result.max_financeable_amount, dec!(12000));
        assert!(out.result.capped_by_ceiling);
        assert_eq!(out.result.max_installment, dec!(3000));
        assert_eq!(out.result.fee_tier.map(|t| t.fixed_fee), Some(dec!(920)));
    }

    #[test]
    fn test_calculate_max_credit_warns_when_nothing_available() {
        let input = MaxCreditInput { monthly_income: dec!(10) };
        let out = calculate_max_credit(&input, &PpaPolicy::default()).unwrap();
        assert_eq!(out.result.max_financeable_amount, Decimal::ZERO);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_negative_income_rejected() {
        let input = MaxCreditInput { monthly_income: dec!(-1) };
        let err = calculate_max_credit(&input, &PpaPolicy::default()).unwrap_err();
        match err {
            PpaError::InvalidInput { field, .. } => assert_eq!(field, "monthly_income"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_income_above_max_amount_rejected() {
        let input = MaxCreditInput { monthly_income: Decimal::MAX };
        let err = calculate_max_credit(&input, &PpaPolicy::default()).unwrap_err();
        assert!(matches!(err, PpaError::InvalidInput { ref field, .. } if field == "monthly_income"));
    }
}
