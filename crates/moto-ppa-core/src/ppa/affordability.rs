use serde::{Deserialize, Serialize};

use super::fees::fee_for_with;
use super::policy::PpaPolicy;
use crate::types::Money;

/// Cost breakdown for a financed amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affordability {
    pub financed_amount: Money,
    pub fee: Money,
    pub total_payable: Money,
    /// Estimated monthly payment over the reference term, used only for the
    /// income-ratio check.
    pub reference_installment: Money,
}

/// Financed amount plus its tier fee.
pub fn total_payable(financed_amount: Money) -> Money {
    affordability(financed_amount).total_payable
}

/// `total_payable * 2.44 / 36`.
pub fn reference_installment(financed_amount: Money) -> Money {
    affordability(financed_amount).reference_installment
}

pub fn affordability(financed_amount: Money) -> Affordability {
    affordability_with(&PpaPolicy::default(), financed_amount)
}

/// Policy must be valid: the reference term is used as a divisor.
pub fn affordability_with(policy: &PpaPolicy, financed_amount: Money) -> Affordability {
    let fee = fee_for_with(&policy.fee_tiers, financed_amount);
    let total_payable = financed_amount + fee;
    let reference_installment =
        total_payable * policy.finance_cost_factor / policy.reference_term();

    Affordability {
        financed_amount,
        fee,
        total_payable,
        reference_installment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_total_payable_adds_tier_fee() {
        assert_eq!(total_payable(dec!(5000)), dec!(5770));
        assert_eq!(total_payable(dec!(6000)), dec!(6820));
        assert_eq!(total_payable(dec!(9000)), dec!(9870));
        assert_eq!(total_payable(dec!(12000)), dec!(12920));
    }

    #[test]
    fn test_reference_installment() {
        // 4770 * 2.44 / 36 = 323.3 exactly
        assert_eq!(reference_installment(dec!(4000)), dec!(323.3));

        // 5770 * 2.44 / 36 = 391.0777...
        let inst = reference_installment(dec!(5000));
        assert!((inst - dec!(391.08)).abs() < dec!(0.01));
    }

    #[test]
    fn test_installment_jumps_at_tier_boundary() {
        let below = reference_installment(dec!(7000));
        let above = reference_installment(dec!(7000.01));
        // fee steps 820 -> 870: the jump is ~50 * 2.44 / 36
        assert!(above - below > dec!(3.3));
    }

    #[test]
    fn test_breakdown_fields_consistent() {
        let a = affordability(dec!(8000));
        assert_eq!(a.financed_amount, dec!(8000));
        assert_eq!(a.fee, dec!(870));
        assert_eq!(a.total_payable, a.financed_amount + a.fee);
        assert_eq!(a.reference_installment, a.total_payable * dec!(2.44) / dec!(36));
    }
}
