use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use super::affordability::affordability_with;
use super::policy::{ensure_within_max, PpaPolicy};
use super::solver;
use crate::{types::*, PpaError, PpaOutcome};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// The three figures a PPA is run on. Constructed per evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub motorcycle_price: Money,
    pub down_payment: Money,
    pub monthly_income: Money,
}

impl LoanRequest {
    pub fn new(motorcycle_price: Money, down_payment: Money, monthly_income: Money) -> Self {
        LoanRequest {
            motorcycle_price,
            down_payment,
            monthly_income,
        }
    }

    /// Price minus down payment, floored at zero.
    pub fn financed_amount(&self) -> Money {
        (self.motorcycle_price - self.down_payment).max(Decimal::ZERO)
    }
}

/// Why a PPA was refused, in rule order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Down payment under the absolute minimum.
    DownPaymentBelowMinimum,
    /// Down payment under the minimum share of the price.
    DownPaymentBelowRatio,
    /// Financed amount above the credit ceiling.
    CreditCeilingExceeded,
    /// Reference installment above the share of income it may commit.
    IncomeRatioExceeded,
}

impl RejectionReason {
    pub fn is_down_payment_rule(self) -> bool {
        matches!(
            self,
            RejectionReason::DownPaymentBelowMinimum | RejectionReason::DownPaymentBelowRatio
        )
    }

    /// Storefront text under the standard policy.
    pub fn pt_br(self) -> String {
        super::message::describe_reason(self, &PpaPolicy::default())
    }

    /// Short English text with the thresholds of `policy` filled in.
    pub fn describe(self, policy: &PpaPolicy) -> String {
        match self {
            RejectionReason::DownPaymentBelowMinimum => "down payment below minimum".into(),
            RejectionReason::DownPaymentBelowRatio => format!(
                "down payment below {}% of price",
                (policy.min_down_payment_ratio * Decimal::ONE_HUNDRED).normalize()
            ),
            RejectionReason::CreditCeilingExceeded => "requested credit exceeds ceiling".into(),
            RejectionReason::IncomeRatioExceeded => {
                let divisor = policy.income_commitment_divisor.normalize();
                if divisor == Decimal::from(3) {
                    "installment exceeds one-third of income".into()
                } else {
                    format!("installment exceeds 1/{divisor} of income")
                }
            }
        }
    }
}

/// Same text as [`RejectionReason::describe`] under the standard policy.
impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe(&PpaPolicy::default()))
    }
}

/// Alternatives offered when only the down-payment rules failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownPaymentAlternatives {
    /// max(price * 40%, 4000)
    pub required_min_down_payment: Money,
    /// down payment / 40%
    pub max_motorcycle_price_for_current_down_payment: Money,
}

/// The single pair of alternatives worth showing for a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Suggestion {
    /// Rejected by the credit ceiling or by income: keep the financed amount
    /// within what the income (and the ceiling) supports.
    CreditLimit {
        max_financeable_amount: Money,
        min_down_payment: Money,
        max_motorcycle_price: Money,
    },
    /// Rejected only by the down-payment rules.
    DownPayment {
        min_down_payment: Money,
        max_motorcycle_price: Money,
    },
}

impl Suggestion {
    pub fn min_down_payment(&self) -> Money {
        match self {
            Suggestion::CreditLimit { min_down_payment, .. }
            | Suggestion::DownPayment { min_down_payment, .. } => *min_down_payment,
        }
    }

    pub fn max_motorcycle_price(&self) -> Money {
        match self {
            Suggestion::CreditLimit { max_motorcycle_price, .. }
            | Suggestion::DownPayment { max_motorcycle_price, .. } => *max_motorcycle_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PpaResult {
    pub approved: bool,
    pub reasons: Vec<RejectionReason>,
    pub rejected_by_credit_ceiling: bool,
    pub rejected_by_income_ratio: bool,

    pub financed_amount: Money,
    pub fee: Money,
    pub total_payable: Money,
    pub reference_installment: Money,
    /// income / 3
    pub max_installment: Money,

    /// Income-supported amount, capped at the credit ceiling.
    pub max_financeable_amount: Money,
    /// price - max financeable, floored at zero.
    pub suggested_min_down_payment: Money,
    /// down payment + max financeable, floored at zero.
    pub suggested_max_motorcycle_price: Money,
    /// Only set when Rules A/B are the sole cause of rejection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down_payment_alternatives: Option<DownPaymentAlternatives>,
}

impl PpaResult {
    /// Rejected, and neither the ceiling nor the income check was involved.
    pub fn rejected_only_by_down_payment(&self) -> bool {
        !self.approved && !self.rejected_by_credit_ceiling && !self.rejected_by_income_ratio
    }

    /// The alternatives that apply to this rejection's cause; `None` when
    /// approved.
    pub fn suggestion(&self) -> Option<Suggestion> {
        if self.approved {
            return None;
        }
        match self.down_payment_alternatives {
            Some(alt) => Some(Suggestion::DownPayment {
                min_down_payment: alt.required_min_down_payment,
                max_motorcycle_price: alt.max_motorcycle_price_for_current_down_payment,
            }),
            None => Some(Suggestion::CreditLimit {
                max_financeable_amount: self.max_financeable_amount,
                min_down_payment: self.suggested_min_down_payment,
                max_motorcycle_price: self.suggested_max_motorcycle_price,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the pre-pre-approval rules under the standard policy.
///
/// Pure and infallible: inputs are assumed already validated (see
/// [`validate_request`]). A down payment above the price is treated as a
/// zero financed amount.
pub fn evaluate(request: &LoanRequest) -> PpaResult {
    evaluate_unchecked(request, &PpaPolicy::default())
}

/// Same rules under an explicit policy, which is validated first.
pub fn evaluate_with_policy(request: &LoanRequest, policy: &PpaPolicy) -> PpaOutcome<PpaResult> {
    policy.validate()?;
    Ok(evaluate_unchecked(request, policy))
}

/// Boundary check for values coming from the form. Amounts above
/// [`MAX_AMOUNT`](super::policy::MAX_AMOUNT) are refused.
pub fn validate_request(request: &LoanRequest) -> PpaOutcome<()> {
    ensure_within_max("motorcycle_price", request.motorcycle_price)?;
    ensure_within_max("down_payment", request.down_payment)?;
    ensure_within_max("monthly_income", request.monthly_income)?;

    if request.motorcycle_price <= Decimal::ZERO {
        return Err(PpaError::InvalidInput {
            field: "motorcycle_price".into(),
            reason: "Motorcycle price must be positive.".into(),
        });
    }
    if request.down_payment < Decimal::ZERO {
        return Err(PpaError::InvalidInput {
            field: "down_payment".into(),
            reason: "Down payment cannot be negative.".into(),
        });
    }
    if request.monthly_income < Decimal::ZERO {
        return Err(PpaError::InvalidInput {
            field: "monthly_income".into(),
            reason: "Monthly income cannot be negative.".into(),
        });
    }
    if request.down_payment > request.motorcycle_price {
        return Err(PpaError::InvalidInput {
            field: "down_payment".into(),
            reason: "Down payment cannot exceed the motorcycle price.".into(),
        });
    }
    Ok(())
}

/// Validated, logged PPA run wrapped in the standard envelope.
pub fn run_ppa(request: &LoanRequest) -> PpaOutcome<ComputationOutput<PpaResult>> {
    run_ppa_with_policy(request, &PpaPolicy::default())
}

pub fn run_ppa_with_policy(
    request: &LoanRequest,
    policy: &PpaPolicy,
) -> PpaOutcome<ComputationOutput<PpaResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    policy.validate()?;
    validate_request(request)?;

    let result = evaluate_unchecked(request, policy);

    if request.monthly_income.is_zero() {
        warnings.push("Monthly income is zero; no credit can be extended.".into());
    }
    if request.down_payment == request.motorcycle_price {
        warnings.push("Down payment covers the full price; nothing is financed.".into());
    }
    if result.reasons.len() > 1 && !result.rejected_only_by_down_payment() {
        warnings.push(
            "Rejected for several causes; suggestions target the credit limit only.".into(),
        );
    }

    tracing::info!(
        approved = result.approved,
        reasons = result.reasons.len(),
        financed_amount = %result.financed_amount,
        max_financeable_amount = %result.max_financeable_amount,
        "ppa evaluated"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "min_down_payment": policy.min_down_payment.to_string(),
        "min_down_payment_ratio": policy.min_down_payment_ratio.to_string(),
        "credit_ceiling": policy.credit_ceiling.to_string(),
        "income_commitment_divisor": policy.income_commitment_divisor.to_string(),
        "finance_cost_factor": policy.finance_cost_factor.to_string(),
        "reference_term_months": policy.reference_term_months,
    });

    Ok(with_metadata(
        "PPA affordability check (stepped fee table, reference installment)",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Policy must be valid.
fn evaluate_unchecked(request: &LoanRequest, policy: &PpaPolicy) -> PpaResult {
    let price = request.motorcycle_price;
    let down = request.down_payment;
    let income = request.monthly_income;

    let breakdown = affordability_with(policy, request.financed_amount());
    let max_installment = policy.max_installment(income);
    let min_ratio_down = price * policy.min_down_payment_ratio;

    let mut reasons: Vec<RejectionReason> = Vec::new();
    if down < policy.min_down_payment {
        reasons.push(RejectionReason::DownPaymentBelowMinimum);
    }
    if down < min_ratio_down {
        reasons.push(RejectionReason::DownPaymentBelowRatio);
    }

    let over_ceiling = breakdown.financed_amount > policy.credit_ceiling;
    if over_ceiling {
        reasons.push(RejectionReason::CreditCeilingExceeded);
    }

    let over_income = breakdown.reference_installment > max_installment;
    if over_income {
        reasons.push(RejectionReason::IncomeRatioExceeded);
    }

    let (income_supported, _) = solver::solve(policy, income);
    let max_financeable = income_supported.min(policy.credit_ceiling);

    let down_payment_alternatives = if !over_ceiling && !over_income && !reasons.is_empty() {
        Some(DownPaymentAlternatives {
            required_min_down_payment: min_ratio_down.max(policy.min_down_payment),
            max_motorcycle_price_for_current_down_payment: down / policy.min_down_payment_ratio,
        })
    } else {
        None
    };

    tracing::debug!(
        financed_amount = %breakdown.financed_amount,
        fee = %breakdown.fee,
        reference_installment = %breakdown.reference_installment,
        max_installment = %max_installment,
        ?reasons,
        "ppa rules applied"
    );

    PpaResult {
        approved: reasons.is_empty(),
        reasons,
        rejected_by_credit_ceiling: over_ceiling,
        rejected_by_income_ratio: over_income,
        financed_amount: breakdown.financed_amount,
        fee: breakdown.fee,
        total_payable: breakdown.total_payable,
        reference_installment: breakdown.reference_installment,
        max_installment,
        max_financeable_amount: max_financeable,
        suggested_min_down_payment: (price - max_financeable).max(Decimal::ZERO),
        suggested_max_motorcycle_price: (down + max_financeable).max(Decimal::ZERO),
        down_payment_alternatives,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
