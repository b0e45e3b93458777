//! Pre-pre-approval (PPA): the instant, local affordability check run before
//! any remote credit analysis.

pub mod affordability;
pub mod evaluator;
pub mod fees;
pub mod message;
pub mod policy;
pub mod solver;

pub use affordability::{
    affordability, affordability_with, reference_installment, total_payable, Affordability,
};
pub use evaluator::{
    evaluate, evaluate_with_policy, run_ppa, run_ppa_with_policy, validate_request,
    DownPaymentAlternatives, LoanRequest, PpaResult, RejectionReason, Suggestion,
};
pub use fees::{fee_for, fee_for_with, fee_tier_for, fee_tier_for_with, FeeTier, FEE_TIERS};
pub use message::{describe_reason, format_decision, format_decision_with_policy};
pub use policy::{ensure_within_max, PpaPolicy, MAX_AMOUNT, MAX_TERM_MONTHS};
pub use solver::{calculate_max_credit, max_financeable_by_income, MaxCreditInput, MaxCreditOutput};
