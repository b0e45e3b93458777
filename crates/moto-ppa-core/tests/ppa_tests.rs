#![cfg(feature = "ppa")]

use moto_ppa_core::ppa::{
    calculate_max_credit, evaluate, fee_for, format_decision, reference_installment, run_ppa,
    LoanRequest, MaxCreditInput, PpaPolicy, RejectionReason, Suggestion,
};
use moto_ppa_core::PpaError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn close(actual: Decimal, expected: Decimal, tol: Decimal) -> bool {
    (actual - expected).abs() <= tol
}

/// Prices 4k..24k, down payments in 500 steps up to the price, and a spread
/// of incomes from nothing to comfortable.
fn request_grid() -> Vec<LoanRequest> {
    let incomes = [dec!(0), dec!(500), dec!(1_000), dec!(1_500), dec!(3_000), dec!(9_000)];
    let mut grid = Vec::new();
    let mut price = dec!(4_000);
    while price <= dec!(24_000) {
        let mut down = Decimal::ZERO;
        while down <= price {
            for income in incomes {
                grid.push(LoanRequest::new(price, down, income));
            }
            down += dec!(500);
        }
        price += dec!(1_000);
    }
    grid
}

// ===========================================================================
// Worked examples
// ===========================================================================

#[test]
fn test_example_comfortable_buyer_approved() {
    let result = evaluate(&LoanRequest::new(dec!(10_000), dec!(5_000), dec!(9_000)));

    assert_eq!(result.financed_amount, dec!(5_000));
    assert_eq!(result.fee, dec!(770));
    assert_eq!(result.total_payable, dec!(5_770));
    // 5770 * 2.44 / 36
    assert!(close(result.reference_installment, dec!(391.08), dec!(0.01)));
    assert_eq!(result.max_installment, dec!(3_000));
    assert!(result.approved);
}

#[test]
fn test_example_three_rule_rejection() {
    let result = evaluate(&LoanRequest::new(dec!(20_000), dec!(3_000), dec!(9_000)));

    assert!(!result.approved);
    assert_eq!(result.reasons.len(), 3);
    assert_eq!(
        result.reasons,
        vec![
            RejectionReason::DownPaymentBelowMinimum,
            RejectionReason::DownPaymentBelowRatio,
            RejectionReason::CreditCeilingExceeded,
        ]
    );
    assert!(result.rejected_by_credit_ceiling);
    assert_eq!(result.financed_amount, dec!(17_000));
}

#[test]
fn test_example_low_income_still_approved() {
    let result = evaluate(&LoanRequest::new(dec!(8_000), dec!(4_000), dec!(1_000)));

    assert_eq!(result.financed_amount, dec!(4_000));
    assert_eq!(result.total_payable, dec!(4_770));
    // 4770 * 2.44 / 36 = 323.3, under 1000 / 3
    assert!(close(result.reference_installment, dec!(323.3), dec!(0.001)));
    assert!(result.reference_installment <= result.max_installment);
    assert!(result.approved);
}

// ===========================================================================
// Properties over a grid of requests
// ===========================================================================

#[test]
fn test_fee_steps() {
    let cases = [
        (dec!(1), dec!(770)),
        (dec!(4_999.99), dec!(770)),
        (dec!(5_000), dec!(770)),
        (dec!(6_500), dec!(820)),
        (dec!(7_000), dec!(820)),
        (dec!(9_999), dec!(870)),
        (dec!(10_000), dec!(870)),
        (dec!(10_000.01), dec!(920)),
        (dec!(40_000), dec!(920)),
    ];
    for (amount, fee) in cases {
        assert_eq!(fee_for(amount), fee, "fee for {amount}");
    }
}

#[test]
fn test_approved_iff_all_four_rules_pass() {
    for req in request_grid() {
        let financed = req.motorcycle_price - req.down_payment;
        let expected = req.down_payment >= dec!(4_000)
            && req.down_payment >= req.motorcycle_price * dec!(0.4)
            && financed <= dec!(12_000)
            && reference_installment(financed) <= req.monthly_income / dec!(3);

        let result = evaluate(&req);
        assert_eq!(result.approved, expected, "{req:?}");
        assert_eq!(result.approved, result.reasons.is_empty());
    }
}

#[test]
fn test_max_financeable_never_above_ceiling() {
    for req in request_grid() {
        assert!(evaluate(&req).max_financeable_amount <= dec!(12_000));
    }
    let huge = evaluate(&LoanRequest::new(dec!(30_000), dec!(20_000), dec!(1_000_000)));
    assert_eq!(huge.max_financeable_amount, dec!(12_000));
}

#[test]
fn test_more_income_never_revokes_approval() {
    let incomes = [dec!(0), dec!(800), dec!(1_100), dec!(1_400), dec!(2_000), dec!(5_000)];
    let mut price = dec!(6_000);
    while price <= dec!(18_000) {
        let down = (price * dec!(0.5)).max(dec!(4_000));
        let mut was_approved = false;
        for income in incomes {
            let approved = evaluate(&LoanRequest::new(price, down, income)).approved;
            assert!(approved || !was_approved, "price {price}, income {income}");
            was_approved = approved;
        }
        price += dec!(500);
    }
}

#[test]
fn test_more_down_payment_never_adds_credit_rejections() {
    let price = dec!(20_000);
    for income in [dec!(900), dec!(1_500), dec!(4_000)] {
        let mut prev_ceiling = true;
        let mut prev_income = true;
        let mut down = Decimal::ZERO;
        while down <= price {
            let r = evaluate(&LoanRequest::new(price, down, income));
            assert!(!r.rejected_by_credit_ceiling || prev_ceiling, "down {down}");
            assert!(!r.rejected_by_income_ratio || prev_income, "down {down}");
            prev_ceiling = r.rejected_by_credit_ceiling;
            prev_income = r.rejected_by_income_ratio;
            down += dec!(250);
        }
    }
}

#[test]
fn test_down_payment_suggestion_round_trip() {
    let mut checked = 0;
    for req in request_grid() {
        let result = evaluate(&req);
        if !result.rejected_only_by_down_payment() {
            continue;
        }
        let suggestion = result.suggestion().unwrap();
        assert!(matches!(suggestion, Suggestion::DownPayment { .. }));

        let retry = LoanRequest {
            down_payment: suggestion.min_down_payment(),
            ..req.clone()
        };
        assert!(evaluate(&retry).approved, "{req:?} -> {retry:?}");
        checked += 1;
    }
    assert!(checked > 0);
}

#[test]
fn test_evaluation_is_deterministic() {
    let req = LoanRequest::new(dec!(13_500), dec!(4_200), dec!(2_750));
    assert_eq!(evaluate(&req), evaluate(&req));
}

// ===========================================================================
// Boundary and solver
// ===========================================================================

#[test]
fn test_run_ppa_rejects_down_payment_above_price() {
    let err = run_ppa(&LoanRequest::new(dec!(9_000), dec!(9_500), dec!(3_000))).unwrap_err();
    match err {
        PpaError::InvalidInput { field, .. } => assert_eq!(field, "down_payment"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_run_ppa_accepts_json_request() {
    let req: LoanRequest = serde_json::from_str(
        r#"{"motorcycle_price": "10000", "down_payment": 5000, "monthly_income": "9000.00"}"#,
    )
    .unwrap();
    let out = run_ppa(&req).unwrap();
    assert!(out.result.approved);
    assert_eq!(out.result.fee, dec!(770));
}

#[test]
fn test_max_credit_matches_evaluator() {
    let income = dec!(2_000);
    let out = calculate_max_credit(&MaxCreditInput { monthly_income: income }, &PpaPolicy::default())
        .unwrap();
    let result = evaluate(&LoanRequest::new(dec!(15_000), dec!(6_000), income));
    assert_eq!(out.result.max_financeable_amount, result.max_financeable_amount);
}

#[test]
fn test_message_for_rejected_request() {
    let req = LoanRequest::new(dec!(20_000), dec!(3_000), dec!(9_000));
    let msg = format_decision(&req, &evaluate(&req));
    assert!(msg.starts_with("Pré-Análise não concedida."));
    assert!(msg.contains("R$ 12.000,00"));
}

#[test]
fn test_oversized_income_is_rejected_not_evaluated() {
    let req = LoanRequest::new(
        dec!(10_000),
        dec!(5_000),
        dec!(30_000_000_000_000_000_000_000_000_000),
    );
    match run_ppa(&req).unwrap_err() {
        PpaError::InvalidInput { field, .. } => assert_eq!(field, "monthly_income"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
    let max = calculate_max_credit(
        &MaxCreditInput { monthly_income: Decimal::MAX },
        &PpaPolicy::default(),
    );
    assert!(max.is_err());
}
