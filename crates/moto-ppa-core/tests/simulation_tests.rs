#![cfg(feature = "simulation")]

use moto_ppa_core::ppa::{evaluate, LoanRequest};
use moto_ppa_core::simulation::{simulate, SimulationInput};
use moto_ppa_core::time_value::pmt;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn input_for(price: Decimal, down: Decimal, limit: Decimal) -> SimulationInput {
    SimulationInput {
        motorcycle_price: price,
        down_payment: down,
        approved_limit: limit,
        monthly_rate: None,
        allowed_terms: None,
        selected_term: None,
    }
}

#[test]
fn test_simulation_after_approval() {
    let req = LoanRequest::new(dec!(16_000), dec!(7_000), dec!(6_000));
    let result = evaluate(&req);
    assert!(result.approved);

    let mut input = input_for(req.motorcycle_price, req.down_payment, result.max_financeable_amount);
    input.selected_term = Some(36);
    let out = simulate(&input).unwrap();

    assert_eq!(out.result.financed_amount, dec!(9_000));
    assert_eq!(out.result.down_payment, dec!(7_000));
    assert_eq!(out.result.selected.term_months, 36);
    assert!(out.warnings.is_empty());
}

#[test]
fn test_quoted_installment_matches_pmt() {
    let out = simulate(&input_for(dec!(10_000), dec!(4_000), dec!(12_000))).unwrap();
    for option in &out.result.options {
        let exact = pmt(dec!(0.025), option.term_months, dec!(-6_000), Decimal::ZERO).unwrap();
        assert!((option.installment - exact).abs() <= dec!(0.005), "term {}", option.term_months);
        assert_eq!(option.total_paid, option.installment * Decimal::from(option.term_months));
    }
}

#[test]
fn test_limit_pushes_down_payment_up() {
    // Income supports far less than the requested 10k.
    let req = LoanRequest::new(dec!(14_000), dec!(4_000), dec!(1_500));
    let result = evaluate(&req);
    assert!(!result.approved);

    let limit = result.max_financeable_amount;
    let out = simulate(&input_for(req.motorcycle_price, req.down_payment, limit)).unwrap();
    assert_eq!(out.result.financed_amount, limit);
    assert_eq!(out.result.down_payment, req.motorcycle_price - limit);
    assert!(out.result.at_limit);
}

#[test]
fn test_custom_rate_and_terms() {
    let mut input = input_for(dec!(9_000), dec!(5_000), dec!(12_000));
    input.monthly_rate = Some(dec!(0.019));
    input.allowed_terms = Some(vec![6, 18]);
    let out = simulate(&input).unwrap();

    let terms: Vec<u32> = out.result.options.iter().map(|o| o.term_months).collect();
    assert_eq!(terms, vec![6, 18]);
    assert_eq!(out.result.selected.term_months, 6);
    assert_eq!(out.result.monthly_rate, dec!(0.019));
}

#[test]
fn test_unbounded_term_is_rejected() {
    let mut input = input_for(dec!(14_000), dec!(6_000), dec!(12_000));
    input.allowed_terms = Some(vec![12, 5_000]);
    assert!(simulate(&input).is_err());
}
