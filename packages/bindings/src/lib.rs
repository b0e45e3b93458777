use napi::Result as NapiResult;
use napi_derive::napi;
use serde_json::json;

use moto_ppa_core::lead::{validate_lead as validate_lead_form, LeadForm};
use moto_ppa_core::ppa::{self, LoanRequest, MaxCreditInput, PpaPolicy};
use moto_ppa_core::simulation::{self, SimulationInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// PPA
// ---------------------------------------------------------------------------

#[napi]
pub fn evaluate_ppa(input_json: String) -> NapiResult<String> {
    let input: LoanRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = ppa::run_ppa(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn max_credit(input_json: String) -> NapiResult<String> {
    let input: MaxCreditInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        ppa::calculate_max_credit(&input, &PpaPolicy::default()).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// pt-BR message for a loan request, as plain text.
#[napi]
pub fn format_decision(input_json: String) -> NapiResult<String> {
    let input: LoanRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = ppa::run_ppa(&input).map_err(to_napi_error)?;
    Ok(ppa::format_decision(&input, &output.result))
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

#[napi]
pub fn simulate_installments(input_json: String) -> NapiResult<String> {
    let input: SimulationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = simulation::simulate(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Lead
// ---------------------------------------------------------------------------

/// `{ valid: true, lead }` or `{ valid: false, errors: { field: message } }`.
#[napi]
pub fn validate_lead(input_json: String) -> NapiResult<String> {
    let form: LeadForm = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = match validate_lead_form(&form) {
        Ok(lead) => json!({ "valid": true, "lead": lead }),
        Err(errors) => json!({ "valid": false, "errors": errors }),
    };
    serde_json::to_string(&output).map_err(to_napi_error)
}
