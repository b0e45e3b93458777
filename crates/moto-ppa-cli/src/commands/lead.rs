use clap::Args;
use serde_json::{json, Value};

use moto_ppa_core::lead::{validate_lead, LeadForm, LeadPayload, SubmissionId};
use moto_ppa_core::ppa::{run_ppa_with_policy, PpaPolicy};
use moto_ppa_core::PpaError;

use crate::input;

/// Arguments for lead validation
#[derive(Args)]
pub struct ValidateLeadArgs {
    /// Path to JSON lead form (or pipe it on stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Reuse this submission id instead of generating one
    #[arg(long)]
    pub submission_id: Option<i64>,
}

/// Validate every step of the form, run the PPA on the deal and, when it is
/// approved, build the payload. Invalid forms are reported as data, not as
/// an error exit.
pub fn run_validate_lead(
    args: ValidateLeadArgs,
    policy: &PpaPolicy,
) -> Result<Value, Box<dyn std::error::Error>> {
    let form: LeadForm = input::read_input(args.input.as_deref())?
        .ok_or("--input file is required (or pipe the form on stdin)")?;

    let lead = match validate_lead(&form) {
        Ok(lead) => lead,
        Err(errors) => {
            tracing::info!(fields = errors.len(), "lead form rejected");
            return Ok(json!({ "valid": false, "errors": errors }));
        }
    };

    let ppa = run_ppa_with_policy(&lead.deal.loan_request(), policy)?;
    let id = args
        .submission_id
        .map(SubmissionId::from_millis)
        .unwrap_or_else(SubmissionId::generate);

    let submission = LeadPayload::for_submission_with_policy(&lead, &ppa.result, id, policy);
    let (payload, blocked) = match submission {
        Ok(payload) => (Some(payload), None),
        Err(e @ PpaError::SubmissionBlocked { .. }) => (None, Some(e.to_string())),
        Err(e) => return Err(e.into()),
    };

    Ok(json!({
        "valid": true,
        "lead": lead,
        "ppa": ppa,
        "payload": payload,
        "submission_blocked": blocked,
    }))
}
