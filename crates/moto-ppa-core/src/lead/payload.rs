use serde::{Deserialize, Serialize};
use std::fmt;

use super::steps::ValidatedLead;
use crate::ppa::{PpaPolicy, PpaResult};
use crate::{types::Money, PpaError, PpaOutcome};

/// `SUB-<unix millis>`, one per submitted lead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(String);

impl SubmissionId {
    pub fn generate() -> Self {
        Self::from_millis(chrono::Utc::now().timestamp_millis())
    }

    pub fn from_millis(millis: i64) -> Self {
        SubmissionId(format!("SUB-{millis}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Flat record in the layout the lead spreadsheet expects. Seller columns
/// are empty strings for buyers; amounts are plain JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadPayload {
    pub submission_id: SubmissionId,
    pub tipo_usuario: String,
    pub loja: String,
    pub nome_vendedor: String,
    pub email_vendedor: String,
    pub nome_cliente: String,
    pub cpf: String,
    /// "sim" / "nao"
    pub cnh: String,
    pub email_cliente: String,
    pub telefone: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub renda_mensal: Option<Money>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub valor_moto: Option<Money>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub valor_entrada: Option<Money>,
}

impl LeadPayload {
    pub fn from_validated(lead: &ValidatedLead, submission_id: SubmissionId) -> Self {
        let (loja, nome_vendedor, email_vendedor) = match &lead.seller {
            Some(s) => (
                s.store.clone(),
                s.seller_name.clone(),
                s.seller_email.clone(),
            ),
            None => (String::new(), String::new(), String::new()),
        };

        LeadPayload {
            submission_id,
            tipo_usuario: lead.user_type.as_str().to_string(),
            loja,
            nome_vendedor,
            email_vendedor,
            nome_cliente: lead.customer.customer_name.clone(),
            cpf: lead.customer.cpf.clone(),
            cnh: if lead.customer.has_cnh { "sim" } else { "nao" }.to_string(),
            email_cliente: lead.customer.customer_email.clone(),
            telefone: lead.customer.phone.clone(),
            renda_mensal: Some(lead.deal.monthly_income),
            valor_moto: Some(lead.deal.motorcycle_price),
            valor_entrada: Some(lead.deal.down_payment),
        }
    }

    /// Build the payload only for an approved PPA; a refused lead is never
    /// sent on.
    pub fn for_submission(
        lead: &ValidatedLead,
        result: &PpaResult,
        submission_id: SubmissionId,
    ) -> PpaOutcome<Self> {
        Self::for_submission_with_policy(lead, result, submission_id, &PpaPolicy::default())
    }

    /// As [`LeadPayload::for_submission`], with the block reasons worded
    /// after the policy `result` was evaluated under.
    pub fn for_submission_with_policy(
        lead: &ValidatedLead,
        result: &PpaResult,
        submission_id: SubmissionId,
        policy: &PpaPolicy,
    ) -> PpaOutcome<Self> {
        if !result.approved {
            let reasons = result
                .reasons
                .iter()
                .map(|r| r.describe(policy))
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(%reasons, "lead submission blocked");
            return Err(PpaError::SubmissionBlocked { reasons });
        }
        Ok(Self::from_validated(lead, submission_id))
    }

    pub fn to_json(&self) -> PpaOutcome<String> {
        Ok(serde_json::to_string(self)?)
    }
}
