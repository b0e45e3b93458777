//! Whole-step validation: every field of a step is checked and all errors
//! are reported together, keyed by field name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::validators::*;
use crate::ppa::LoanRequest;
use crate::types::Money;

/// Field name to user-facing message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepErrors(BTreeMap<String, String>);

impl StepErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn insert(&mut self, field: &str, error: FieldError) {
        self.0.insert(field.to_string(), error.message);
    }

    fn merge(&mut self, other: StepErrors) {
        self.0.extend(other.0);
    }

    /// Keep the value on success, record the message on failure.
    fn take<T>(&mut self, field: &str, result: FieldResult<T>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.insert(field, e);
                None
            }
        }
    }

    fn into_result<T>(self, value: impl FnOnce() -> Option<T>) -> Result<T, StepErrors> {
        if !self.is_empty() {
            return Err(self);
        }
        // every field passed, so every value is present
        value().ok_or(self)
    }
}

// ---------------------------------------------------------------------------
// Raw step inputs (as typed into the form)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentificationStep {
    pub user_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SellerStep {
    pub store: String,
    pub seller_name: String,
    pub seller_email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerStep {
    pub customer_name: String,
    pub cpf: String,
    /// "sim" / "nao"
    pub cnh: String,
    pub customer_email: String,
    pub phone: String,
}

/// Amounts already parsed from the masked inputs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DealStep {
    pub monthly_income: Option<Money>,
    pub motorcycle_price: Option<Money>,
    pub down_payment: Option<Money>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadForm {
    pub identification: IdentificationStep,
    /// Only required when the user is a seller.
    pub seller: Option<SellerStep>,
    pub customer: CustomerStep,
    pub deal: DealStep,
}

// ---------------------------------------------------------------------------
// Validated values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedSeller {
    pub store: String,
    pub seller_name: String,
    pub seller_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedCustomer {
    pub customer_name: String,
    /// Digits only.
    pub cpf: String,
    pub has_cnh: bool,
    pub customer_email: String,
    /// Digits only.
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedDeal {
    pub monthly_income: Money,
    pub motorcycle_price: Money,
    pub down_payment: Money,
}

impl ValidatedDeal {
    pub fn loan_request(&self) -> LoanRequest {
        LoanRequest::new(self.motorcycle_price, self.down_payment, self.monthly_income)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedLead {
    pub user_type: UserType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller: Option<ValidatedSeller>,
    pub customer: ValidatedCustomer,
    pub deal: ValidatedDeal,
}

// ---------------------------------------------------------------------------
// Step validators
// ---------------------------------------------------------------------------

pub fn validate_identification(step: &IdentificationStep) -> Result<UserType, StepErrors> {
    let mut errors = StepErrors::default();
    let user_type = errors.take("user_type", validate_user_type(&step.user_type));
    errors.into_result(|| user_type)
}

pub fn validate_seller(step: &SellerStep) -> Result<ValidatedSeller, StepErrors> {
    let mut errors = StepErrors::default();

    let store = step.store.trim();
    if store.is_empty() {
        errors.insert("store", FieldError::new("Informe a loja."));
    }
    let seller_name = errors.take(
        "seller_name",
        validate_required_name(&step.seller_name, "Nome do vendedor"),
    );
    let seller_email = errors.take("seller_email", validate_email(&step.seller_email));

    errors.into_result(|| {
        Some(ValidatedSeller {
            store: store.to_string(),
            seller_name: seller_name?,
            seller_email: seller_email?,
        })
    })
}

pub fn validate_customer(step: &CustomerStep) -> Result<ValidatedCustomer, StepErrors> {
    let mut errors = StepErrors::default();

    let customer_name = errors.take(
        "customer_name",
        validate_required_name(&step.customer_name, "Nome do cliente"),
    );
    let cpf = errors.take("cpf", validate_cpf(&step.cpf));
    let has_cnh = errors.take("cnh", validate_cnh(&step.cnh));
    let customer_email = errors.take("customer_email", validate_email(&step.customer_email));
    let phone = errors.take("phone", validate_phone(&step.phone));

    errors.into_result(|| {
        Some(ValidatedCustomer {
            customer_name: customer_name?,
            cpf: cpf?,
            has_cnh: has_cnh?,
            customer_email: customer_email?,
            phone: phone?,
        })
    })
}

pub fn validate_deal(step: &DealStep) -> Result<ValidatedDeal, StepErrors> {
    let mut errors = StepErrors::default();

    let monthly_income = errors.take(
        "monthly_income",
        validate_positive_amount(step.monthly_income, "Renda mensal"),
    );
    let motorcycle_price = errors.take(
        "motorcycle_price",
        validate_positive_amount(step.motorcycle_price, "Valor da moto"),
    );
    let down_payment = errors.take(
        "down_payment",
        validate_positive_amount(step.down_payment, "Valor de entrada"),
    );

    if let (Some(price), Some(down)) = (step.motorcycle_price, step.down_payment) {
        // overrides a positivity message for the same field
        if let Err(e) = validate_down_payment_vs_price(price, down) {
            errors.insert("down_payment", e);
        }
    }

    errors.into_result(|| {
        Some(ValidatedDeal {
            monthly_income: monthly_income?,
            motorcycle_price: motorcycle_price?,
            down_payment: down_payment?,
        })
    })
}

/// Validate the whole form, step by step. The seller step is only checked
/// for sellers; a missing seller step then counts as blank fields.
pub fn validate_lead(form: &LeadForm) -> Result<ValidatedLead, StepErrors> {
    let mut errors = StepErrors::default();

    let user_type = match validate_identification(&form.identification) {
        Ok(t) => Some(t),
        Err(e) => {
            errors.merge(e);
            None
        }
    };

    let seller = match user_type {
        Some(UserType::Seller) => {
            let blank = SellerStep::default();
            match validate_seller(form.seller.as_ref().unwrap_or(&blank)) {
                Ok(s) => Some(s),
                Err(e) => {
                    errors.merge(e);
                    None
                }
            }
        }
        _ => None,
    };

    let customer = validate_customer(&form.customer)
        .map_err(|e| errors.merge(e))
        .ok();
    let deal = validate_deal(&form.deal).map_err(|e| errors.merge(e)).ok();

    errors.into_result(|| {
        Some(ValidatedLead {
            user_type: user_type?,
            seller,
            customer: customer?,
            deal: deal?,
        })
    })
}
