//! Lead capture: validation of the multi-step form and the flat payload
//! handed to the lead spreadsheet.

pub mod payload;
pub mod steps;
pub mod validators;

pub use payload::{LeadPayload, SubmissionId};
pub use steps::{
    validate_customer, validate_deal, validate_identification, validate_lead, validate_seller,
    CustomerStep, DealStep, IdentificationStep, LeadForm, SellerStep, StepErrors,
    ValidatedCustomer, ValidatedDeal, ValidatedLead, ValidatedSeller,
};
pub use validators::{FieldError, FieldResult, UserType};
