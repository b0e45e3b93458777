use thiserror::Error;

#[derive(Debug, Error)]
pub enum PpaError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("Submission blocked: pre-approval not granted ({reasons})")]
    SubmissionBlocked { reasons: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for PpaError {
    fn from(e: serde_json::Error) -> Self {
        PpaError::SerializationError(e.to_string())
    }
}
