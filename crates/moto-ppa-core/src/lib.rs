pub mod currency;
pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "ppa")]
pub mod ppa;

#[cfg(feature = "simulation")]
pub mod simulation;

#[cfg(feature = "lead")]
pub mod lead;

pub use error::PpaError;
pub use types::*;

/// Standard result type for all moto-ppa operations
pub type PpaOutcome<T> = Result<T, PpaError>;
