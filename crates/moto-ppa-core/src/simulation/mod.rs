pub mod installments;

pub use installments::{
    simulate, InstallmentOption, SimulationInput, SimulationOutput, DEFAULT_MONTHLY_RATE,
    DEFAULT_TERMS,
};
