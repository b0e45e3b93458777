pub mod lead;
pub mod ppa;
pub mod simulation;
