// Physical body state module

pub mod physical_state;

pub use physical_state::*;
