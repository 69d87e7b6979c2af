//! Common types, traits, and error definitions for section_planner
//!
//! This module provides the foundational building blocks used across
//! the planning core.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
