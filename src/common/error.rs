//! Error types for section_planner

use std::fmt;

/// Main error type for planner operations.
///
/// The planning core itself is deliberately permissive: an unreachable goal
/// or an absent input degrades to an empty result rather than an error.
/// These variants cover the parameter-validation surface around it.
#[derive(Debug)]
pub enum PlannerError {
    /// Invalid parameter (negative weight, non-finite tolerance, etc.)
    InvalidParameter(String),
    /// Path planning failed in a way that is not "no path found"
    PlanningError(String),
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            PlannerError::PlanningError(msg) => write!(f, "Planning error: {}", msg),
        }
    }
}

impl std::error::Error for PlannerError {}

/// Result type alias for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;
