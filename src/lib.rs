//! section_planner - motion-planning graph engine for articulated characters
//!
//! This crate plans sequences of short, pre-validated motion segments
//! ("sections") that move a simulated articulated body from its current
//! physical configuration toward a goal segment. It provides the physical
//! state snapshot and its distance metric, the directed segment graph, and
//! the feasibility-gated best-first path finder. Segment generation,
//! physics, and the behavior layer consuming the plans live outside this
//! crate behind the [`common::MotionSegment`] contract.

// Core modules
pub mod common;

// Planning modules
pub mod state;
pub mod graph;
pub mod planning;

// Re-export the planning surface for convenience
pub use common::{ContactPoint, JointState, MotionSegment, Plan, SegmentId};
pub use common::{PlannerError, PlannerResult};
pub use graph::{SegmentGraph, DEFAULT_EDGE_WEIGHT};
pub use planning::{CostModel, PathFinder};
pub use state::{PhysicalState, DEFAULT_SIMILARITY_TOLERANCE};
