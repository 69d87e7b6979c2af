//! The motion-segment contract consumed by the planning core

use crate::common::types::SegmentId;
use crate::state::PhysicalState;

/// A reusable, pre-validated short physical motion with a declared
/// precondition and postcondition state.
///
/// Segments are produced and owned by the segment-generation collaborator
/// (trajectory generators, section solver); the planning core only reads
/// them. Implementations are shared as `Rc<dyn MotionSegment>` and keyed by
/// [`SegmentId`], so the graph may hold cyclic references without issue.
///
/// Feasibility is collaborator-defined. The core tolerates misbehaving
/// implementations: scores outside [0,1] still rank (just not
/// meaningfully), and `connected_segments` may name ids that were never
/// registered with the graph.
pub trait MotionSegment {
    /// Stable handle for this segment, allocated by the segment generator
    fn id(&self) -> SegmentId;

    /// State the body must be in (within tolerance) before executing
    fn required_state(&self) -> &PhysicalState;

    /// State the body ends in after executing
    fn target_state(&self) -> &PhysicalState;

    /// Segments reachable immediately after this one, in preference order
    fn connected_segments(&self) -> Vec<SegmentId>;

    /// Whether the precondition is satisfiable from `state`
    fn is_feasible(&self, state: &PhysicalState) -> bool;

    /// Confidence that the precondition is satisfiable from `state`,
    /// nominally in [0,1] with higher meaning more confident
    fn feasibility_score(&self, state: &PhysicalState) -> f64;
}
