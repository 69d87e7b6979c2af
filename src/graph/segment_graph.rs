//! Directed graph of motion segments with weighted edges
//!
//! The graph is the planner's working set: the segment-generation
//! collaborator registers candidate segments as it produces them and
//! retires them when they expire, and the path finder searches over
//! whatever is registered at the time of the call. Nodes are keyed by
//! [`SegmentId`]; the resulting `targetState` of each segment is cached at
//! insertion so the search never re-derives it.
//!
//! The graph is a single shared mutable structure for single-threaded use:
//! mutate between planning calls, never during one. Rust's borrow rules
//! enforce this on one thread; multi-threaded callers must serialize
//! mutate-and-search critical sections behind an exclusive lock.

use std::collections::HashMap;
use std::rc::Rc;

use crate::common::{MotionSegment, PlannerError, PlannerResult, SegmentId};
use crate::state::PhysicalState;

/// Edge weight used when none was given explicitly
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

/// Directed graph over registered motion segments
#[derive(Default)]
pub struct SegmentGraph {
    /// Registered segments; placeholder nodes discovered through edges have
    /// adjacency entries but no registration here
    segments: HashMap<SegmentId, Rc<dyn MotionSegment>>,
    adjacency: HashMap<SegmentId, Vec<SegmentId>>,
    weights: HashMap<(SegmentId, SegmentId), f64>,
    /// Cached target state per segment, refreshed on (re-)registration
    transitions: HashMap<SegmentId, PhysicalState>,
    /// Node ids in first-insertion order; the entry-point scan iterates this
    /// so tie-breaking is deterministic
    insertion_order: Vec<SegmentId>,
}

impl SegmentGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a segment as a graph node.
    ///
    /// Idempotent: re-adding a segment refreshes its outgoing edges from its
    /// current `connected_segments()` and refreshes the cached target state,
    /// so a segment whose adjacency changed can be re-registered to pick up
    /// the new connections. Declared connections become edges with
    /// [`DEFAULT_EDGE_WEIGHT`].
    pub fn add_node(&mut self, segment: Rc<dyn MotionSegment>) {
        let id = segment.id();
        self.ensure_node(id);
        self.transitions.insert(id, segment.target_state().clone());
        for connected in segment.connected_segments() {
            self.add_default_edge(id, connected);
        }
        self.segments.insert(id, segment);
    }

    /// Insert a directed edge, creating placeholder nodes for unknown
    /// endpoints. The neighbor list gains `to` only if absent; the weight is
    /// overwritten unconditionally (last write wins). Negative weights are
    /// clamped to zero.
    pub fn add_edge(&mut self, from: SegmentId, to: SegmentId, weight: f64) {
        self.ensure_node(from);
        self.ensure_node(to);
        if let Some(neighbors) = self.adjacency.get_mut(&from) {
            if !neighbors.contains(&to) {
                neighbors.push(to);
            }
        }
        self.weights.insert((from, to), weight.max(0.0));
    }

    /// [`add_edge`](Self::add_edge) with [`DEFAULT_EDGE_WEIGHT`]
    pub fn add_default_edge(&mut self, from: SegmentId, to: SegmentId) {
        self.add_edge(from, to, DEFAULT_EDGE_WEIGHT);
    }

    /// Validating variant of [`add_edge`](Self::add_edge): rejects negative
    /// and non-finite weights instead of clamping them.
    pub fn try_add_edge(
        &mut self,
        from: SegmentId,
        to: SegmentId,
        weight: f64,
    ) -> PlannerResult<()> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(PlannerError::InvalidParameter(format!(
                "edge weight must be finite and non-negative, got {}",
                weight
            )));
        }
        self.add_edge(from, to, weight);
        Ok(())
    }

    /// Remove a node and every edge touching it. No-op if the id is unknown.
    pub fn remove_node(&mut self, id: SegmentId) {
        if !self.adjacency.contains_key(&id) {
            return;
        }
        for neighbors in self.adjacency.values_mut() {
            neighbors.retain(|&n| n != id);
        }
        self.weights.retain(|&(from, to), _| from != id && to != id);
        self.adjacency.remove(&id);
        self.transitions.remove(&id);
        self.segments.remove(&id);
        self.insertion_order.retain(|&n| n != id);
    }

    /// Outgoing neighbors of a node as a defensive copy; empty if unknown
    pub fn neighbors(&self, id: SegmentId) -> Vec<SegmentId> {
        self.adjacency.get(&id).cloned().unwrap_or_default()
    }

    pub fn contains_node(&self, id: SegmentId) -> bool {
        self.adjacency.contains_key(&id)
    }

    /// Weight of the edge `from -> to`, if present
    pub fn edge_weight(&self, from: SegmentId, to: SegmentId) -> Option<f64> {
        self.weights.get(&(from, to)).copied()
    }

    /// Cached target state of a segment; `None` for unknown ids and
    /// placeholder nodes
    pub fn transition_state(&self, id: SegmentId) -> Option<&PhysicalState> {
        self.transitions.get(&id)
    }

    /// Registered segment for an id; `None` for placeholder nodes
    pub fn segment(&self, id: SegmentId) -> Option<&Rc<dyn MotionSegment>> {
        self.segments.get(&id)
    }

    /// Node ids in first-insertion order, placeholders included
    pub fn node_ids(&self) -> &[SegmentId] {
        &self.insertion_order
    }

    /// Registered segments in first-insertion order
    pub fn iter_segments(&self) -> impl Iterator<Item = &Rc<dyn MotionSegment>> + '_ {
        self.insertion_order
            .iter()
            .filter_map(move |id| self.segments.get(id))
    }

    /// Number of nodes, placeholders included
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    fn ensure_node(&mut self, id: SegmentId) {
        if !self.adjacency.contains_key(&id) {
            self.adjacency.insert(id, Vec::new());
            self.insertion_order.push(id);
        }
    }
}
