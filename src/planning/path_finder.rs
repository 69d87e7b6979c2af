//! Best-first search over the segment graph
//!
//! `PathFinder` turns a current body state and a goal segment into a plan:
//! an ordered sequence of segments the behavior layer executes one at a
//! time, re-planning as the real body state evolves. Entry into the graph
//! is feasibility-gated (the highest-scoring segment feasible from the
//! current state), and expansion is ordered by a binary-heap frontier keyed
//! on accumulated cost plus the state-distance heuristic.

use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::rc::Rc;

use crate::common::{MotionSegment, Plan, SegmentId};
use crate::graph::{SegmentGraph, DEFAULT_EDGE_WEIGHT};
use crate::state::PhysicalState;

/// How the state-distance heuristic enters the search cost.
///
/// The reference behavior folds the heuristic into the accumulated cost
/// permanently at each expansion, so a detour taken early keeps paying for
/// states far from the goal. That is not guaranteed optimal, but it is what
/// shipped, so it is the default. `Lookahead` is canonical A*: the
/// heuristic only orders the frontier and is recomputed fresh per node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostModel {
    /// Heuristic folded into accumulated cost (reference-compatible)
    FoldedHeuristic,
    /// Canonical A*: f = g + h, with h used for ordering only
    Lookahead,
}

impl Default for CostModel {
    fn default() -> Self {
        CostModel::FoldedHeuristic
    }
}

/// Frontier entry for the best-first expansion
struct FrontierEntry {
    /// Heap key: lowest priority pops first
    priority: OrderedFloat<f64>,
    /// Insertion sequence, the deterministic tie-break (earlier pops first)
    seq: u64,
    id: SegmentId,
    /// Accumulated cost g (includes the heuristic under `FoldedHeuristic`)
    cost: f64,
    path: Vec<SegmentId>,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for FrontierEntry {}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Plans segment sequences over a [`SegmentGraph`]
#[derive(Debug, Default)]
pub struct PathFinder {
    cost_model: CostModel,
}

impl PathFinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cost_model(cost_model: CostModel) -> Self {
        Self { cost_model }
    }

    pub fn cost_model(&self) -> CostModel {
        self.cost_model
    }

    /// Pick the search entry point for the current state: the registered
    /// segment with the highest feasibility score among those feasible.
    /// Ties keep the first-registered segment. `None` when nothing in the
    /// graph is feasible.
    pub fn select_entry_point(
        &self,
        graph: &SegmentGraph,
        current: &PhysicalState,
    ) -> Option<SegmentId> {
        let mut best: Option<(SegmentId, f64)> = None;
        for segment in graph.iter_segments() {
            if !segment.is_feasible(current) {
                continue;
            }
            let score = segment.feasibility_score(current);
            // A NaN score from a misbehaving collaborator ranks below every
            // real score so it can never hold the championship
            let score = if score.is_nan() { f64::NEG_INFINITY } else { score };
            let better = match best {
                None => true,
                Some((_, best_score)) => score > best_score,
            };
            if better {
                best = Some((segment.id(), score));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Find a segment sequence from the current state to the goal segment.
    ///
    /// Returns an empty plan when the goal is unreachable from every
    /// feasible entry point; that is a normal outcome for the caller to
    /// retry on a later tick with a fresh state snapshot, not an error.
    /// When no graph node is feasible but the goal itself is, the plan is
    /// the single goal segment.
    pub fn find_path(
        &self,
        graph: &SegmentGraph,
        current: &PhysicalState,
        goal: &Rc<dyn MotionSegment>,
    ) -> Plan {
        let goal_id = goal.id();

        let entry = match self.select_entry_point(graph, current) {
            Some(entry) => entry,
            None => {
                if goal.is_feasible(current) {
                    return vec![goal.clone()];
                }
                return Vec::new();
            }
        };
        if entry == goal_id {
            return vec![goal.clone()];
        }

        let goal_state = goal.required_state();
        let mut frontier = BinaryHeap::new();
        let mut closed: HashSet<SegmentId> = HashSet::new();
        let mut best_cost: HashMap<SegmentId, f64> = HashMap::new();
        let mut seq = 0u64;

        best_cost.insert(entry, 0.0);
        frontier.push(FrontierEntry {
            priority: OrderedFloat(0.0),
            seq,
            id: entry,
            cost: 0.0,
            path: vec![entry],
        });

        while let Some(item) = frontier.pop() {
            if item.id == goal_id {
                return resolve_plan(graph, goal, &item.path);
            }
            if !closed.insert(item.id) {
                // Stale entry superseded by a cheaper one
                continue;
            }
            if graph.segment(item.id).is_none() {
                // Placeholder discovered through an edge: no registered
                // segment, so it is expanded with empty further adjacency
                // even if edges were declared outward from it
                continue;
            }

            for neighbor in graph.neighbors(item.id) {
                if closed.contains(&neighbor) {
                    continue;
                }
                let edge_cost = graph
                    .edge_weight(item.id, neighbor)
                    .unwrap_or(DEFAULT_EDGE_WEIGHT);
                // Dangling neighbors have no cached transition; their
                // heuristic term is zero rather than a crash
                let heuristic = graph
                    .transition_state(neighbor)
                    .map(|transition| transition.distance(goal_state))
                    .unwrap_or(0.0);
                let (new_cost, priority) = match self.cost_model {
                    CostModel::FoldedHeuristic => {
                        let g = item.cost + edge_cost + heuristic;
                        (g, g)
                    }
                    CostModel::Lookahead => {
                        let g = item.cost + edge_cost;
                        (g, g + heuristic)
                    }
                };
                if let Some(&known) = best_cost.get(&neighbor) {
                    if known <= new_cost {
                        continue;
                    }
                }
                best_cost.insert(neighbor, new_cost);
                let mut path = item.path.clone();
                path.push(neighbor);
                seq += 1;
                frontier.push(FrontierEntry {
                    priority: OrderedFloat(priority),
                    seq,
                    id: neighbor,
                    cost: new_cost,
                    path,
                });
            }
        }

        Vec::new()
    }
}

/// Resolve a path of ids to segment handles. The goal resolves through the
/// caller's handle so a goal never registered with the graph still appears
/// in its own plan.
fn resolve_plan(graph: &SegmentGraph, goal: &Rc<dyn MotionSegment>, path: &[SegmentId]) -> Plan {
    path.iter()
        .filter_map(|&id| {
            if id == goal.id() {
                Some(goal.clone())
            } else {
                graph.segment(id).cloned()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    struct StubSegment {
        id: SegmentId,
        required: PhysicalState,
        target: PhysicalState,
        connected: Vec<SegmentId>,
        feasible: bool,
        score: f64,
    }

    impl StubSegment {
        fn new(id: u64, connected: &[u64], feasible: bool, score: f64) -> Rc<Self> {
            Rc::new(Self {
                id: SegmentId::new(id),
                required: PhysicalState::new()
                    .with_root_position(Vector3::new(id as f64, 0.0, 0.0)),
                target: PhysicalState::new()
                    .with_root_position(Vector3::new(id as f64 + 1.0, 0.0, 0.0)),
                connected: connected.iter().map(|&c| SegmentId::new(c)).collect(),
                feasible,
                score,
            })
        }
    }

    impl MotionSegment for StubSegment {
        fn id(&self) -> SegmentId {
            self.id
        }

        fn required_state(&self) -> &PhysicalState {
            &self.required
        }

        fn target_state(&self) -> &PhysicalState {
            &self.target
        }

        fn connected_segments(&self) -> Vec<SegmentId> {
            self.connected.clone()
        }

        fn is_feasible(&self, _state: &PhysicalState) -> bool {
            self.feasible
        }

        fn feasibility_score(&self, _state: &PhysicalState) -> f64 {
            self.score
        }
    }

    fn plan_ids(plan: &Plan) -> Vec<u64> {
        plan.iter().map(|segment| segment.id().raw()).collect()
    }

    /// A -> B -> C chain with A the best-scoring feasible entry
    fn chain_graph() -> (SegmentGraph, Rc<StubSegment>) {
        let mut graph = SegmentGraph::new();
        let a = StubSegment::new(1, &[2], true, 0.9);
        let b = StubSegment::new(2, &[3], true, 0.4);
        let c = StubSegment::new(3, &[], true, 0.3);
        graph.add_node(a);
        graph.add_node(b);
        graph.add_node(c.clone());
        (graph, c)
    }

    #[test]
    fn test_end_to_end_chain() {
        let (graph, goal) = chain_graph();
        let finder = PathFinder::new();
        let plan = finder.find_path(&graph, &PhysicalState::new(), &(goal as Rc<dyn MotionSegment>));
        assert_eq!(plan_ids(&plan), vec![1, 2, 3]);
    }

    #[test]
    fn test_both_cost_models_solve_chain() {
        let (graph, goal) = chain_graph();
        let goal: Rc<dyn MotionSegment> = goal;
        for cost_model in [CostModel::FoldedHeuristic, CostModel::Lookahead] {
            let finder = PathFinder::with_cost_model(cost_model);
            let plan = finder.find_path(&graph, &PhysicalState::new(), &goal);
            assert_eq!(plan_ids(&plan), vec![1, 2, 3]);
        }
    }

    #[test]
    fn test_self_goal_shortcut() {
        let mut graph = SegmentGraph::new();
        let a = StubSegment::new(1, &[2], true, 0.95);
        let b = StubSegment::new(2, &[3], true, 0.4);
        let c = StubSegment::new(3, &[], true, 0.3);
        graph.add_node(a.clone());
        graph.add_node(b);
        graph.add_node(c);

        // Entry selection picks the goal itself
        let goal: Rc<dyn MotionSegment> = a;
        let plan = PathFinder::new().find_path(&graph, &PhysicalState::new(), &goal);
        assert_eq!(plan_ids(&plan), vec![1]);
    }

    #[test]
    fn test_direct_feasible_shortcut() {
        let mut graph = SegmentGraph::new();
        graph.add_node(StubSegment::new(1, &[], false, 0.0));
        graph.add_node(StubSegment::new(2, &[], false, 0.0));

        // Nothing in the graph is feasible, but the goal is
        let goal: Rc<dyn MotionSegment> = StubSegment::new(9, &[], true, 0.8);
        let plan = PathFinder::new().find_path(&graph, &PhysicalState::new(), &goal);
        assert_eq!(plan_ids(&plan), vec![9]);
    }

    #[test]
    fn test_nothing_feasible_goal_infeasible() {
        let mut graph = SegmentGraph::new();
        graph.add_node(StubSegment::new(1, &[], false, 0.0));
        let goal: Rc<dyn MotionSegment> = StubSegment::new(9, &[], false, 0.0);
        let plan = PathFinder::new().find_path(&graph, &PhysicalState::new(), &goal);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_no_path_to_disconnected_goal() {
        let mut graph = SegmentGraph::new();
        graph.add_node(StubSegment::new(1, &[2], true, 0.9));
        graph.add_node(StubSegment::new(2, &[], true, 0.4));
        // Goal registered but nothing reaches it, and it is infeasible
        let goal = StubSegment::new(3, &[], false, 0.0);
        graph.add_node(goal.clone());

        let plan =
            PathFinder::new().find_path(&graph, &PhysicalState::new(), &(goal as Rc<dyn MotionSegment>));
        assert!(plan.is_empty());
    }

    #[test]
    fn test_removal_breaks_path() {
        let (mut graph, goal) = chain_graph();
        graph.remove_node(SegmentId::new(2));
        let plan =
            PathFinder::new().find_path(&graph, &PhysicalState::new(), &(goal as Rc<dyn MotionSegment>));
        assert!(plan.is_empty());
    }

    #[test]
    fn test_cycle_terminates() {
        let mut graph = SegmentGraph::new();
        // A and B reference each other; goal C hangs off B
        graph.add_node(StubSegment::new(1, &[2], true, 0.9));
        graph.add_node(StubSegment::new(2, &[1, 3], true, 0.4));
        let goal = StubSegment::new(3, &[], true, 0.3);
        graph.add_node(goal.clone());

        let plan =
            PathFinder::new().find_path(&graph, &PhysicalState::new(), &(goal as Rc<dyn MotionSegment>));
        assert_eq!(plan_ids(&plan), vec![1, 2, 3]);
    }

    #[test]
    fn test_unreachable_goal_in_cycle_terminates() {
        let mut graph = SegmentGraph::new();
        graph.add_node(StubSegment::new(1, &[2], true, 0.9));
        graph.add_node(StubSegment::new(2, &[1], true, 0.4));
        let goal = StubSegment::new(3, &[], false, 0.0);
        graph.add_node(goal.clone());

        let plan =
            PathFinder::new().find_path(&graph, &PhysicalState::new(), &(goal as Rc<dyn MotionSegment>));
        assert!(plan.is_empty());
    }

    #[test]
    fn test_dangling_neighbor_tolerated() {
        let mut graph = SegmentGraph::new();
        // A declares a connection to id 99, which is never registered
        graph.add_node(StubSegment::new(1, &[99, 2], true, 0.9));
        let goal = StubSegment::new(2, &[], true, 0.4);
        graph.add_node(goal.clone());

        let plan =
            PathFinder::new().find_path(&graph, &PhysicalState::new(), &(goal as Rc<dyn MotionSegment>));
        assert_eq!(plan_ids(&plan), vec![1, 2]);
    }

    #[test]
    fn test_unregistered_node_is_dead_end() {
        let mut graph = SegmentGraph::new();
        graph.add_node(StubSegment::new(1, &[], true, 0.9));
        let goal = StubSegment::new(3, &[], false, 0.0);
        graph.add_node(goal.clone());
        // Id 2 exists only as edge endpoints, never registered: the only
        // declared route to the goal runs through it
        graph.add_edge(SegmentId::new(1), SegmentId::new(2), 1.0);
        graph.add_edge(SegmentId::new(2), SegmentId::new(3), 1.0);

        let plan =
            PathFinder::new().find_path(&graph, &PhysicalState::new(), &(goal as Rc<dyn MotionSegment>));
        assert!(plan.is_empty());
    }

    #[test]
    fn test_nan_score_never_wins_entry() {
        let mut graph = SegmentGraph::new();
        graph.add_node(StubSegment::new(1, &[], true, f64::NAN));
        graph.add_node(StubSegment::new(2, &[], true, 0.1));

        let entry = PathFinder::new().select_entry_point(&graph, &PhysicalState::new());
        assert_eq!(entry, Some(SegmentId::new(2)));
    }

    #[test]
    fn test_entry_prefers_highest_score() {
        let mut graph = SegmentGraph::new();
        graph.add_node(StubSegment::new(1, &[], true, 0.2));
        graph.add_node(StubSegment::new(2, &[], true, 0.8));
        graph.add_node(StubSegment::new(3, &[], false, 1.0));

        let entry = PathFinder::new().select_entry_point(&graph, &PhysicalState::new());
        assert_eq!(entry, Some(SegmentId::new(2)));
    }

    #[test]
    fn test_entry_tie_keeps_first_registered() {
        let mut graph = SegmentGraph::new();
        graph.add_node(StubSegment::new(5, &[], true, 0.7));
        graph.add_node(StubSegment::new(6, &[], true, 0.7));

        let entry = PathFinder::new().select_entry_point(&graph, &PhysicalState::new());
        assert_eq!(entry, Some(SegmentId::new(5)));
    }

    #[test]
    fn test_out_of_range_scores_still_rank() {
        let mut graph = SegmentGraph::new();
        graph.add_node(StubSegment::new(1, &[], true, 7.3));
        graph.add_node(StubSegment::new(2, &[], true, 0.9));

        let entry = PathFinder::new().select_entry_point(&graph, &PhysicalState::new());
        assert_eq!(entry, Some(SegmentId::new(1)));
    }

    #[test]
    fn test_weighted_detour_preferred() {
        // Two routes to the goal: direct edge with weight 10, detour with
        // total weight 2. Targets all sit at the goal's required state so
        // the heuristic is identical along both routes.
        let goal_position = Vector3::new(0.0, 0.0, 0.0);
        let make = |id: u64, score: f64| -> Rc<StubSegment> {
            Rc::new(StubSegment {
                id: SegmentId::new(id),
                required: PhysicalState::new().with_root_position(goal_position),
                target: PhysicalState::new().with_root_position(goal_position),
                connected: vec![],
                feasible: true,
                score,
            })
        };
        let mut graph = SegmentGraph::new();
        let start = make(1, 0.9);
        let via = make(2, 0.1);
        let goal = make(3, 0.1);
        graph.add_node(start);
        graph.add_node(via);
        graph.add_node(goal.clone());
        graph.add_edge(SegmentId::new(1), SegmentId::new(3), 10.0);
        graph.add_edge(SegmentId::new(1), SegmentId::new(2), 1.0);
        graph.add_edge(SegmentId::new(2), SegmentId::new(3), 1.0);

        let plan =
            PathFinder::new().find_path(&graph, &PhysicalState::new(), &(goal as Rc<dyn MotionSegment>));
        assert_eq!(plan_ids(&plan), vec![1, 2, 3]);
    }
}
