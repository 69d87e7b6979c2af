// Section planning demo
//
// Builds a small synthetic library of motion segments (a stand-up and
// step sequence with jittered states), registers them in a segment graph,
// plans a path from the current body state to a goal segment, and plots
// the planned root trajectory.

use gnuplot::{AxesCommon, Caption, Color, Figure, PointSize, PointSymbol};
use itertools::Itertools;
use nalgebra::{UnitQuaternion, Vector3};
use rand::prelude::*;
use rand_distr::Normal;
use std::collections::HashMap;
use std::rc::Rc;

use section_planner::{
    MotionSegment, PathFinder, PhysicalState, Plan, SegmentGraph, SegmentId,
};

const SHOW_ANIMATION: bool = true;
const FEASIBILITY_TOLERANCE: f64 = 0.75; // state distance below which a segment is startable
const STATE_JITTER_STD: f64 = 0.02; // [m] noise on synthetic segment states

/// Segment backed by fixed precondition/postcondition snapshots
struct DemoSegment {
    id: SegmentId,
    required: PhysicalState,
    target: PhysicalState,
    connected: Vec<SegmentId>,
}

impl MotionSegment for DemoSegment {
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

    fn is_feasible(&self, state: &PhysicalState) -> bool {
        self.required.is_similar_to(state, FEASIBILITY_TOLERANCE)
    }

    fn feasibility_score(&self, state: &PhysicalState) -> f64 {
        1.0 / (1.0 + self.required.distance(state))
    }
}

/// Body state with the root at `(x, 0, z)` facing `yaw`, plus a pair of
/// jittered leg joints so the joint term of the distance metric is exercised
fn body_state<R: Rng>(x: f64, z: f64, yaw: f64, rng: &mut R, noise: &Normal<f64>) -> PhysicalState {
    let mut state = PhysicalState::new()
        .with_root_position(Vector3::new(x + noise.sample(rng), 0.9, z + noise.sample(rng)))
        .with_root_rotation(UnitQuaternion::from_euler_angles(0.0, yaw, 0.0));
    for (joint, dx) in [("hip_l", -0.1), ("hip_r", 0.1)] {
        state.set_joint(
            joint,
            section_planner::JointState::new(
                Vector3::new(x + dx + noise.sample(rng), 0.8, z + noise.sample(rng)),
                UnitQuaternion::from_euler_angles(0.0, yaw, 0.0),
            ),
        );
    }
    state.set_muscle_activation("glute_l", 0.3);
    state.set_muscle_activation("glute_r", 0.3);
    state
}

fn main() {
    println!("Section planning start!!");

    let mut rng = thread_rng();
    let noise = Normal::new(0.0, STATE_JITTER_STD).unwrap();

    // Waypoints of the synthetic segment library: each segment carries the
    // body from one waypoint to the next
    let waypoints = [
        ("idle", 0.0, 0.0, 0.0),
        ("shift_weight", 0.0, 0.4, 0.0),
        ("step_right", 0.2, 1.0, 0.1),
        ("step_left", 0.0, 1.6, -0.1),
        ("stride", 0.0, 2.4, 0.0),
        ("turn_in", 0.3, 3.0, 0.4),
        ("reach_goal", 0.5, 3.6, 0.4),
    ];

    println!("Building {} segments...", waypoints.len() - 1);

    let mut graph = SegmentGraph::new();
    let mut names: HashMap<SegmentId, String> = HashMap::new();
    let mut goal: Option<Rc<dyn MotionSegment>> = None;

    for (i, window) in waypoints.windows(2).enumerate() {
        let (_, x0, z0, yaw0) = window[0];
        let (name, x1, z1, yaw1) = window[1];
        let id = SegmentId::new(i as u64);
        let next = if i + 2 < waypoints.len() {
            vec![SegmentId::new(i as u64 + 1)]
        } else {
            vec![]
        };
        let segment: Rc<dyn MotionSegment> = Rc::new(DemoSegment {
            id,
            required: body_state(x0, z0, yaw0, &mut rng, &noise),
            target: body_state(x1, z1, yaw1, &mut rng, &noise),
            connected: next,
        });
        names.insert(id, name.to_string());
        graph.add_node(segment.clone());
        goal = Some(segment);
    }
    let goal = goal.unwrap();

    // Current body state: standing near the idle waypoint
    let current = body_state(0.02, -0.05, 0.0, &mut rng, &noise);

    let finder = PathFinder::new();
    let plan: Plan = finder.find_path(&graph, &current, &goal);

    if plan.is_empty() {
        println!("No plan found!");
        return;
    }

    let described = plan
        .iter()
        .map(|segment| names[&segment.id()].clone())
        .join(" -> ");
    println!("Plan with {} segments: {}", plan.len(), described);

    if SHOW_ANIMATION {
        // Root trajectory on the ground plane: current state, then each
        // planned segment's target
        let mut xs = vec![current.root_position.x];
        let mut zs = vec![current.root_position.z];
        for segment in &plan {
            xs.push(segment.target_state().root_position.x);
            zs.push(segment.target_state().root_position.z);
        }

        let mut fg = Figure::new();
        fg.axes2d()
            .points(
                &[current.root_position.x],
                &[current.root_position.z],
                &[Caption("Current"), Color("green"), PointSymbol('O'), PointSize(1.5)],
            )
            .points(
                &[goal.target_state().root_position.x],
                &[goal.target_state().root_position.z],
                &[Caption("Goal"), Color("blue"), PointSymbol('S'), PointSize(1.5)],
            )
            .lines(&xs, &zs, &[Caption("Planned root trajectory"), Color("red")])
            .set_aspect_ratio(gnuplot::AutoOption::Fix(1.0))
            .set_title("Section Planning", &[])
            .set_x_label("X [m]", &[])
            .set_y_label("Z [m]", &[]);

        let output_path = "img/section_planning_result.png";
        fg.save_to_png(output_path, 800, 600).unwrap();
        println!("Plot saved to: {}", output_path);

        fg.show().unwrap();
    }

    println!("Section planning finish!!");
}
