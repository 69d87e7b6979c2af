//! Physical body state snapshot and the distance metric over it
//!
//! A `PhysicalState` captures the configuration of an articulated body at a
//! single instant: root transform and velocities, per-joint configurations,
//! muscle activations, and the currently active contacts. The planning core
//! treats snapshots as immutable values; `Clone` deep-copies the joint and
//! muscle maps so a snapshot taken mid-search is never affected by later
//! body updates.

use nalgebra::{UnitQuaternion, Vector3};
use std::collections::HashMap;

use crate::common::{ContactPoint, JointState};

/// Weight applied to the root linear velocity term of the distance metric
const LINEAR_VELOCITY_WEIGHT: f64 = 0.1;

/// Default tolerance for [`PhysicalState::is_similar_to`]
pub const DEFAULT_SIMILARITY_TOLERANCE: f64 = 0.1;

/// Snapshot of an articulated body's configuration at an instant
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalState {
    /// Per-joint state keyed by joint identifier; no ordering guarantee
    pub joints: HashMap<String, JointState>,
    /// Muscle activation in [0,1] keyed by muscle identifier
    pub muscle_activations: HashMap<String, f64>,
    /// Root position in world space
    pub root_position: Vector3<f64>,
    /// Root orientation in world space
    pub root_rotation: UnitQuaternion<f64>,
    /// Root linear velocity [m/s]
    pub root_linear_velocity: Vector3<f64>,
    /// Root angular velocity [rad/s]
    pub root_angular_velocity: Vector3<f64>,
    /// Active contacts; informational only, not read by the distance metric
    pub contacts: Vec<ContactPoint>,
}

impl PhysicalState {
    /// Create an empty state: identity root transform, zero velocities, no
    /// tracked joints or muscles. An empty state is valid and represents a
    /// body with nothing tracked yet.
    pub fn new() -> Self {
        Self {
            joints: HashMap::new(),
            muscle_activations: HashMap::new(),
            root_position: Vector3::zeros(),
            root_rotation: UnitQuaternion::identity(),
            root_linear_velocity: Vector3::zeros(),
            root_angular_velocity: Vector3::zeros(),
            contacts: Vec::new(),
        }
    }

    pub fn with_root_position(mut self, position: Vector3<f64>) -> Self {
        self.root_position = position;
        self
    }

    pub fn with_root_rotation(mut self, rotation: UnitQuaternion<f64>) -> Self {
        self.root_rotation = rotation;
        self
    }

    pub fn with_root_linear_velocity(mut self, velocity: Vector3<f64>) -> Self {
        self.root_linear_velocity = velocity;
        self
    }

    /// Insert or replace a joint configuration. Empty identifiers are
    /// rejected as a no-op to keep the key invariant.
    pub fn set_joint(&mut self, name: &str, joint: JointState) {
        if name.is_empty() {
            return;
        }
        self.joints.insert(name.to_string(), joint);
    }

    /// Insert or replace a muscle activation, clamped to [0,1]. Empty
    /// identifiers are rejected as a no-op.
    pub fn set_muscle_activation(&mut self, name: &str, activation: f64) {
        if name.is_empty() {
            return;
        }
        self.muscle_activations
            .insert(name.to_string(), activation.clamp(0.0, 1.0));
    }

    pub fn add_contact(&mut self, contact: ContactPoint) {
        self.contacts.push(contact);
    }

    pub fn joint(&self, name: &str) -> Option<&JointState> {
        self.joints.get(name)
    }

    /// Distance between two body configurations.
    ///
    /// Sum of:
    /// 1. Euclidean distance between root positions.
    /// 2. Angular difference between root rotations, degrees / 180.
    /// 3. Euclidean distance between root linear velocities, weighted by
    ///    [`LINEAR_VELOCITY_WEIGHT`].
    /// 4. The average over joints present in both states of positional
    ///    distance plus rotational difference (degrees / 180). Joints
    ///    present in only one state contribute nothing.
    ///
    /// The joint term is an average so it does not grow with skeleton size;
    /// the root terms are not normalized and dominate for bodies far apart.
    pub fn distance(&self, other: &PhysicalState) -> f64 {
        let mut total = (self.root_position - other.root_position).norm();
        total += angular_difference(&self.root_rotation, &other.root_rotation);
        total +=
            (self.root_linear_velocity - other.root_linear_velocity).norm() * LINEAR_VELOCITY_WEIGHT;

        let mut joint_sum = 0.0;
        let mut compared = 0usize;
        for (name, joint) in &self.joints {
            if let Some(other_joint) = other.joints.get(name) {
                joint_sum += (joint.position - other_joint.position).norm();
                joint_sum += angular_difference(&joint.rotation, &other_joint.rotation);
                compared += 1;
            }
        }
        if compared > 0 {
            total += joint_sum / compared as f64;
        }

        total
    }

    /// True iff `distance(self, other) < tolerance`
    pub fn is_similar_to(&self, other: &PhysicalState, tolerance: f64) -> bool {
        self.distance(other) < tolerance
    }

    /// [`is_similar_to`](Self::is_similar_to) with the default tolerance
    pub fn is_similar(&self, other: &PhysicalState) -> bool {
        self.is_similar_to(other, DEFAULT_SIMILARITY_TOLERANCE)
    }
}

impl Default for PhysicalState {
    fn default() -> Self {
        Self::new()
    }
}

/// Rotational difference between two orientations, in degrees normalized by
/// 180 so a half-turn contributes 1.0
fn angular_difference(a: &UnitQuaternion<f64>, b: &UnitQuaternion<f64>) -> f64 {
    a.angle_to(b).to_degrees() / 180.0
}
