//! Common types used throughout section_planner

use nalgebra::{UnitQuaternion, Vector3};
use std::rc::Rc;

use crate::common::traits::MotionSegment;

/// Opaque handle identifying a motion segment.
///
/// Handles are allocated by the segment-generation collaborator and are the
/// graph's node keys. Two handles compare equal iff they refer to the same
/// segment, which stands in for reference identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(pub u64);

impl SegmentId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl From<u64> for SegmentId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// State of a single tracked joint
#[derive(Debug, Clone, PartialEq)]
pub struct JointState {
    /// Joint position in world space
    pub position: Vector3<f64>,
    /// Joint rotation in world space
    pub rotation: UnitQuaternion<f64>,
    /// Joint velocity, informational only (not read by the distance metric)
    pub velocity: Vector3<f64>,
}

impl JointState {
    pub fn new(position: Vector3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Self {
            position,
            rotation,
            velocity: Vector3::zeros(),
        }
    }

    pub fn with_velocity(mut self, velocity: Vector3<f64>) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn identity() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            velocity: Vector3::zeros(),
        }
    }
}

/// A single contact between the body and the environment.
///
/// Contacts are carried along with a state snapshot for the consuming
/// behavior layer; the planner itself never reads them.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactPoint {
    /// Contact location in world space
    pub point: Vector3<f64>,
    /// Contact surface normal
    pub normal: Vector3<f64>,
    /// Impulse magnitude applied at the contact
    pub impulse: f64,
}

impl ContactPoint {
    pub fn new(point: Vector3<f64>, normal: Vector3<f64>, impulse: f64) -> Self {
        Self {
            point,
            normal,
            impulse,
        }
    }
}

/// Ordered sequence of segments returned by the path finder.
///
/// An empty plan signals "unreachable now" and is a normal outcome, not an
/// error.
pub type Plan = Vec<Rc<dyn MotionSegment>>;
