//! Ordered kinematic chain with joint limits and forward kinematics.
//!
//! A [`KinematicChain`] is an ordered list of actuated joints from the base
//! to the end effector. Each joint stores its static transform relative to
//! the previous joint frame, its motion axis and its position limits. The
//! chain is immutable once built.

use nalgebra::{Isometry3, Translation3, UnitQuaternion, UnitVector3, Vector3};

use ikfast_core::{ConfigError, JointType};

/// A single actuated joint in the chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainJoint {
    pub name: String,
    pub joint_type: JointType,
    /// Static transform from the previous joint frame to this joint frame.
    pub origin: Isometry3<f64>,
    /// Motion axis in this joint's local frame.
    pub axis: UnitVector3<f64>,
    /// Lower position limit (rad or m).
    pub lower_limit: f64,
    /// Upper position limit (rad or m).
    pub upper_limit: f64,
}

impl ChainJoint {
    pub fn revolute(
        name: impl Into<String>,
        origin: Isometry3<f64>,
        axis: Vector3<f64>,
        limits: (f64, f64),
    ) -> Self {
        Self {
            name: name.into(),
            joint_type: JointType::Revolute,
            origin,
            axis: UnitVector3::new_normalize(axis),
            lower_limit: limits.0,
            upper_limit: limits.1,
        }
    }

    pub fn prismatic(
        name: impl Into<String>,
        origin: Isometry3<f64>,
        axis: Vector3<f64>,
        limits: (f64, f64),
    ) -> Self {
        Self {
            joint_type: JointType::Prismatic,
            ..Self::revolute(name, origin, axis, limits)
        }
    }

    pub const fn is_prismatic(&self) -> bool {
        matches!(self.joint_type, JointType::Prismatic)
    }

    /// Whether `value` lies inside `[lower - eps, upper + eps]`.
    pub fn contains(&self, value: f64, eps: f64) -> bool {
        value >= self.lower_limit - eps && value <= self.upper_limit + eps
    }

    /// Transform contributed by this joint at position `value`, origin included.
    pub fn transform(&self, value: f64) -> Isometry3<f64> {
        self.origin * joint_motion(&self.axis, self.joint_type, value)
    }
}

/// An ordered kinematic chain from base to end effector.
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicChain {
    joints: Vec<ChainJoint>,
    /// Transform from the last joint frame to the end-effector frame.
    ee_offset: Isometry3<f64>,
}

impl KinematicChain {
    pub const fn new(joints: Vec<ChainJoint>, ee_offset: Isometry3<f64>) -> Self {
        Self { joints, ee_offset }
    }

    /// Start an empty chain builder.
    pub fn builder() -> ChainBuilder {
        ChainBuilder::default()
    }

    /// Number of actuated degrees of freedom.
    pub fn dof(&self) -> usize {
        self.joints.len()
    }

    /// Joint names in chain order.
    pub fn joint_names(&self) -> Vec<&str> {
        self.joints.iter().map(|j| j.name.as_str()).collect()
    }

    pub fn joints(&self) -> &[ChainJoint] {
        &self.joints
    }

    pub fn joint(&self, index: usize) -> Option<&ChainJoint> {
        self.joints.get(index)
    }

    /// End-effector offset after the last joint.
    pub fn ee_offset(&self) -> &Isometry3<f64> {
        &self.ee_offset
    }

    /// `(lower, upper)` limits of every joint in chain order.
    pub fn limits(&self) -> Vec<(f64, f64)> {
        self.joints
            .iter()
            .map(|j| (j.lower_limit, j.upper_limit))
            .collect()
    }

    /// Check that every joint has finite, ordered limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, joint) in self.joints.iter().enumerate() {
            let (lower, upper) = (joint.lower_limit, joint.upper_limit);
            if !lower.is_finite() || !upper.is_finite() || lower > upper {
                return Err(ConfigError::MalformedLimits {
                    joint: i,
                    lower,
                    upper,
                });
            }
        }
        Ok(())
    }

    /// Compute forward kinematics: joint positions -> end-effector pose.
    ///
    /// # Panics
    ///
    /// Panics if `q.len() != self.dof()`.
    pub fn forward_kinematics(&self, q: &[f64]) -> Isometry3<f64> {
        assert_eq!(q.len(), self.dof(), "q.len() must equal chain DOF");

        let transform = self
            .joints
            .iter()
            .zip(q)
            .fold(Isometry3::identity(), |acc, (joint, &value)| {
                acc * joint.transform(value)
            });
        transform * self.ee_offset
    }

    /// Whether every joint value lies within its limits (with slack `eps`).
    pub fn within_limits(&self, q: &[f64], eps: f64) -> bool {
        q.len() == self.dof()
            && self
                .joints
                .iter()
                .zip(q)
                .all(|(joint, &value)| joint.contains(value, eps))
    }

    /// Clamp joint positions to their limits.
    pub fn clamp_joints(&self, q: &mut [f64]) {
        for (value, joint) in q.iter_mut().zip(&self.joints) {
            *value = value.clamp(joint.lower_limit, joint.upper_limit);
        }
    }

    /// Midpoint of every joint's range.
    pub fn mid_configuration(&self) -> Vec<f64> {
        self.joints
            .iter()
            .map(|j| 0.5 * (j.lower_limit + j.upper_limit))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// ChainBuilder
// ---------------------------------------------------------------------------

/// Incremental builder for hand-described chains.
///
/// Origins are given as translations from the previous joint frame, which is
/// all the built-in arms need; use [`ChainBuilder::joint`] for rotated origins.
#[derive(Debug, Clone, Default)]
pub struct ChainBuilder {
    joints: Vec<ChainJoint>,
    ee_offset: Option<Isometry3<f64>>,
}

impl ChainBuilder {
    #[must_use]
    pub fn joint(mut self, joint: ChainJoint) -> Self {
        self.joints.push(joint);
        self
    }

    #[must_use]
    pub fn revolute(
        self,
        name: &str,
        offset: [f64; 3],
        axis: Vector3<f64>,
        limits: (f64, f64),
    ) -> Self {
        self.joint(ChainJoint::revolute(name, translation(offset), axis, limits))
    }

    #[must_use]
    pub fn prismatic(
        self,
        name: &str,
        offset: [f64; 3],
        axis: Vector3<f64>,
        limits: (f64, f64),
    ) -> Self {
        self.joint(ChainJoint::prismatic(name, translation(offset), axis, limits))
    }

    /// Translation from the last joint frame to the end effector.
    #[must_use]
    pub fn end_effector(mut self, offset: [f64; 3]) -> Self {
        self.ee_offset = Some(translation(offset));
        self
    }

    pub fn build(self) -> KinematicChain {
        KinematicChain::new(self.joints, self.ee_offset.unwrap_or_else(Isometry3::identity))
    }
}

fn translation(offset: [f64; 3]) -> Isometry3<f64> {
    Isometry3::from_parts(
        Translation3::new(offset[0], offset[1], offset[2]),
        UnitQuaternion::identity(),
    )
}

/// Motion of a single joint at a given position, without its origin.
fn joint_motion(axis: &UnitVector3<f64>, joint_type: JointType, value: f64) -> Isometry3<f64> {
    match joint_type {
        JointType::Prismatic => Isometry3::from_parts(
            Translation3::from(axis.into_inner() * value),
            UnitQuaternion::identity(),
        ),
        JointType::Revolute => Isometry3::from_parts(
            Translation3::identity(),
            UnitQuaternion::from_axis_angle(axis, value),
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
