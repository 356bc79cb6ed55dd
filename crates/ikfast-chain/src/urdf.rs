//! Build a [`KinematicChain`] from URDF XML using `urdf-rs`.
//!
//! Only actuated joints (revolute, continuous, prismatic) become chain
//! joints; fixed joints have their transforms folded into the next actuated
//! joint's origin, or into the end-effector offset when they trail the chain.

use std::collections::HashSet;
use std::f64::consts::PI;

use nalgebra::{Isometry3, Translation3, UnitQuaternion, UnitVector3, Vector3};

use ikfast_core::{ChainError, JointType};

use crate::chain::{ChainJoint, KinematicChain};

impl KinematicChain {
    /// Parse URDF XML and trace the chain from the root link to `ee_link`.
    pub fn from_urdf_str(xml: &str, ee_link: &str) -> Result<Self, ChainError> {
        let robot = urdf_rs::read_from_string(xml).map_err(|e| ChainError::Urdf(e.to_string()))?;
        Self::from_urdf(&robot, ee_link)
    }

    /// Trace the chain from the root link of `robot` to `ee_link`.
    pub fn from_urdf(robot: &urdf_rs::Robot, ee_link: &str) -> Result<Self, ChainError> {
        let root = root_link(robot)?;
        let path = find_path_to_link(robot, root, ee_link)
            .ok_or_else(|| ChainError::UnreachableLink(ee_link.to_string()))?;

        let mut joints = Vec::new();
        let mut accumulated_fixed = Isometry3::identity();

        for joint_name in &path {
            let joint = robot
                .joints
                .iter()
                .find(|j| &j.name == joint_name)
                .ok_or_else(|| ChainError::MissingJoint(joint_name.clone()))?;
            let origin = origin_to_isometry(&joint.origin);

            let joint_type = match joint.joint_type {
                urdf_rs::JointType::Revolute | urdf_rs::JointType::Continuous => {
                    JointType::Revolute
                }
                urdf_rs::JointType::Prismatic => JointType::Prismatic,
                _ => {
                    accumulated_fixed *= origin;
                    continue;
                }
            };

            let axis = Vector3::new(joint.axis.xyz[0], joint.axis.xyz[1], joint.axis.xyz[2]);
            let axis = UnitVector3::try_new(axis, 1e-12)
                .ok_or_else(|| ChainError::DegenerateAxis(joint.name.clone()))?;

            // Unset revolute limits mean a full turn; prismatic limits are kept.
            let unset = joint.limit.lower == 0.0 && joint.limit.upper == 0.0;
            let (lower, upper) = match joint.joint_type {
                urdf_rs::JointType::Continuous => (-PI, PI),
                urdf_rs::JointType::Revolute if unset => (-PI, PI),
                _ => (joint.limit.lower, joint.limit.upper),
            };

            joints.push(ChainJoint {
                name: joint.name.clone(),
                joint_type,
                origin: accumulated_fixed * origin,
                axis,
                lower_limit: lower,
                upper_limit: upper,
            });
            accumulated_fixed = Isometry3::identity();
        }

        Ok(Self::new(joints, accumulated_fixed))
    }
}

/// The link that is never a joint child.
fn root_link(robot: &urdf_rs::Robot) -> Result<&str, ChainError> {
    let children: HashSet<&str> = robot.joints.iter().map(|j| j.child.link.as_str()).collect();
    robot
        .links
        .iter()
        .map(|l| l.name.as_str())
        .find(|name| !children.contains(name))
        .ok_or_else(|| ChainError::Urdf("no root link found".into()))
}

/// Convert a URDF origin (xyz + rpy) to an [`Isometry3`].
fn origin_to_isometry(origin: &urdf_rs::Pose) -> Isometry3<f64> {
    let translation = Translation3::new(origin.xyz[0], origin.xyz[1], origin.xyz[2]);
    // URDF rpy is extrinsic XYZ, which is what `from_euler_angles` builds.
    let rotation = UnitQuaternion::from_euler_angles(origin.rpy[0], origin.rpy[1], origin.rpy[2]);
    Isometry3::from_parts(translation, rotation)
}

/// Ordered joint names from `root` to `target`.
fn find_path_to_link(robot: &urdf_rs::Robot, root: &str, target: &str) -> Option<Vec<String>> {
    if root == target {
        return Some(Vec::new());
    }

    for joint in robot.joints.iter().filter(|j| j.parent.link == root) {
        if joint.child.link == target {
            return Some(vec![joint.name.clone()]);
        }
        if let Some(mut path) = find_path_to_link(robot, &joint.child.link, target) {
            path.insert(0, joint.name.clone());
            return Some(path);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
