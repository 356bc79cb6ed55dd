//! Six-axis arm carried by a linear rail.

use nalgebra::{Isometry3, Vector3};

use ikfast_chain::{ChainJoint, KinematicChain};
use ikfast_core::{IkParameterizationType, IkSolution, TargetPose};
use ikfast_solver::ChainEquations;

use crate::opw::{Opw6, OpwParameters};

/// Seven-DOF arm: a prismatic rail along the base x axis followed by an
/// [`Opw6`]. The rail position is the free joint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RailOpw7 {
    pub arm: Opw6,
    /// Rail travel in metres, from the base origin.
    pub travel: (f64, f64),
}

impl Default for RailOpw7 {
    fn default() -> Self {
        Self {
            arm: Opw6::default(),
            travel: (0.0, 2.0),
        }
    }
}

impl RailOpw7 {
    pub const fn new(params: OpwParameters, travel: (f64, f64)) -> Self {
        Self {
            arm: Opw6::new(params),
            travel,
        }
    }

    pub fn chain(&self) -> KinematicChain {
        let arm = self.arm.chain();
        let mut joints = Vec::with_capacity(arm.dof() + 1);
        joints.push(ChainJoint::prismatic(
            "rail",
            Isometry3::identity(),
            Vector3::x(),
            self.travel,
        ));
        joints.extend_from_slice(arm.joints());
        KinematicChain::new(joints, *arm.ee_offset())
    }
}

impl ChainEquations for RailOpw7 {
    fn num_joints(&self) -> usize {
        7
    }

    fn free_joints(&self) -> &[usize] {
        &[0]
    }

    fn parameterization(&self) -> IkParameterizationType {
        IkParameterizationType::Transform6D
    }

    fn solve(&self, target: &TargetPose, free_values: &[f64]) -> Vec<IkSolution> {
        let (TargetPose::Transform6D(pose), [rail]) = (target, free_values) else {
            return Vec::new();
        };
        // Target seen from the carriage.
        let local = Isometry3::translation(-rail, 0.0, 0.0) * pose;
        self.arm
            .solve_pose(&local)
            .into_iter()
            .map(|q| {
                let mut joints = Vec::with_capacity(7);
                joints.push(*rail);
                joints.extend_from_slice(&q);
                IkSolution::new(joints, free_values.to_vec())
            })
            .collect()
    }
}
