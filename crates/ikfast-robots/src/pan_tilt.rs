//! Pan/tilt head pointing its z axis along a direction.

use std::f64::consts::PI;

use nalgebra::Vector3;

use ikfast_chain::KinematicChain;
use ikfast_core::{IkParameterizationType, IkSolution, TargetPose, normalize_angle};
use ikfast_solver::ChainEquations;

/// Pan about the base z axis, then tilt about the panned y axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanTilt {
    /// Height of the tilt axis above the pan axis origin.
    pub height: f64,
    /// Distance from the tilt axis to the sensor frame.
    pub sensor_offset: f64,
}

impl Default for PanTilt {
    fn default() -> Self {
        Self {
            height: 0.1,
            sensor_offset: 0.05,
        }
    }
}

impl PanTilt {
    pub fn chain(&self) -> KinematicChain {
        KinematicChain::builder()
            .revolute("pan", [0.0; 3], Vector3::z(), (-PI, PI))
            .revolute("tilt", [0.0, 0.0, self.height], Vector3::y(), (-2.0, 2.0))
            .end_effector([0.0, 0.0, self.sensor_offset])
            .build()
    }
}

impl ChainEquations for PanTilt {
    fn num_joints(&self) -> usize {
        2
    }

    fn free_joints(&self) -> &[usize] {
        &[]
    }

    fn parameterization(&self) -> IkParameterizationType {
        IkParameterizationType::Direction3D
    }

    fn solve(&self, target: &TargetPose, _free_values: &[f64]) -> Vec<IkSolution> {
        let TargetPose::Direction3D(dir) = target else {
            return Vec::new();
        };
        let (dx, dy, dz) = (dir.x, dir.y, dir.z);
        let s = dx.hypot(dy);
        let tilt = s.atan2(dz);

        // Pointing straight up or down: pan is arbitrary.
        if s < 1e-12 {
            return vec![IkSolution::new(vec![0.0, tilt], Vec::new())];
        }

        let pan = dy.atan2(dx);
        vec![
            IkSolution::new(vec![pan, tilt], Vec::new()),
            IkSolution::new(vec![normalize_angle(pan + PI), -tilt], Vec::new()),
        ]
    }
}
