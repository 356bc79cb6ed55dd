//! Planar arms with all joints about the base z axis.
//!
//! Links extend along the x axis of each joint frame, so at zero the arm lies
//! stretched along the base x axis.

use std::f64::consts::PI;

use nalgebra::{Vector2, Vector3};

use ikfast_chain::KinematicChain;
use ikfast_core::{IkParameterizationType, IkSolution, TargetPose, normalize_angle};
use ikfast_solver::ChainEquations;

/// Below this the target sits on the shoulder and the base angle is undefined.
const SHOULDER_EPS: f64 = 1e-12;
/// Elbow cosines this close to ±1 give a single (straight or folded) solution.
const ELBOW_EPS: f64 = 1e-12;

/// Closed-form solutions `(q1, q2)` of a two-link planar arm reaching `p`.
///
/// Returns elbow-down first, then elbow-up. Empty when `p` is out of reach or
/// on the shoulder axis.
pub fn two_link(l1: f64, l2: f64, p: Vector2<f64>) -> Vec<[f64; 2]> {
    let r2 = p.norm_squared();
    if r2 < SHOULDER_EPS {
        return Vec::new();
    }
    let c2 = (r2 - l1 * l1 - l2 * l2) / (2.0 * l1 * l2);
    if !c2.is_finite() || c2.abs() > 1.0 + ELBOW_EPS {
        return Vec::new();
    }
    let q2 = c2.clamp(-1.0, 1.0).acos();
    let elbows = if 1.0 - c2.abs() < ELBOW_EPS {
        vec![q2]
    } else {
        vec![q2, -q2]
    };

    let base = p.y.atan2(p.x);
    elbows
        .into_iter()
        .map(|q2| {
            let q1 = base - (l2 * q2.sin()).atan2(l1 + l2 * q2.cos());
            [normalize_angle(q1), q2]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Planar2R
// ---------------------------------------------------------------------------

/// Two-link arm reaching a point in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Planar2R {
    pub l1: f64,
    pub l2: f64,
}

impl Default for Planar2R {
    fn default() -> Self {
        Self { l1: 0.4, l2: 0.3 }
    }
}

impl Planar2R {
    pub fn chain(&self) -> KinematicChain {
        KinematicChain::builder()
            .revolute("shoulder", [0.0; 3], Vector3::z(), (-PI, PI))
            .revolute("elbow", [self.l1, 0.0, 0.0], Vector3::z(), (-3.0, 3.0))
            .end_effector([self.l2, 0.0, 0.0])
            .build()
    }
}

impl ChainEquations for Planar2R {
    fn num_joints(&self) -> usize {
        2
    }

    fn free_joints(&self) -> &[usize] {
        &[]
    }

    fn parameterization(&self) -> IkParameterizationType {
        IkParameterizationType::TranslationXY2D
    }

    fn solve(&self, target: &TargetPose, _free_values: &[f64]) -> Vec<IkSolution> {
        let TargetPose::TranslationXY2D(p) = target else {
            return Vec::new();
        };
        two_link(self.l1, self.l2, *p)
            .into_iter()
            .map(|[q1, q2]| IkSolution::new(vec![q1, q2], Vec::new()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Planar3R
// ---------------------------------------------------------------------------

/// Redundant three-link arm reaching a point; the shoulder is free.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Planar3R {
    pub l1: f64,
    pub l2: f64,
    pub l3: f64,
}

impl Default for Planar3R {
    fn default() -> Self {
        Self {
            l1: 0.4,
            l2: 0.3,
            l3: 0.2,
        }
    }
}

impl Planar3R {
    pub fn chain(&self) -> KinematicChain {
        KinematicChain::builder()
            .revolute("shoulder", [0.0; 3], Vector3::z(), (-PI, PI))
            .revolute("elbow", [self.l1, 0.0, 0.0], Vector3::z(), (-PI, PI))
            .revolute("wrist", [self.l2, 0.0, 0.0], Vector3::z(), (-PI, PI))
            .end_effector([self.l3, 0.0, 0.0])
            .build()
    }
}

impl ChainEquations for Planar3R {
    fn num_joints(&self) -> usize {
        3
    }

    fn free_joints(&self) -> &[usize] {
        &[0]
    }

    fn parameterization(&self) -> IkParameterizationType {
        IkParameterizationType::TranslationXY2D
    }

    fn solve(&self, target: &TargetPose, free_values: &[f64]) -> Vec<IkSolution> {
        let (TargetPose::TranslationXY2D(p), [q1]) = (target, free_values) else {
            return Vec::new();
        };
        // Target expressed in the elbow frame.
        let (s, c) = q1.sin_cos();
        let local = Vector2::new(c * p.x + s * p.y - self.l1, -s * p.x + c * p.y);
        two_link(self.l2, self.l3, local)
            .into_iter()
            .map(|[q2, q3]| IkSolution::new(vec![*q1, q2, q3], free_values.to_vec()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Planar3RPose
// ---------------------------------------------------------------------------

/// Three-link arm reaching a point with a given tool heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Planar3RPose {
    pub l1: f64,
    pub l2: f64,
    pub l3: f64,
}

impl Default for Planar3RPose {
    fn default() -> Self {
        Self {
            l1: 0.4,
            l2: 0.3,
            l3: 0.1,
        }
    }
}

impl Planar3RPose {
    pub fn chain(&self) -> KinematicChain {
        KinematicChain::builder()
            .revolute("shoulder", [0.0; 3], Vector3::z(), (-PI, PI))
            .revolute("elbow", [self.l1, 0.0, 0.0], Vector3::z(), (-PI, PI))
            .revolute("wrist", [self.l2, 0.0, 0.0], Vector3::z(), (-PI, PI))
            .end_effector([self.l3, 0.0, 0.0])
            .build()
    }
}

impl ChainEquations for Planar3RPose {
    fn num_joints(&self) -> usize {
        3
    }

    fn free_joints(&self) -> &[usize] {
        &[]
    }

    fn parameterization(&self) -> IkParameterizationType {
        IkParameterizationType::TranslationXYOrientation3D
    }

    fn solve(&self, target: &TargetPose, _free_values: &[f64]) -> Vec<IkSolution> {
        let TargetPose::TranslationXYOrientation3D { xy, angle } = target else {
            return Vec::new();
        };
        let wrist = xy - self.l3 * Vector2::new(angle.cos(), angle.sin());
        two_link(self.l1, self.l2, wrist)
            .into_iter()
            .map(|[q1, q2]| {
                let q3 = normalize_angle(angle - q1 - q2);
                IkSolution::new(vec![q1, q2, q3], Vec::new())
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
