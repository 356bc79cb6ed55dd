//! Six-axis industrial arms with an ortho-parallel base and spherical wrist.
//!
//! The geometry is described by seven lengths:
//!
//! ```text
//!            c4 (flange)
//!            |
//!     a2 ── wrist centre
//!            | c3
//!          elbow
//!            | c2
//!  b ── a1 ─ shoulder
//!            | c1
//!          base
//! ```
//!
//! Joint 1 turns about the base z axis, joints 2 and 3 about the (offset)
//! y axis, and joints 4 to 6 form a z-y-z wrist. At zero the arm points
//! straight up.
//!
//! Position and orientation decouple at the wrist centre: joints 1 to 3 are
//! solved from the wrist-centre position (up to four branches), joints 4 to
//! 6 from the remaining rotation (two branches each).

use std::f64::consts::PI;

use nalgebra::{Isometry3, Matrix3, Rotation3, Vector3};

use ikfast_chain::KinematicChain;
use ikfast_core::{IkParameterizationType, IkSolution, TargetPose, normalize_angle};
use ikfast_solver::ChainEquations;

const SHOULDER_EPS: f64 = 1e-12;
const BRANCH_EPS: f64 = 1e-12;
/// Below this `sin(q5)` the wrist is singular and only `q4 + q6` is defined.
const WRIST_EPS: f64 = 1e-9;

const LIMITS: [(f64, f64); 6] = [
    (-PI, PI),
    (-2.6, 2.6),
    (-2.6, 2.6),
    (-PI, PI),
    (-2.2, 2.2),
    (-PI, PI),
];

/// Link lengths of an ortho-parallel arm (metres).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpwParameters {
    /// Shoulder offset along the base x axis.
    pub a1: f64,
    /// Elbow-to-wrist offset perpendicular to the forearm.
    pub a2: f64,
    /// Lateral shoulder offset along the base y axis.
    pub b: f64,
    /// Shoulder height.
    pub c1: f64,
    /// Upper arm length.
    pub c2: f64,
    /// Forearm length.
    pub c3: f64,
    /// Wrist centre to flange.
    pub c4: f64,
}

impl Default for OpwParameters {
    /// A small 6 kg class arm.
    fn default() -> Self {
        Self {
            a1: 0.15,
            a2: -0.035,
            b: 0.0,
            c1: 0.55,
            c2: 0.55,
            c3: 0.6,
            c4: 0.11,
        }
    }
}

impl OpwParameters {
    /// Joints 1 to 3 with the end effector at the wrist centre.
    fn positioning_chain(&self) -> KinematicChain {
        KinematicChain::builder()
            .revolute("joint_1", [0.0; 3], Vector3::z(), LIMITS[0])
            .revolute("joint_2", [self.a1, self.b, self.c1], Vector3::y(), LIMITS[1])
            .revolute("joint_3", [0.0, 0.0, self.c2], Vector3::y(), LIMITS[2])
            .end_effector([self.a2, 0.0, self.c3])
            .build()
    }

    /// Full six-joint chain ending at the flange.
    fn full_chain(&self) -> KinematicChain {
        KinematicChain::builder()
            .revolute("joint_1", [0.0; 3], Vector3::z(), LIMITS[0])
            .revolute("joint_2", [self.a1, self.b, self.c1], Vector3::y(), LIMITS[1])
            .revolute("joint_3", [0.0, 0.0, self.c2], Vector3::y(), LIMITS[2])
            .revolute("joint_4", [self.a2, 0.0, self.c3], Vector3::z(), LIMITS[3])
            .revolute("joint_5", [0.0; 3], Vector3::y(), LIMITS[4])
            .revolute("joint_6", [0.0; 3], Vector3::z(), LIMITS[5])
            .end_effector([0.0, 0.0, self.c4])
            .build()
    }

    /// `(q1, q2, q3)` placing the wrist centre at `c`.
    pub fn position_solutions(&self, c: &Vector3<f64>) -> Vec<[f64; 3]> {
        let rho2 = c.x * c.x + c.y * c.y;
        if rho2 < SHOULDER_EPS {
            // Wrist centre on the joint 1 axis.
            return Vec::new();
        }
        let r2 = rho2 - self.b * self.b;
        if r2 < -BRANCH_EPS {
            return Vec::new();
        }
        let r = r2.max(0.0).sqrt();
        let reaches = if r < BRANCH_EPS { vec![0.0] } else { vec![r, -r] };

        let k = self.a2.hypot(self.c3);
        let psi = self.a2.atan2(self.c3);
        let heading = c.y.atan2(c.x);

        let mut out = Vec::with_capacity(4);
        for reach in reaches {
            let q1 = normalize_angle(heading - self.b.atan2(reach));
            let vx = reach - self.a1;
            let vz = c.z - self.c1;
            let cos_g =
                (vx * vx + vz * vz - self.c2 * self.c2 - k * k) / (2.0 * self.c2 * k);
            if !cos_g.is_finite() || cos_g.abs() > 1.0 + BRANCH_EPS {
                continue;
            }
            let g = cos_g.clamp(-1.0, 1.0).acos();
            let elbows = if 1.0 - cos_g.abs() < BRANCH_EPS {
                vec![g]
            } else {
                vec![g, -g]
            };
            for g in elbows {
                let q2 = vx.atan2(vz) - (k * g.sin()).atan2(self.c2 + k * g.cos());
                out.push([q1, normalize_angle(q2), normalize_angle(g - psi)]);
            }
        }
        out
    }
}

/// `(q4, q5, q6)` realising the wrist rotation `m = Rz(q4) Ry(q5) Rz(q6)`.
pub fn wrist_solutions(m: &Matrix3<f64>) -> Vec<[f64; 3]> {
    let s5 = m[(0, 2)].hypot(m[(1, 2)]);
    if s5 < WRIST_EPS {
        // Only q4 + q6 (or q6 - q4) is observable; pin q4 to zero.
        return if m[(2, 2)] > 0.0 {
            vec![[0.0, 0.0, m[(1, 0)].atan2(m[(0, 0)])]]
        } else {
            vec![[0.0, PI, m[(1, 0)].atan2(-m[(0, 0)])]]
        };
    }
    let q5 = s5.atan2(m[(2, 2)]);
    vec![
        [
            m[(1, 2)].atan2(m[(0, 2)]),
            q5,
            m[(2, 1)].atan2(-m[(2, 0)]),
        ],
        [
            (-m[(1, 2)]).atan2(-m[(0, 2)]),
            -q5,
            (-m[(2, 1)]).atan2(m[(2, 0)]),
        ],
    ]
}

/// Joint 1 to 3 rotation of the arm.
fn arm_rotation(q1: f64, q2: f64, q3: f64) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), q1)
        * Rotation3::from_axis_angle(&Vector3::y_axis(), q2 + q3)
}

// ---------------------------------------------------------------------------
// Opw6
// ---------------------------------------------------------------------------

/// Six-axis arm solved for a full flange pose.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Opw6 {
    pub params: OpwParameters,
}

impl Opw6 {
    pub const fn new(params: OpwParameters) -> Self {
        Self { params }
    }

    pub fn chain(&self) -> KinematicChain {
        self.params.full_chain()
    }

    /// All closed-form solutions for a flange pose, up to eight.
    pub fn solve_pose(&self, pose: &Isometry3<f64>) -> Vec<[f64; 6]> {
        let rot = pose.rotation.to_rotation_matrix();
        let wrist = pose.translation.vector - self.params.c4 * (rot * Vector3::z());

        let mut out = Vec::with_capacity(8);
        for [q1, q2, q3] in self.params.position_solutions(&wrist) {
            let m = arm_rotation(q1, q2, q3).inverse() * rot;
            for [q4, q5, q6] in wrist_solutions(m.matrix()) {
                out.push([q1, q2, q3, q4, q5, q6]);
            }
        }
        out
    }
}

impl ChainEquations for Opw6 {
    fn num_joints(&self) -> usize {
        6
    }

    fn free_joints(&self) -> &[usize] {
        &[]
    }

    fn parameterization(&self) -> IkParameterizationType {
        IkParameterizationType::Transform6D
    }

    fn solve(&self, target: &TargetPose, _free_values: &[f64]) -> Vec<IkSolution> {
        let TargetPose::Transform6D(pose) = target else {
            return Vec::new();
        };
        self.solve_pose(pose)
            .into_iter()
            .map(|q| IkSolution::new(q.to_vec(), Vec::new()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Elbow3
// ---------------------------------------------------------------------------

/// The first three axes of an [`Opw6`], positioning the wrist centre.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Elbow3 {
    pub params: OpwParameters,
}

impl Elbow3 {
    pub const fn new(params: OpwParameters) -> Self {
        Self { params }
    }

    pub fn chain(&self) -> KinematicChain {
        self.params.positioning_chain()
    }
}

impl ChainEquations for Elbow3 {
    fn num_joints(&self) -> usize {
        3
    }

    fn free_joints(&self) -> &[usize] {
        &[]
    }

    fn parameterization(&self) -> IkParameterizationType {
        IkParameterizationType::Translation3D
    }

    fn solve(&self, target: &TargetPose, _free_values: &[f64]) -> Vec<IkSolution> {
        let TargetPose::Translation3D(p) = target else {
            return Vec::new();
        };
        self.params
            .position_solutions(p)
            .into_iter()
            .map(|q| IkSolution::new(q.to_vec(), Vec::new()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
