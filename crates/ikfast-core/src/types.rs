use std::f64::consts::{PI, TAU};
use std::fmt;

use nalgebra::{Isometry3, Unit, UnitQuaternion, Vector2, Vector3};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// JointType
// ---------------------------------------------------------------------------

/// Motion type of a single chain joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointType {
    /// Rotation about the joint axis (radians).
    Revolute,
    /// Translation along the joint axis (meters).
    Prismatic,
}

impl JointType {
    pub const fn is_revolute(self) -> bool {
        matches!(self, Self::Revolute)
    }
}

// ---------------------------------------------------------------------------
// IkParameterizationType
// ---------------------------------------------------------------------------

/// Which aspect of the end-effector pose a solver constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IkParameterizationType {
    /// Full position and orientation.
    Transform6D,
    /// Orientation only.
    Rotation3D,
    /// Position only.
    Translation3D,
    /// Direction of the end-effector z axis.
    Direction3D,
    /// Planar position in the base XY plane.
    TranslationXY2D,
    /// Planar position plus heading of the end-effector x axis.
    TranslationXYOrientation3D,
}

impl IkParameterizationType {
    /// Number of pose degrees of freedom this parameterization constrains.
    pub const fn dof(self) -> usize {
        match self {
            Self::Transform6D => 6,
            Self::Rotation3D | Self::Translation3D | Self::TranslationXYOrientation3D => 3,
            Self::Direction3D | Self::TranslationXY2D => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Transform6D => "Transform6D",
            Self::Rotation3D => "Rotation3D",
            Self::Translation3D => "Translation3D",
            Self::Direction3D => "Direction3D",
            Self::TranslationXY2D => "TranslationXY2D",
            Self::TranslationXYOrientation3D => "TranslationXYOrientation3D",
        }
    }
}

impl fmt::Display for IkParameterizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// TargetPose
// ---------------------------------------------------------------------------

/// A target for the end effector, tagged with its parameterization.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetPose {
    Transform6D(Isometry3<f64>),
    Rotation3D(UnitQuaternion<f64>),
    Translation3D(Vector3<f64>),
    /// Desired direction of the end-effector z axis in the base frame.
    Direction3D(Unit<Vector3<f64>>),
    TranslationXY2D(Vector2<f64>),
    /// Planar position plus heading (radians) of the end-effector x axis.
    TranslationXYOrientation3D { xy: Vector2<f64>, angle: f64 },
}

/// Distance between an end-effector pose and a [`TargetPose`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PoseResidual {
    /// Translational error (meters). Zero for rotation-only targets.
    pub position: f64,
    /// Angular error (radians). Zero for translation-only targets.
    pub angle: f64,
}

impl PoseResidual {
    /// Largest of the two components.
    pub fn max(&self) -> f64 {
        self.position.max(self.angle)
    }

    pub fn within(&self, tolerance: f64) -> bool {
        self.position <= tolerance && self.angle <= tolerance
    }
}

impl TargetPose {
    pub const fn parameterization(&self) -> IkParameterizationType {
        match self {
            Self::Transform6D(_) => IkParameterizationType::Transform6D,
            Self::Rotation3D(_) => IkParameterizationType::Rotation3D,
            Self::Translation3D(_) => IkParameterizationType::Translation3D,
            Self::Direction3D(_) => IkParameterizationType::Direction3D,
            Self::TranslationXY2D(_) => IkParameterizationType::TranslationXY2D,
            Self::TranslationXYOrientation3D { .. } => {
                IkParameterizationType::TranslationXYOrientation3D
            }
        }
    }

    /// Project an end-effector pose onto the given parameterization.
    ///
    /// Used to turn a forward-kinematics result into an IK query.
    pub fn from_end_effector(kind: IkParameterizationType, ee: &Isometry3<f64>) -> Self {
        let t = ee.translation.vector;
        match kind {
            IkParameterizationType::Transform6D => Self::Transform6D(*ee),
            IkParameterizationType::Rotation3D => Self::Rotation3D(ee.rotation),
            IkParameterizationType::Translation3D => Self::Translation3D(t),
            IkParameterizationType::Direction3D => {
                Self::Direction3D(Unit::new_normalize(ee.rotation * Vector3::z()))
            }
            IkParameterizationType::TranslationXY2D => {
                Self::TranslationXY2D(Vector2::new(t.x, t.y))
            }
            IkParameterizationType::TranslationXYOrientation3D => {
                Self::TranslationXYOrientation3D {
                    xy: Vector2::new(t.x, t.y),
                    angle: planar_heading(ee),
                }
            }
        }
    }

    /// Residual between an end-effector pose and this target.
    pub fn residual(&self, ee: &Isometry3<f64>) -> PoseResidual {
        let t = ee.translation.vector;
        match self {
            Self::Transform6D(target) => PoseResidual {
                position: (target.translation.vector - t).norm(),
                angle: target.rotation.angle_to(&ee.rotation),
            },
            Self::Rotation3D(rotation) => PoseResidual {
                position: 0.0,
                angle: rotation.angle_to(&ee.rotation),
            },
            Self::Translation3D(p) => PoseResidual {
                position: (p - t).norm(),
                angle: 0.0,
            },
            Self::Direction3D(dir) => {
                let ee_dir = ee.rotation * Vector3::z();
                PoseResidual {
                    position: 0.0,
                    angle: dir.angle(&ee_dir),
                }
            }
            Self::TranslationXY2D(xy) => PoseResidual {
                position: (xy - Vector2::new(t.x, t.y)).norm(),
                angle: 0.0,
            },
            Self::TranslationXYOrientation3D { xy, angle } => PoseResidual {
                position: (xy - Vector2::new(t.x, t.y)).norm(),
                angle: normalize_angle(angle - planar_heading(ee)).abs(),
            },
        }
    }
}

/// Heading of the end-effector x axis projected onto the base XY plane.
fn planar_heading(ee: &Isometry3<f64>) -> f64 {
    let x_axis = ee.rotation * Vector3::x();
    x_axis.y.atan2(x_axis.x)
}

/// Wrap an angle into `(-π, π]`.
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

// ---------------------------------------------------------------------------
// IkSolution
// ---------------------------------------------------------------------------

/// One joint-space solution of an IK query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IkSolution {
    joints: Vec<f64>,
    free_values: Vec<f64>,
}

impl IkSolution {
    pub const fn new(joints: Vec<f64>, free_values: Vec<f64>) -> Self {
        Self {
            joints,
            free_values,
        }
    }

    /// Joint values in chain order.
    pub fn joints(&self) -> &[f64] {
        &self.joints
    }

    pub fn joints_mut(&mut self) -> &mut [f64] {
        &mut self.joints
    }

    /// Free-parameter values this solution was generated from.
    pub fn free_values(&self) -> &[f64] {
        &self.free_values
    }

    pub const fn dof(&self) -> usize {
        self.joints.len()
    }

    pub fn into_joints(self) -> Vec<f64> {
        self.joints
    }

    /// Weighted joint-space L1 distance to `other`.
    ///
    /// Missing weights count as 1.
    pub fn distance_to(&self, other: &[f64], weights: Option<&[f64]>) -> f64 {
        self.joints
            .iter()
            .zip(other)
            .enumerate()
            .map(|(i, (a, b))| {
                let w = weights.and_then(|w| w.get(i)).copied().unwrap_or(1.0);
                w * (a - b).abs()
            })
            .sum()
    }

    /// Largest per-joint absolute difference to `other`.
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        self.joints
            .iter()
            .zip(&other.joints)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

impl std::ops::Index<usize> for IkSolution {
    type Output = f64;
    fn index(&self, i: usize) -> &f64 {
        &self.joints[i]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
