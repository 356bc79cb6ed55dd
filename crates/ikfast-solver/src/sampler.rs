//! Discrete sampling of free joints.
//!
//! Each free joint is swept from its lower to its upper limit in steps of
//! the configured increment, endpoints included. The sampler yields the
//! Cartesian product of the per-joint sweeps lazily; nothing proportional
//! to the product size is ever allocated.

use ikfast_chain::KinematicChain;
use ikfast_core::ConfigError;

// ---------------------------------------------------------------------------
// FreeParameterSpec
// ---------------------------------------------------------------------------

/// One free joint with its sweep range and step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeJoint {
    /// Index of the joint in the chain.
    pub index: usize,
    pub lower: f64,
    pub upper: f64,
    pub increment: f64,
}

impl FreeJoint {
    /// Number of sweep values for this joint (always >= 1).
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn count(&self) -> usize {
        let span = self.upper - self.lower;
        if self.is_degenerate() {
            return 1;
        }
        // Small slack so that exact multiples keep their upper endpoint.
        let steps = (span / self.increment + 1e-9).floor();
        if steps >= usize::MAX as f64 {
            usize::MAX
        } else {
            steps as usize + 1
        }
    }

    /// The `i`-th sweep value.
    #[allow(clippy::cast_precision_loss)]
    pub fn value(&self, i: usize) -> f64 {
        if self.is_degenerate() {
            return 0.5 * (self.lower + self.upper);
        }
        (self.lower + i as f64 * self.increment).min(self.upper)
    }

    /// A non-positive increment or a single-point range sweeps one value.
    fn is_degenerate(&self) -> bool {
        self.increment.is_nan() || self.increment <= 0.0 || self.upper - self.lower <= 0.0
    }
}

/// Which chain joints are free, and how finely each is swept.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FreeParameterSpec {
    joints: Vec<FreeJoint>,
}

impl FreeParameterSpec {
    /// Free joints at `indices`, all swept with the same `increment`.
    pub fn new(
        chain: &KinematicChain,
        indices: &[usize],
        increment: f64,
    ) -> Result<Self, ConfigError> {
        Self::with_increments(chain, indices, &vec![increment; indices.len()])
    }

    /// Free joints at `indices` with one increment each.
    pub fn with_increments(
        chain: &KinematicChain,
        indices: &[usize],
        increments: &[f64],
    ) -> Result<Self, ConfigError> {
        if increments.len() != indices.len() {
            return Err(ConfigError::FreeCountMismatch {
                expected: indices.len(),
                got: increments.len(),
            });
        }

        let mut joints: Vec<FreeJoint> = Vec::with_capacity(indices.len());
        for (&index, &increment) in indices.iter().zip(increments) {
            let joint = chain.joint(index).ok_or(ConfigError::FreeIndexOutOfRange {
                index,
                dof: chain.dof(),
            })?;
            if joints.iter().any(|j| j.index == index) {
                return Err(ConfigError::DuplicateFreeIndex(index));
            }
            if increment.is_nan() {
                return Err(ConfigError::InvalidValue {
                    field: "free_increment".into(),
                    message: "must not be NaN".into(),
                });
            }
            joints.push(FreeJoint {
                index,
                lower: joint.lower_limit,
                upper: joint.upper_limit,
                increment,
            });
        }
        Ok(Self { joints })
    }

    pub fn joints(&self) -> &[FreeJoint] {
        &self.joints
    }

    /// Chain indices of the free joints, in sampling order.
    pub fn indices(&self) -> Vec<usize> {
        self.joints.iter().map(|j| j.index).collect()
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }
}

// ---------------------------------------------------------------------------
// FreeParameterSampler
// ---------------------------------------------------------------------------

/// Restartable enumerator of free-parameter tuples.
///
/// With no free joints the product has exactly one element, the empty tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeParameterSampler {
    axes: Vec<FreeJoint>,
}

impl FreeParameterSampler {
    pub fn new(spec: &FreeParameterSpec) -> Self {
        Self {
            axes: spec.joints.clone(),
        }
    }

    /// Total number of tuples, saturating at `usize::MAX`.
    pub fn len(&self) -> usize {
        self.axes
            .iter()
            .fold(1usize, |acc, axis| acc.saturating_mul(axis.count()))
    }

    /// Never true: even zero free joints yield one (empty) tuple.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> Samples<'_> {
        Samples {
            axes: &self.axes,
            cursor: vec![0; self.axes.len()],
            done: false,
        }
    }
}

impl<'a> IntoIterator for &'a FreeParameterSampler {
    type Item = Vec<f64>;
    type IntoIter = Samples<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy odometer over the sweep grid. The last free joint varies fastest.
#[derive(Debug, Clone)]
pub struct Samples<'a> {
    axes: &'a [FreeJoint],
    cursor: Vec<usize>,
    done: bool,
}

impl Iterator for Samples<'_> {
    type Item = Vec<f64>;

    fn next(&mut self) -> Option<Vec<f64>> {
        if self.done {
            return None;
        }

        let values = self
            .axes
            .iter()
            .zip(&self.cursor)
            .map(|(axis, &i)| axis.value(i))
            .collect();

        // Advance the odometer; rolling over the first digit ends the sweep.
        self.done = true;
        for (digit, axis) in self.cursor.iter_mut().zip(self.axes).rev() {
            *digit += 1;
            if *digit < axis.count() {
                self.done = false;
                break;
            }
            *digit = 0;
        }

        Some(values)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use std::f64::consts::{FRAC_PI_4, FRAC_PI_8, PI};

    fn chain() -> KinematicChain {
        KinematicChain::builder()
            .revolute("a", [0.0; 3], Vector3::z(), (-PI, PI))
            .revolute("b", [1.0, 0.0, 0.0], Vector3::z(), (0.0, 1.0))
            .prismatic("c", [0.0; 3], Vector3::x(), (0.5, 0.5))
            .build()
    }

    #[test]
    fn full_circle_at_quarter_pi_yields_nine() {
        let spec = FreeParameterSpec::new(&chain(), &[0], FRAC_PI_4).unwrap();
        let sampler = FreeParameterSampler::new(&spec);
        let values: Vec<f64> = sampler.iter().map(|v| v[0]).collect();
        assert_eq!(values.len(), 9);
        assert_eq!(sampler.len(), 9);
        assert_relative_eq!(values[0], -PI);
        assert_relative_eq!(values[4], 0.0, epsilon = 1e-12);
        assert_relative_eq!(values[8], PI, epsilon = 1e-12);
    }

    #[test]
    fn values_never_exceed_upper() {
        let spec = FreeParameterSpec::new(&chain(), &[1], 0.3).unwrap();
        let values: Vec<f64> = FreeParameterSampler::new(&spec)
            .iter()
            .map(|v| v[0])
            .collect();
        assert_eq!(values.len(), 4);
        assert!(values.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn non_positive_increment_yields_midpoint() {
        for inc in [0.0, -0.1] {
            let spec = FreeParameterSpec::new(&chain(), &[1], inc).unwrap();
            let samples: Vec<Vec<f64>> = FreeParameterSampler::new(&spec).iter().collect();
            assert_eq!(samples, vec![vec![0.5]]);
        }
    }

    #[test]
    fn nan_increment_joint_is_degenerate() {
        let joint = FreeJoint {
            index: 0,
            lower: -1.0,
            upper: 1.0,
            increment: f64::NAN,
        };
        assert_eq!(joint.count(), 1);
        assert_relative_eq!(joint.value(0), 0.0);
    }

    #[test]
    fn point_range_yields_fixed_value() {
        let spec = FreeParameterSpec::new(&chain(), &[2], 0.1).unwrap();
        let samples: Vec<Vec<f64>> = FreeParameterSampler::new(&spec).iter().collect();
        assert_eq!(samples, vec![vec![0.5]]);
    }

    #[test]
    fn no_free_joints_yields_one_empty_tuple() {
        let spec = FreeParameterSpec::new(&chain(), &[], 0.1).unwrap();
        let sampler = FreeParameterSampler::new(&spec);
        let samples: Vec<Vec<f64>> = sampler.iter().collect();
        assert_eq!(samples, vec![Vec::<f64>::new()]);
        assert_eq!(sampler.len(), 1);
        assert!(!sampler.is_empty());
    }

    #[test]
    fn cartesian_product_order() {
        let spec = FreeParameterSpec::with_increments(&chain(), &[1, 0], &[0.5, PI]).unwrap();
        let samples: Vec<Vec<f64>> = FreeParameterSampler::new(&spec).iter().collect();
        assert_eq!(samples.len(), 9);
        // Last free joint varies fastest.
        assert_relative_eq!(samples[0][0], 0.0);
        assert_relative_eq!(samples[0][1], -PI);
        assert_relative_eq!(samples[1][1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(samples[3][0], 0.5);
        assert_relative_eq!(samples[8][0], 1.0);
        assert_relative_eq!(samples[8][1], PI, epsilon = 1e-12);
    }

    #[test]
    fn iteration_is_restartable() {
        let spec = FreeParameterSpec::new(&chain(), &[0, 1], 0.25).unwrap();
        let sampler = FreeParameterSampler::new(&spec);
        let first: Vec<Vec<f64>> = sampler.iter().collect();
        let second: Vec<Vec<f64>> = (&sampler).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), sampler.len());
    }

    #[test]
    fn finer_grid_contains_coarser_grid() {
        let coarse = FreeParameterSpec::new(&chain(), &[0], FRAC_PI_4).unwrap();
        let fine = FreeParameterSpec::new(&chain(), &[0], FRAC_PI_8).unwrap();
        let fine_values: Vec<f64> = FreeParameterSampler::new(&fine)
            .iter()
            .map(|v| v[0])
            .collect();
        for v in FreeParameterSampler::new(&coarse).iter() {
            assert!(fine_values.iter().any(|f| (f - v[0]).abs() < 1e-12));
        }
    }

    #[test]
    fn invalid_indices_rejected() {
        assert!(matches!(
            FreeParameterSpec::new(&chain(), &[3], 0.1),
            Err(ConfigError::FreeIndexOutOfRange { index: 3, dof: 3 })
        ));
        assert!(matches!(
            FreeParameterSpec::new(&chain(), &[1, 1], 0.1),
            Err(ConfigError::DuplicateFreeIndex(1))
        ));
        assert!(matches!(
            FreeParameterSpec::with_increments(&chain(), &[0, 1], &[0.1]),
            Err(ConfigError::FreeCountMismatch { .. })
        ));
        assert!(FreeParameterSpec::new(&chain(), &[0], f64::NAN).is_err());
    }

    #[test]
    fn spec_accessors() {
        let spec = FreeParameterSpec::new(&chain(), &[1, 0], 0.1).unwrap();
        assert_eq!(spec.indices(), vec![1, 0]);
        assert_eq!(spec.len(), 2);
        assert!(!spec.is_empty());
        assert_relative_eq!(spec.joints()[0].upper, 1.0);
    }
}
