//! Multi-solution closed-form IK solver.
//!
//! An [`IkSolver`] binds a [`KinematicChain`] to its [`ChainEquations`] and
//! turns one target pose into a set of joint-space solutions:
//!
//! 1. Sweep the free joints (a single empty tuple when there are none) and
//!    evaluate the equations for every sample.
//! 2. Drop candidates with non-finite values or joints outside their limits
//!    (revolute joints may first be shifted by multiples of 2π).
//! 3. Optionally re-check each candidate with forward kinematics.
//! 4. Apply the caller's filter.
//! 5. Drop near-duplicates of solutions already accepted.
//! 6. Rank by distance to the seed, if one is given.
//!
//! "No solution" is an empty result. Only malformed queries return errors.

use std::f64::consts::TAU;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use ikfast_chain::KinematicChain;
use ikfast_core::{
    ConfigError, IkParameterizationType, IkSolution, SolutionOrdering, SolveError, SolverConfig,
    TargetPose,
};

use crate::equations::ChainEquations;
use crate::sampler::{FreeParameterSampler, FreeParameterSpec};

/// Slack applied to limit checks after wrapping.
const LIMIT_EPS: f64 = 1e-9;

// ---------------------------------------------------------------------------
// SolveControl / SolveStats / SolveReport
// ---------------------------------------------------------------------------

/// Per-call options for [`IkSolver::solve_with`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SolveControl<'a> {
    /// Stop after the first accepted solution.
    pub first_only: bool,
    /// Polled before every sample; once set, the solve returns what it has.
    pub cancel: Option<&'a AtomicBool>,
}

impl<'a> SolveControl<'a> {
    #[must_use]
    pub const fn first_only(mut self) -> Self {
        self.first_only = true;
        self
    }

    #[must_use]
    pub const fn with_cancel(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Counters describing one solve call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    /// Free-parameter samples evaluated.
    pub samples: usize,
    /// Candidates returned by the chain equations.
    pub candidates: usize,
    /// Candidates with NaN or infinite joint values.
    pub rejected_degenerate: usize,
    pub rejected_limits: usize,
    /// Candidates whose forward kinematics missed the target.
    pub rejected_verification: usize,
    pub rejected_filter: usize,
    pub duplicates: usize,
    /// The solve stopped early because the cancel flag was set.
    pub cancelled: bool,
}

/// Result of [`IkSolver::solve_with`].
#[derive(Debug, Clone, Default)]
pub struct SolveReport {
    pub solutions: Vec<IkSolution>,
    pub stats: SolveStats,
}

// ---------------------------------------------------------------------------
// IkSolver
// ---------------------------------------------------------------------------

/// Closed-form IK solver for one robot.
///
/// Immutable after construction and `Send + Sync`; one solver may serve
/// concurrent queries.
#[derive(Clone)]
pub struct IkSolver {
    id: String,
    chain: Arc<KinematicChain>,
    equations: Arc<dyn ChainEquations>,
    free: FreeParameterSpec,
    sampler: FreeParameterSampler,
    config: SolverConfig,
}

impl std::fmt::Debug for IkSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IkSolver")
            .field("id", &self.id)
            .field("dof", &self.chain.dof())
            .field("free", &self.free)
            .field("parameterization", &self.equations.parameterization())
            .finish_non_exhaustive()
    }
}

/// Check that `equations` can drive `chain`.
///
/// Run at registration time so that mismatches never reach a solve call.
pub fn validate_binding(
    chain: &KinematicChain,
    equations: &dyn ChainEquations,
) -> Result<(), ConfigError> {
    if equations.num_joints() != chain.dof() {
        return Err(ConfigError::JointCountMismatch {
            chain: chain.dof(),
            equations: equations.num_joints(),
        });
    }
    chain.validate()?;
    // Index and duplicate checks; the increment is irrelevant here.
    FreeParameterSpec::new(chain, equations.free_joints(), 0.0)?;
    Ok(())
}

impl IkSolver {
    /// Bind `equations` to `chain`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid, the joint
    /// counts differ, the chain limits are malformed, or a free index is
    /// out of range or repeated.
    pub fn new(
        id: impl Into<String>,
        chain: Arc<KinematicChain>,
        equations: Arc<dyn ChainEquations>,
        config: SolverConfig,
    ) -> Result<Self, ConfigError> {
        let id = id.into();
        config.validate()?;
        validate_binding(&chain, equations.as_ref())?;
        if let Some(weights) = &config.joint_weights {
            if weights.len() != chain.dof() {
                return Err(ConfigError::InvalidValue {
                    field: "joint_weights".into(),
                    message: format!("expected {} weights, got {}", chain.dof(), weights.len()),
                });
            }
        }

        let free = FreeParameterSpec::new(&chain, equations.free_joints(), config.free_increment)?;
        let sampler = FreeParameterSampler::new(&free);
        info!(
            robot = %id,
            dof = chain.dof(),
            free_joints = free.len(),
            samples = sampler.len(),
            "ik solver created"
        );

        Ok(Self {
            id,
            chain,
            equations,
            free,
            sampler,
            config,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn chain(&self) -> &KinematicChain {
        &self.chain
    }

    pub fn dof(&self) -> usize {
        self.chain.dof()
    }

    pub fn free_parameters(&self) -> &FreeParameterSpec {
        &self.free
    }

    pub fn parameterization(&self) -> IkParameterizationType {
        self.equations.parameterization()
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Number of free-parameter samples evaluated by a full solve.
    pub fn sample_count(&self) -> usize {
        self.sampler.len()
    }

    /// All solutions for `target`, ranked per the configured ordering.
    pub fn find_solutions<F>(
        &self,
        target: &TargetPose,
        seed: Option<&[f64]>,
        filter: F,
    ) -> Result<Vec<IkSolution>, SolveError>
    where
        F: FnMut(&IkSolution) -> bool,
    {
        self.solve_with(target, seed, filter, &SolveControl::default())
            .map(|report| report.solutions)
    }

    /// The first solution found, without evaluating the remaining samples.
    pub fn find_first_solution<F>(
        &self,
        target: &TargetPose,
        filter: F,
    ) -> Result<Option<IkSolution>, SolveError>
    where
        F: FnMut(&IkSolution) -> bool,
    {
        let control = SolveControl::default().first_only();
        self.solve_with(target, None, filter, &control)
            .map(|report| report.solutions.into_iter().next())
    }

    /// The solution closest to `seed`, regardless of the configured ordering.
    pub fn find_closest_solution<F>(
        &self,
        target: &TargetPose,
        seed: &[f64],
        filter: F,
    ) -> Result<Option<IkSolution>, SolveError>
    where
        F: FnMut(&IkSolution) -> bool,
    {
        let report = self.solve_with(target, Some(seed), filter, &SolveControl::default())?;
        let weights = self.config.joint_weights.as_deref();
        Ok(report.solutions.into_iter().min_by(|a, b| {
            a.distance_to(seed, weights)
                .total_cmp(&b.distance_to(seed, weights))
        }))
    }

    /// Full solve with explicit control, returning statistics alongside
    /// the solutions.
    pub fn solve_with<F>(
        &self,
        target: &TargetPose,
        seed: Option<&[f64]>,
        filter: F,
        control: &SolveControl<'_>,
    ) -> Result<SolveReport, SolveError>
    where
        F: FnMut(&IkSolution) -> bool,
    {
        self.check_query(target, seed)?;
        let batches = self
            .sampler
            .iter()
            .map(|free_values| self.equations.solve(target, &free_values));
        Ok(self.collect(target, seed, batches, filter, control))
    }

    /// Like [`IkSolver::find_solutions`], but evaluates the chain equations
    /// for all samples on the rayon pool. Results are merged in sample order,
    /// so the output equals the sequential one.
    #[cfg(feature = "parallel")]
    pub fn find_solutions_par<F>(
        &self,
        target: &TargetPose,
        seed: Option<&[f64]>,
        filter: F,
    ) -> Result<Vec<IkSolution>, SolveError>
    where
        F: FnMut(&IkSolution) -> bool,
    {
        use rayon::prelude::*;

        self.check_query(target, seed)?;
        let samples: Vec<Vec<f64>> = self.sampler.iter().collect();
        let batches: Vec<Vec<IkSolution>> = samples
            .par_iter()
            .map(|free_values| self.equations.solve(target, free_values))
            .collect();
        let report = self.collect(
            target,
            seed,
            batches.into_iter(),
            filter,
            &SolveControl::default(),
        );
        Ok(report.solutions)
    }

    fn check_query(&self, target: &TargetPose, seed: Option<&[f64]>) -> Result<(), SolveError> {
        let expected = self.parameterization();
        let got = target.parameterization();
        if expected != got {
            return Err(SolveError::ParameterizationMismatch { expected, got });
        }
        if let Some(seed) = seed {
            if seed.len() != self.dof() {
                return Err(SolveError::SeedDimMismatch {
                    expected: self.dof(),
                    got: seed.len(),
                });
            }
            if let Some(joint) = seed.iter().position(|v| !v.is_finite()) {
                return Err(SolveError::SeedNotFinite { joint });
            }
        }
        Ok(())
    }

    /// Filter, deduplicate and rank candidate batches (one batch per sample).
    fn collect<I, F>(
        &self,
        target: &TargetPose,
        seed: Option<&[f64]>,
        mut batches: I,
        mut filter: F,
        control: &SolveControl<'_>,
    ) -> SolveReport
    where
        I: Iterator<Item = Vec<IkSolution>>,
        F: FnMut(&IkSolution) -> bool,
    {
        let mut stats = SolveStats::default();
        let mut accepted: Vec<IkSolution> = Vec::new();

        'samples: loop {
            if control.is_cancelled() {
                stats.cancelled = true;
                break;
            }
            let Some(batch) = batches.next() else {
                break;
            };
            stats.samples += 1;
            stats.candidates += batch.len();

            for candidate in batch {
                let Some(solution) = self.admit(target, candidate, &mut stats) else {
                    continue;
                };
                if !filter(&solution) {
                    stats.rejected_filter += 1;
                    continue;
                }
                if accepted
                    .iter()
                    .any(|s| s.max_abs_diff(&solution) <= self.config.dedup_tolerance)
                {
                    stats.duplicates += 1;
                    continue;
                }
                accepted.push(solution);
                if control.first_only {
                    break 'samples;
                }
            }
        }

        if let (Some(seed), SolutionOrdering::ClosestToSeed) = (seed, self.config.ordering) {
            let weights = self.config.joint_weights.as_deref();
            // Stable sort keeps discovery order between equidistant solutions.
            accepted.sort_by(|a, b| {
                a.distance_to(seed, weights)
                    .total_cmp(&b.distance_to(seed, weights))
            });
        }

        debug!(
            robot = %self.id,
            solutions = accepted.len(),
            samples = stats.samples,
            candidates = stats.candidates,
            rejected_limits = stats.rejected_limits,
            rejected_verification = stats.rejected_verification,
            rejected_filter = stats.rejected_filter,
            duplicates = stats.duplicates,
            cancelled = stats.cancelled,
            "ik solve finished"
        );

        SolveReport {
            solutions: accepted,
            stats,
        }
    }

    /// Limit and verification checks for one candidate.
    fn admit(
        &self,
        target: &TargetPose,
        mut candidate: IkSolution,
        stats: &mut SolveStats,
    ) -> Option<IkSolution> {
        if candidate.dof() != self.dof() || candidate.joints().iter().any(|v| !v.is_finite()) {
            stats.rejected_degenerate += 1;
            return None;
        }

        for (value, joint) in candidate.joints_mut().iter_mut().zip(self.chain.joints()) {
            if self.config.wrap_revolute && joint.joint_type.is_revolute() {
                *value = wrap_into_limits(*value, joint.lower_limit, joint.upper_limit);
            }
            if !joint.contains(*value, LIMIT_EPS) {
                stats.rejected_limits += 1;
                return None;
            }
            // Returned values always lie inside the limits.
            *value = value.clamp(joint.lower_limit, joint.upper_limit);
        }

        if self.config.verify_solutions {
            let ee = self.chain.forward_kinematics(candidate.joints());
            if !target.residual(&ee).within(self.config.verify_tolerance) {
                stats.rejected_verification += 1;
                return None;
            }
        }

        Some(candidate)
    }
}

/// Shift `value` by a multiple of 2π into `[lower, upper]` if possible.
///
/// Values already inside the limits are returned unchanged; otherwise the
/// smallest equivalent angle not below `lower` is tried.
fn wrap_into_limits(value: f64, lower: f64, upper: f64) -> f64 {
    if value >= lower - LIMIT_EPS && value <= upper + LIMIT_EPS {
        return value;
    }
    let shifted = value - TAU * ((value - lower) / TAU).floor();
    if shifted <= upper + LIMIT_EPS {
        shifted
    } else {
        value
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
