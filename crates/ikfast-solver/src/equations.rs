//! Contract for chain-specific closed-form equation sets.

use ikfast_core::{IkParameterizationType, IkSolution, TargetPose};

/// Closed-form IK equations for one kinematic structure.
///
/// Implementations are pure: identical `(target, free_values)` inputs give
/// identical outputs, and nothing is mutated. Unreachable targets and
/// singular configurations produce an empty `Vec`, never a panic.
///
/// `solve` is only called with targets whose parameterization equals
/// [`ChainEquations::parameterization`] and with one free value per entry of
/// [`ChainEquations::free_joints`], in the same order.
pub trait ChainEquations: Send + Sync {
    /// Number of joints in every returned solution.
    fn num_joints(&self) -> usize;

    /// Chain indices of the joints the equations take as inputs.
    fn free_joints(&self) -> &[usize];

    fn parameterization(&self) -> IkParameterizationType;

    /// All candidate solutions for `target` with the free joints fixed at
    /// `free_values`.
    fn solve(&self, target: &TargetPose, free_values: &[f64]) -> Vec<IkSolution>;
}
