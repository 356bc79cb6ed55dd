//! Deterministic RNG utilities for reproducible tests.

use ikfast_chain::KinematicChain;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Create a deterministic `ChaCha8Rng` from a seed.
///
/// All test randomization should go through this to ensure reproducibility.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Uniform joint configuration inside the chain limits, shrunk by `margin`
/// on both sides of every range.
///
/// Joints whose range is narrower than `2 * margin` get their midpoint.
pub fn random_configuration(chain: &KinematicChain, rng: &mut impl Rng, margin: f64) -> Vec<f64> {
    chain
        .joints()
        .iter()
        .map(|joint| {
            let lower = joint.lower_limit + margin;
            let upper = joint.upper_limit - margin;
            if lower < upper {
                rng.gen_range(lower..upper)
            } else {
                0.5 * (joint.lower_limit + joint.upper_limit)
            }
        })
        .collect()
}

/// `count` configurations from [`random_configuration`], seeded by `seed`.
pub fn random_configurations(
    chain: &KinematicChain,
    count: usize,
    seed: u64,
    margin: f64,
) -> Vec<Vec<f64>> {
    let mut rng = seeded_rng(seed);
    (0..count)
        .map(|_| random_configuration(chain, &mut rng, margin))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
