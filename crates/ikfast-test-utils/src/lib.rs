//! Shared test fixtures and utilities for the closed-form IK crates.
//!
//! Provides deterministic RNG setup and random joint configurations drawn
//! from a chain's limits.

pub mod rng;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use rng::{random_configuration, random_configurations, seeded_rng};
