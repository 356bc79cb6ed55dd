use std::path::PathBuf;

use thiserror::Error;

use crate::types::IkParameterizationType;

/// Top-level error type for the IK workspace.
#[derive(Debug, Error)]
pub enum IkError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("Solve error: {0}")]
    Solve(#[from] SolveError),
}

/// Registration-time configuration errors.
///
/// Any of these aborts solver construction; a solver is never built from a
/// configuration that failed validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Joint count mismatch: chain has {chain} joints, equations expect {equations}")]
    JointCountMismatch { chain: usize, equations: usize },

    #[error("Free joint index {index} out of range for {dof}-joint chain")]
    FreeIndexOutOfRange { index: usize, dof: usize },

    #[error("Free joint index {0} listed more than once")]
    DuplicateFreeIndex(usize),

    #[error("Free parameter count mismatch: expected {expected}, got {got}")]
    FreeCountMismatch { expected: usize, got: usize },

    #[error("Malformed limits on joint {joint}: [{lower}, {upper}]")]
    MalformedLimits { joint: usize, lower: f64, upper: f64 },

    #[error("Duplicate robot identifier: {0}")]
    DuplicateRobot(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Kinematic chain construction errors.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("URDF parse error: {0}")]
    Urdf(String),

    #[error("link not reachable from root: {0}")]
    UnreachableLink(String),

    #[error("missing joint: {0}")]
    MissingJoint(String),

    #[error("zero-length joint axis on joint {0}")]
    DegenerateAxis(String),
}

/// Malformed solve queries.
///
/// These are caller bugs, distinct from "no solution", which is an empty
/// result rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("Target parameterization mismatch: solver expects {expected}, got {got}")]
    ParameterizationMismatch {
        expected: IkParameterizationType,
        got: IkParameterizationType,
    },

    #[error("Seed dimension mismatch: expected {expected}, got {got}")]
    SeedDimMismatch { expected: usize, got: usize },

    #[error("Seed contains a non-finite value at joint {joint}")]
    SeedNotFinite { joint: usize },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
