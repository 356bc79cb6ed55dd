// ikfast-core: types, config and errors shared by the closed-form IK crates.

pub mod config;
pub mod error;
pub mod types;

pub use config::{SolutionOrdering, SolverConfig};
pub use error::{ChainError, ConfigError, IkError, SolveError};
pub use types::{
    IkParameterizationType, IkSolution, JointType, PoseResidual, TargetPose, normalize_angle,
};
