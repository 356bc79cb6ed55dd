//! Closed-form multi-solution inverse kinematics.
//!
//! # Architecture
//!
//! ```text
//! SolverRegistry ──► IkSolver ──► FreeParameterSampler ──► ChainEquations ──► IkSolution*
//!                        │                                                        │
//!                        └──────── limits / verification / filter / dedup ◄───────┘
//! ```
//!
//! [`ChainEquations`] implementations hold the robot-specific closed-form
//! math. Everything else here is shared: sweeping free joints, rejecting
//! out-of-limit or inconsistent candidates, applying the caller's filter,
//! merging duplicates and ranking by distance to a seed.

pub mod equations;
pub mod registry;
pub mod sampler;
pub mod solver;

pub use equations::ChainEquations;
pub use registry::{RobotInfo, SolverFactory, SolverRegistry, SolverSource};
pub use sampler::{FreeJoint, FreeParameterSampler, FreeParameterSpec, Samples};
pub use solver::{IkSolver, SolveControl, SolveReport, SolveStats, validate_binding};
