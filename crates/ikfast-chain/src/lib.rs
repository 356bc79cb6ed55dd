//! Kinematic chains for closed-form IK solvers.
//!
//! A [`KinematicChain`] describes the joints, limits and static transforms of
//! one robot arm. Chains are built by hand with [`ChainBuilder`] or loaded
//! from URDF, and are immutable afterwards. Forward kinematics on the chain is
//! how solutions are verified against their target pose.

pub mod chain;
pub mod urdf;

pub use chain::{ChainBuilder, ChainJoint, KinematicChain};
