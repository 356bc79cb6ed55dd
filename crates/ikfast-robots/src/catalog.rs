//! The set of robots shipped with the crate.

use std::sync::Arc;

use tracing::debug;

use ikfast_core::{ConfigError, SolverConfig};
use ikfast_solver::SolverRegistry;

use crate::opw::{Elbow3, Opw6};
use crate::pan_tilt::PanTilt;
use crate::planar::{Planar2R, Planar3R, Planar3RPose};
use crate::rail::RailOpw7;

pub const PLANAR2R: &str = "planar2r";
pub const PLANAR3R: &str = "planar3r";
pub const PLANAR3R_POSE: &str = "planar3r_pose";
pub const PAN_TILT: &str = "pan_tilt";
pub const ELBOW3: &str = "elbow3";
pub const OPW6: &str = "opw6";
pub const RAIL_OPW7: &str = "rail_opw7";

/// Identifiers of every built-in robot, in registration order.
pub const BUILTIN_ROBOTS: [&str; 7] = [
    PLANAR2R,
    PLANAR3R,
    PLANAR3R_POSE,
    PAN_TILT,
    ELBOW3,
    OPW6,
    RAIL_OPW7,
];

/// Register all built-in robots with their default dimensions.
pub fn register_builtin(registry: &mut SolverRegistry) -> Result<(), ConfigError> {
    let planar2r = Planar2R::default();
    registry.register(PLANAR2R, planar2r.chain(), Arc::new(planar2r))?;

    let planar3r = Planar3R::default();
    registry.register(PLANAR3R, planar3r.chain(), Arc::new(planar3r))?;

    let planar3r_pose = Planar3RPose::default();
    registry.register(PLANAR3R_POSE, planar3r_pose.chain(), Arc::new(planar3r_pose))?;

    let pan_tilt = PanTilt::default();
    registry.register(PAN_TILT, pan_tilt.chain(), Arc::new(pan_tilt))?;

    let elbow3 = Elbow3::default();
    registry.register(ELBOW3, elbow3.chain(), Arc::new(elbow3))?;

    let opw6 = Opw6::default();
    registry.register(OPW6, opw6.chain(), Arc::new(opw6))?;

    let rail = RailOpw7::default();
    registry.register(RAIL_OPW7, rail.chain(), Arc::new(rail))?;

    debug!(robots = registry.len(), "built-in robots registered");
    Ok(())
}

/// A registry holding every built-in robot, using default solver settings.
pub fn default_registry() -> Result<SolverRegistry, ConfigError> {
    registry_with_config(SolverConfig::default())
}

/// A registry holding every built-in robot, with `config` as the base for
/// all solvers it creates.
pub fn registry_with_config(config: SolverConfig) -> Result<SolverRegistry, ConfigError> {
    let mut registry = SolverRegistry::with_config(config)?;
    register_builtin(&mut registry)?;
    Ok(registry)
}
