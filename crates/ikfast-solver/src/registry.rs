//! Robot identifier -> solver lookup.
//!
//! A [`SolverRegistry`] owns the immutable chains and equation sets of the
//! robots it knows about, validated once at registration. Solvers are
//! created on demand with a caller-chosen sampling increment. Unknown
//! identifiers give `Ok(None)`, so a [`SolverFactory`] can probe several
//! sources in turn; a known robot with a bad configuration is an error and
//! stops the probe.

use std::sync::Arc;

use tracing::{info, warn};

use ikfast_chain::KinematicChain;
use ikfast_core::{ConfigError, IkParameterizationType, SolverConfig};

use crate::equations::ChainEquations;
use crate::solver::{IkSolver, validate_binding};

/// Metadata describing one supported robot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotInfo {
    pub id: String,
    pub joint_count: usize,
    pub free_joints: Vec<usize>,
    pub parameterization: IkParameterizationType,
}

/// Anything that can turn a robot identifier into a solver.
pub trait SolverSource: Send + Sync {
    /// Solver for `robot`, or `Ok(None)` if this source does not know it.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the robot is known but no solver can be
    /// built for it, e.g. because `free_increment` is NaN.
    fn create_solver(
        &self,
        robot: &str,
        free_increment: f64,
    ) -> Result<Option<IkSolver>, ConfigError>;

    fn list_supported_robots(&self) -> Vec<RobotInfo>;
}

/// Normalized lookup key: first whitespace-separated token, lowercased.
fn lookup_key(robot: &str) -> String {
    robot
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

struct RobotEntry {
    id: String,
    key: String,
    chain: Arc<KinematicChain>,
    equations: Arc<dyn ChainEquations>,
}

impl RobotEntry {
    fn info(&self) -> RobotInfo {
        RobotInfo {
            id: self.id.clone(),
            joint_count: self.chain.dof(),
            free_joints: self.equations.free_joints().to_vec(),
            parameterization: self.equations.parameterization(),
        }
    }
}

// ---------------------------------------------------------------------------
// SolverRegistry
// ---------------------------------------------------------------------------

/// Explicit, owned table of registered robots.
#[derive(Default)]
pub struct SolverRegistry {
    entries: Vec<RobotEntry>,
    base_config: SolverConfig,
}

impl std::fmt::Debug for SolverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverRegistry")
            .field("robots", &self.entries.iter().map(|e| &e.id).collect::<Vec<_>>())
            .field("base_config", &self.base_config)
            .finish()
    }
}

impl SolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose solvers start from `config` (increment overridden per call).
    pub fn with_config(config: SolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            entries: Vec::new(),
            base_config: config,
        })
    }

    pub fn base_config(&self) -> &SolverConfig {
        &self.base_config
    }

    /// Register a robot.
    ///
    /// # Errors
    ///
    /// Fails if the identifier is empty, already taken (case-insensitive),
    /// or the equations cannot drive the chain; see [`validate_binding`].
    pub fn register(
        &mut self,
        id: &str,
        chain: KinematicChain,
        equations: Arc<dyn ChainEquations>,
    ) -> Result<(), ConfigError> {
        let key = lookup_key(id);
        if key.is_empty() {
            warn!("empty robot identifier rejected");
            return Err(ConfigError::InvalidValue {
                field: "id".into(),
                message: "robot identifier must not be empty".into(),
            });
        }
        if self.entries.iter().any(|e| e.key == key) {
            warn!(robot = id, "duplicate robot identifier rejected");
            return Err(ConfigError::DuplicateRobot(id.to_string()));
        }
        if let Err(err) = validate_binding(&chain, equations.as_ref()) {
            warn!(robot = id, error = %err, "robot registration rejected");
            return Err(err);
        }

        info!(
            robot = id,
            dof = chain.dof(),
            parameterization = %equations.parameterization(),
            "robot registered"
        );
        self.entries.push(RobotEntry {
            id: id.to_string(),
            key,
            chain: Arc::new(chain),
            equations,
        });
        Ok(())
    }

    pub fn contains(&self, robot: &str) -> bool {
        self.find(robot).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Shared chain of a registered robot.
    pub fn chain(&self, robot: &str) -> Option<Arc<KinematicChain>> {
        self.find(robot).map(|e| Arc::clone(&e.chain))
    }

    /// Solver for `robot` with an explicit configuration.
    ///
    /// `Ok(None)` if the robot is unknown.
    pub fn try_create_solver(
        &self,
        robot: &str,
        config: SolverConfig,
    ) -> Result<Option<IkSolver>, ConfigError> {
        let Some(entry) = self.find(robot) else {
            return Ok(None);
        };
        IkSolver::new(
            entry.id.clone(),
            Arc::clone(&entry.chain),
            Arc::clone(&entry.equations),
            config,
        )
        .map(Some)
    }

    fn find(&self, robot: &str) -> Option<&RobotEntry> {
        let key = lookup_key(robot);
        self.entries.iter().find(|e| e.key == key)
    }
}

impl SolverSource for SolverRegistry {
    fn create_solver(
        &self,
        robot: &str,
        free_increment: f64,
    ) -> Result<Option<IkSolver>, ConfigError> {
        let config = SolverConfig {
            free_increment,
            ..self.base_config.clone()
        };
        self.try_create_solver(robot, config).inspect_err(|err| {
            warn!(robot, error = %err, "solver creation failed");
        })
    }

    fn list_supported_robots(&self) -> Vec<RobotInfo> {
        self.entries.iter().map(RobotEntry::info).collect()
    }
}

// ---------------------------------------------------------------------------
// SolverFactory
// ---------------------------------------------------------------------------

/// Ordered list of solver sources, probed first to last.
#[derive(Default)]
pub struct SolverFactory {
    sources: Vec<Box<dyn SolverSource>>,
}

impl SolverFactory {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_source(mut self, source: impl SolverSource + 'static) -> Self {
        self.push(source);
        self
    }

    pub fn push(&mut self, source: impl SolverSource + 'static) {
        self.sources.push(Box::new(source));
    }

    /// First solver any source produces for `robot`.
    ///
    /// # Errors
    ///
    /// Stops at the first source that knows `robot` but fails to build a
    /// solver for it; later sources are not consulted.
    pub fn create_solver(
        &self,
        robot: &str,
        free_increment: f64,
    ) -> Result<Option<IkSolver>, ConfigError> {
        for source in &self.sources {
            if let Some(solver) = source.create_solver(robot, free_increment)? {
                return Ok(Some(solver));
            }
        }
        Ok(None)
    }

    /// Robots from every source, in probing order.
    pub fn list_supported_robots(&self) -> Vec<RobotInfo> {
        self.sources
            .iter()
            .flat_map(|source| source.list_supported_robots())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
