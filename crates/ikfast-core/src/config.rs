use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_free_increment() -> f64 {
    0.04
}
const fn default_dedup_tolerance() -> f64 {
    1e-6
}
const fn default_verify_tolerance() -> f64 {
    1e-5
}
const fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// SolutionOrdering
// ---------------------------------------------------------------------------

/// How a solve orders its accepted solutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolutionOrdering {
    /// Order in which samples produced them.
    Discovery,
    /// Closest to the seed first; discovery order when no seed is given.
    #[default]
    ClosestToSeed,
}

// ---------------------------------------------------------------------------
// SolverConfig
// ---------------------------------------------------------------------------

/// Tunable policy for a closed-form IK solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Sampling step for free joints (rad or m). Values <= 0 sample a
    /// single point per free joint.
    #[serde(default = "default_free_increment")]
    pub free_increment: f64,

    /// Two solutions whose joints all differ by less than this are merged.
    #[serde(default = "default_dedup_tolerance")]
    pub dedup_tolerance: f64,

    /// Re-run forward kinematics on every candidate and drop mismatches.
    #[serde(default = "default_true")]
    pub verify_solutions: bool,

    /// Maximum position (m) and angle (rad) residual accepted by verification.
    #[serde(default = "default_verify_tolerance")]
    pub verify_tolerance: f64,

    #[serde(default)]
    pub ordering: SolutionOrdering,

    /// Per-joint weights for the seed distance. `None` weighs every joint 1.
    #[serde(default)]
    pub joint_weights: Option<Vec<f64>>,

    /// Shift revolute joints by multiples of 2π into their limits before
    /// rejecting them.
    #[serde(default = "default_true")]
    pub wrap_revolute: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            free_increment: default_free_increment(),
            dedup_tolerance: default_dedup_tolerance(),
            verify_solutions: true,
            verify_tolerance: default_verify_tolerance(),
            ordering: SolutionOrdering::default(),
            joint_weights: None,
            wrap_revolute: true,
        }
    }
}

impl SolverConfig {
    /// Default configuration with a different free-joint increment.
    pub fn with_increment(free_increment: f64) -> Self {
        Self {
            free_increment,
            ..Self::default()
        }
    }

    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.free_increment.is_nan() {
            return Err(invalid("free_increment", "must not be NaN"));
        }
        if !self.dedup_tolerance.is_finite() || self.dedup_tolerance < 0.0 {
            return Err(invalid("dedup_tolerance", "must be finite and >= 0"));
        }
        if !self.verify_tolerance.is_finite() || self.verify_tolerance <= 0.0 {
            return Err(invalid("verify_tolerance", "must be finite and > 0"));
        }
        if let Some(weights) = &self.joint_weights {
            if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(invalid("joint_weights", "must be finite and >= 0"));
            }
        }
        Ok(())
    }

    /// Parse and validate from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SolverConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.free_increment - 0.04).abs() < f64::EPSILON);
        assert_eq!(config.ordering, SolutionOrdering::ClosestToSeed);
        assert!(config.verify_solutions);
        assert!(config.wrap_revolute);
    }

    #[test]
    fn with_increment_overrides_only_increment() {
        let config = SolverConfig::with_increment(0.1);
        assert!((config.free_increment - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.dedup_tolerance, SolverConfig::default().dedup_tolerance);
    }

    #[test]
    fn non_positive_increment_is_valid() {
        assert!(SolverConfig::with_increment(0.0).validate().is_ok());
        assert!(SolverConfig::with_increment(-1.0).validate().is_ok());
    }

    #[test]
    fn nan_increment_rejected() {
        let err = SolverConfig::with_increment(f64::NAN).validate().unwrap_err();
        assert!(err.to_string().contains("free_increment"));
    }

    #[test]
    fn negative_dedup_tolerance_rejected() {
        let config = SolverConfig {
            dedup_tolerance: -1.0,
            ..SolverConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn zero_verify_tolerance_rejected() {
        let config = SolverConfig {
            verify_tolerance: 0.0,
            ..SolverConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_weight_rejected() {
        let config = SolverConfig {
            joint_weights: Some(vec![1.0, -0.5]),
            ..SolverConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_empty_uses_defaults() {
        let config = SolverConfig::from_toml_str("").unwrap();
        assert_eq!(config, SolverConfig::default());
    }

    #[test]
    fn toml_roundtrip_fields() {
        let config = SolverConfig::from_toml_str(
            r#"
            free_increment = 0.1
            dedup_tolerance = 1e-4
            ordering = "discovery"
            joint_weights = [1.0, 2.0, 0.5]
            wrap_revolute = false
            "#,
        )
        .unwrap();
        assert!((config.free_increment - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.ordering, SolutionOrdering::Discovery);
        assert_eq!(config.joint_weights, Some(vec![1.0, 2.0, 0.5]));
        assert!(!config.wrap_revolute);
        assert!(config.verify_solutions);
    }

    #[test]
    fn toml_invalid_value_rejected() {
        let err = SolverConfig::from_toml_str("verify_tolerance = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn toml_syntax_error() {
        let err = SolverConfig::from_toml_str("free_increment = ").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SolverConfig::from_file("/nonexistent/solver.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
