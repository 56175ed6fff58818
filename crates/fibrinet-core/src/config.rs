//! Session configuration
//!
//! Loadable from TOML:
//!
//! ```toml
//! strategy = "spring_force_2d"
//! new_network_mode = false
//!
//! [relaxation]
//! max_iterations = 1000
//! step_size = 0.01
//! tolerance = 1e-5
//! ```

use crate::error::{CoreError, CoreResult};
use fibrinet_degradation::{RelaxationParams, StrategyKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Session configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Strategy active after construction
    pub strategy: StrategyKind,
    /// Spring solver parameters
    pub relaxation: RelaxationParams,
    /// Require a minimum network size before export
    pub new_network_mode: bool,
}

impl SessionConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With initial strategy
    #[inline]
    #[must_use]
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// With relaxation parameters
    #[inline]
    #[must_use]
    pub fn with_relaxation(mut self, relaxation: RelaxationParams) -> Self {
        self.relaxation = relaxation;
        self
    }

    /// With new-network mode
    #[inline]
    #[must_use]
    pub fn with_new_network_mode(mut self, enabled: bool) -> Self {
        self.new_network_mode = enabled;
        self
    }

    /// Parse from TOML text.
    ///
    /// # Errors
    /// [`CoreError::Config`] on malformed TOML or unknown values
    pub fn from_toml_str(source: &str) -> CoreResult<Self> {
        toml::from_str(source).map_err(|e| CoreError::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    ///
    /// # Errors
    /// [`CoreError::Io`] if the file cannot be read, [`CoreError::Config`]
    /// if it cannot be parsed
    pub fn from_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = SessionConfig::new();
        assert_eq!(config.strategy, StrategyKind::NoPhysics);
        assert_eq!(config.relaxation.max_iterations, 1000);
        assert!(!config.new_network_mode);
    }

    #[test]
    fn builder() {
        let config = SessionConfig::new()
            .with_strategy(StrategyKind::SpringForce2d)
            .with_relaxation(RelaxationParams::default().with_tolerance(1e-3))
            .with_new_network_mode(true);
        assert_eq!(config.strategy, StrategyKind::SpringForce2d);
        assert!((config.relaxation.tolerance - 1e-3).abs() < f64::EPSILON);
        assert!(config.new_network_mode);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = SessionConfig::from_toml_str(
            r#"
            strategy = "spring_force_2d"

            [relaxation]
            max_iterations = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.strategy, StrategyKind::SpringForce2d);
        assert_eq!(config.relaxation.max_iterations, 50);
        assert!((config.relaxation.step_size - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_strategy_is_config_error() {
        let err = SessionConfig::from_toml_str(r#"strategy = "magic""#).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "new_network_mode = true").unwrap();
        let config = SessionConfig::from_file(file.path()).unwrap();
        assert!(config.new_network_mode);

        let err = SessionConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, CoreError::Io { .. }));
    }
}
