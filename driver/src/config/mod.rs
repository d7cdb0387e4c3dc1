//! Driver configuration.
//!
//! Configuration is read from an optional JSON file. Every field has a
//! default, so an empty object or a missing file yields a usable setup.

use crate::errors::{ConfigError, DriverError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level driver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Programs implementing the stages.
    pub components: ComponentPaths,
    /// Directory that portfolio aliases resolve into.
    pub portfolio_dir: PathBuf,
    /// Service frontend settings.
    pub service: ServiceConfig,
    /// Logging settings.
    pub telemetry: TelemetryConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            components: ComponentPaths::default(),
            portfolio_dir: PathBuf::from("driver/portfolios"),
            service: ServiceConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl DriverConfig {
    /// Loads the configuration, falling back to defaults without a path.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be read and
    /// [`ConfigError::InvalidConfig`] if its content is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, DriverError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| ConfigError::InvalidConfig(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that deserialize fine but cannot work.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service.max_concurrent_runs == 0 {
            return Err(ConfigError::InvalidConfig(
                "service.max_concurrent_runs must be at least 1".to_string(),
            ));
        }
        if self.service.listen_addr.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "service.listen_addr must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Locations of the stage programs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentPaths {
    /// Interpreter running the translator.
    pub python: PathBuf,
    /// Translator script.
    pub translator: PathBuf,
    /// Search engine binary.
    pub search: PathBuf,
    /// Plan validator binary.
    pub validator: PathBuf,
}

impl Default for ComponentPaths {
    fn default() -> Self {
        Self {
            python: PathBuf::from("python3"),
            translator: PathBuf::from("builds/release/bin/translate/translate.py"),
            search: PathBuf::from("builds/release/bin/downward"),
            validator: PathBuf::from("validate"),
        }
    }
}

/// Settings of the long-lived service frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Address the listener binds to.
    pub listen_addr: String,
    /// Pipelines allowed to run at the same time.
    pub max_concurrent_runs: usize,
    /// Directory for intermediate files of requests that name none.
    pub work_dir: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:4747".to_string(),
            max_concurrent_runs: 1,
            work_dir: std::env::temp_dir(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Filter used when `RUST_LOG` is not set.
    pub filter: String,
    /// Emit JSON log lines.
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_without_path_uses_defaults() {
        let config = DriverConfig::load(None).unwrap();
        assert_eq!(config, DriverConfig::default());
        assert_eq!(config.service.max_concurrent_runs, 1);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("driver.json");
        std::fs::write(
            &path,
            r#"{"components": {"search": "/opt/downward"}, "service": {"max_concurrent_runs": 4}}"#,
        )
        .unwrap();

        let config = DriverConfig::load(Some(&path)).unwrap();

        assert_eq!(config.components.search, PathBuf::from("/opt/downward"));
        assert_eq!(config.components.python, PathBuf::from("python3"));
        assert_eq!(config.service.max_concurrent_runs, 4);
        assert_eq!(config.service.listen_addr, "127.0.0.1:4747");
    }

    #[test]
    fn test_load_rejects_zero_concurrency() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("driver.json");
        std::fs::write(&path, r#"{"service": {"max_concurrent_runs": 0}}"#).unwrap();

        let err = DriverConfig::load(Some(&path)).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("driver.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = DriverConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, DriverError::Config(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = DriverConfig::load(Some(Path::new("/nonexistent/driver.json"))).unwrap_err();
        assert!(matches!(err, DriverError::Io(_)));
    }
}
