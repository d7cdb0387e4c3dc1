//! Error types for the plan driver.
//!
//! Configuration errors are reported before any stage runs. Artifact errors
//! abort the pipeline run they occur in. A stage that asks the pipeline to
//! stop is not an error at all; it is reported through
//! [`StageResult::should_continue`](crate::core::StageResult).

use crate::core::{exit_codes, Component};
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for plan driver operations.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The request or configuration is invalid.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// The intermediate artifact is not in the expected state.
    #[error("{0}")]
    Artifact(#[from] ArtifactError),

    /// A stage program could not be started.
    #[error("Failed to launch {component} program {}: {source}", .program.display())]
    Launch {
        /// The stage being launched.
        component: Component,
        /// The program that failed to start.
        program: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DriverError {
    /// Creates a launch error.
    #[must_use]
    pub fn launch(component: Component, program: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Launch {
            component,
            program: program.into(),
            source,
        }
    }

    /// Returns the exit code reported for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => exit_codes::DRIVER_INPUT_ERROR,
            _ => exit_codes::DRIVER_CRITICAL_ERROR,
        }
    }

    /// Returns true if the error was caused by the request itself.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<serde_json::Error> for DriverError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Errors in a request or in the driver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A component name outside of translate, search and validate.
    #[error("Unknown component: '{0}'")]
    UnknownComponent(String),

    /// The request resolves to no stages.
    #[error("No components to run; pass a component list or request all components")]
    EmptyComponents,

    /// The requested alias is not registered.
    #[error("Unknown alias: '{0}'")]
    UnknownAlias(String),

    /// An alias was combined with explicit search settings.
    #[error("Alias '{0}' cannot be combined with search options or a portfolio")]
    AliasConflict(String),

    /// A stage is missing one of its inputs.
    #[error("Missing input for {component}: {reason}")]
    MissingInput {
        /// The stage lacking input.
        component: Component,
        /// What is missing.
        reason: String,
    },

    /// Another running request owns the artifact path.
    #[error("Intermediate file {} is already in use by another run", .0.display())]
    ArtifactPathInUse(PathBuf),

    /// The request could not be decoded.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The configuration file is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ConfigError {
    /// Creates a missing input error.
    #[must_use]
    pub fn missing_input(component: Component, reason: impl Into<String>) -> Self {
        Self::MissingInput {
            component,
            reason: reason.into(),
        }
    }
}

/// Errors while disposing of the intermediate artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The artifact does not exist.
    #[error("Intermediate file {} does not exist", .path.display())]
    Missing {
        /// The expected artifact path.
        path: PathBuf,
    },

    /// The artifact exists but could not be removed.
    #[error("Failed to remove intermediate file {}: {source}", .path.display())]
    Remove {
        /// The artifact path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl ArtifactError {
    /// Creates a missing artifact error.
    #[must_use]
    pub fn missing(path: impl Into<PathBuf>) -> Self {
        Self::Missing { path: path.into() }
    }

    /// Returns the artifact path involved.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Missing { path } | Self::Remove { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_map_to_driver_input_error() {
        let err = DriverError::from(ConfigError::EmptyComponents);
        assert!(err.is_config());
        assert_eq!(err.exit_code(), exit_codes::DRIVER_INPUT_ERROR);
    }

    #[test]
    fn test_artifact_errors_map_to_driver_critical_error() {
        let err = DriverError::from(ArtifactError::missing("output.sas"));
        assert!(!err.is_config());
        assert_eq!(err.exit_code(), exit_codes::DRIVER_CRITICAL_ERROR);
        assert!(err.to_string().contains("output.sas"));
    }

    #[test]
    fn test_launch_error_message() {
        let err = DriverError::launch(
            Component::Search,
            "/opt/planner/downward",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        let message = err.to_string();
        assert!(message.contains("search"));
        assert!(message.contains("/opt/planner/downward"));
        assert_eq!(err.exit_code(), exit_codes::DRIVER_CRITICAL_ERROR);
    }

    #[test]
    fn test_unknown_component_message() {
        let err = ConfigError::UnknownComponent("plan".to_string());
        assert_eq!(err.to_string(), "Unknown component: 'plan'");
    }

    #[test]
    fn test_artifact_error_path() {
        let err = ArtifactError::Remove {
            path: PathBuf::from("a.sas"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.path(), std::path::Path::new("a.sas"));
    }
}
