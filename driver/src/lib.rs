//! # Plan Driver
//!
//! Orchestrates a three-stage automated-planning pipeline: translate a
//! problem description into an intermediate file, search it for plans and
//! validate the plans found.
//!
//! The driver provides:
//!
//! - **Ordered stage execution**: stages run one after another and a run
//!   stops early when a stage says so
//! - **Exit code relay**: the result of a run is the exit code of the last
//!   stage that actually ran
//! - **Artifact handling**: the intermediate file is removed after search
//!   unless the request keeps it
//! - **Two frontends**: a one-shot command line run and a TCP service
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use plan_driver::prelude::*;
//!
//! let config = DriverConfig::load(None)?;
//! let driver = Driver::from_config(&config, RunMode::OneShot);
//!
//! let request = PlanningRequest::run_all().with_inputs(["domain.pddl", "problem.pddl"]);
//! let code = run_once(&driver, request).await;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod artifacts;
pub mod config;
pub mod core;
pub mod errors;
pub mod events;
pub mod frontend;
pub mod observability;
pub mod pipeline;
pub mod request;
pub mod stages;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::artifacts::{ArtifactManager, CleanupReport, PlanManager};
    pub use crate::config::{ComponentPaths, DriverConfig, ServiceConfig, TelemetryConfig};
    pub use crate::core::{exit_codes, Component, PipelineResult, StageRecord, StageResult};
    pub use crate::errors::{ArtifactError, ConfigError, DriverError};
    pub use crate::events::{
        CollectingStatusSink, NoOpStatusSink, StatusLine, StatusSink, StdoutStatusSink,
        TracingStatusSink,
    };
    pub use crate::frontend::{run_once, ServiceFrontend, ServiceResponse};
    pub use crate::observability::init_tracing;
    pub use crate::pipeline::{Driver, DriverBuilder, PipelineController, RequestOutcome};
    pub use crate::request::{AliasRegistry, PlanningRequest};
    pub use crate::stages::{PlanValidator, RunMode, SearchEngine, StageRunner, Translator};
}
