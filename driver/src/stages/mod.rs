//! Stage collaborators and the runner dispatching to them.
//!
//! The driver never translates, searches or validates by itself. Each of
//! these jobs is delegated to a collaborator implementing one of the traits
//! below; the default implementations run external programs.

pub mod process;
mod runner;

pub use process::{ProcessComponents, ProcessSearchEngine, ProcessTranslator, ProcessValidator};
pub use runner::{RunMode, StageRunner};

use crate::core::StageResult;
use crate::errors::DriverError;
use crate::request::PlanningRequest;
use async_trait::async_trait;

/// Turns the problem description into the intermediate artifact.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Translator: Send + Sync {
    /// Runs the translation for `request`.
    async fn translate(&self, request: &PlanningRequest) -> Result<StageResult, DriverError>;
}

/// Turns the intermediate artifact into plans.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Runs the search for `request`, honoring its portfolio options.
    async fn search(&self, request: &PlanningRequest) -> Result<StageResult, DriverError>;
}

/// Checks the plans against the problem.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlanValidator: Send + Sync {
    /// Validates the plans of `request`.
    async fn validate(&self, request: &PlanningRequest) -> Result<StageResult, DriverError>;
}
