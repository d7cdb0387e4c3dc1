//! Core domain model types for the plan driver.
//!
//! This module contains the fundamental types used throughout the crate:
//! - The recognized pipeline components and their canonical order
//! - Planner exit codes
//! - Stage and pipeline results

mod component;
pub mod exit_codes;
mod result;

pub use component::{resolve_components, Component, RUN_ALL_COMPONENTS};
pub use result::{PipelineResult, StageRecord, StageResult};
