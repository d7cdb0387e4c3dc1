//! Pipeline execution.
//!
//! This module provides:
//! - The controller running stages in order
//! - The driver dispatching requests to it

mod controller;
mod dispatch;
#[cfg(test)]
mod integration_tests;

pub use controller::PipelineController;
pub use dispatch::{Driver, DriverBuilder, RequestOutcome, DRIVER_VERSION};
