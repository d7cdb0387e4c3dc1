//! Testing utilities for driver pipelines.
//!
//! This module provides scripted stage collaborators that stand in for the
//! external programs.

mod mocks;

pub use mocks::{ScriptedComponent, ScriptedStep};
