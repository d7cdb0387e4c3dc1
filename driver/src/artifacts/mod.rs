//! Files handed between stages.
//!
//! This module provides:
//! - Disposal of the intermediate artifact after search
//! - Per-run ownership of artifact paths
//! - Plan file discovery and cleanup
//! - Removal of intermediate files the driver named itself

pub mod cleanup;
mod leases;
mod manager;
pub mod plans;
mod scratch;

pub use cleanup::{cleanup_temporary_files, CleanupReport};
pub use leases::{ArtifactLease, ArtifactLeases};
pub use manager::ArtifactManager;
pub use plans::PlanManager;
pub use scratch::ScratchArtifact;
