//! Planning requests and named configurations.

pub mod aliases;
mod planning;

pub use aliases::{AliasRegistry, AliasTarget};
pub use planning::{PlanningRequest, DEFAULT_PLAN_FILE, DEFAULT_SAS_FILE};
