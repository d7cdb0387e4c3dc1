//! The unit of work submitted to the driver.

use crate::core::{resolve_components, Component};
use crate::errors::{ConfigError, DriverError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default path of the intermediate artifact.
pub const DEFAULT_SAS_FILE: &str = "output.sas";

/// Default prefix of the plan files written by search.
pub const DEFAULT_PLAN_FILE: &str = "sas_plan";

/// A fully resolved planning request.
///
/// Every option has a defined default, so a request decoded from a partial
/// JSON object is always complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningRequest {
    /// Run the canonical stage order, ignoring `components`.
    pub run_all: bool,
    /// Stage names to run, in order.
    pub components: Vec<String>,
    /// Report the driver version and stop.
    pub version: bool,
    /// List the known configuration aliases and stop.
    pub show_aliases: bool,
    /// Remove stale temporary files and stop.
    pub cleanup: bool,
    /// Keep the intermediate artifact after search consumed it.
    pub keep_sas_file: bool,
    /// Path of the intermediate artifact.
    pub sas_file: Option<PathBuf>,
    /// Prefix of the plan files.
    pub plan_file: PathBuf,
    /// Problem inputs: a task file, or a domain followed by a problem.
    pub inputs: Vec<PathBuf>,
    /// Named search configuration.
    pub alias: Option<String>,
    /// Extra arguments for the translator.
    pub translate_options: Vec<String>,
    /// Arguments for the search engine.
    pub search_options: Vec<String>,
    /// Extra arguments for the validator.
    pub validate_options: Vec<String>,
    /// Portfolio file driving the search engine.
    pub portfolio: Option<PathBuf>,
    /// Cost bound for portfolio search.
    pub portfolio_bound: Option<i64>,
    /// Stop the portfolio after the first plan.
    pub portfolio_single_plan: bool,
}

impl Default for PlanningRequest {
    fn default() -> Self {
        Self {
            run_all: false,
            components: Vec::new(),
            version: false,
            show_aliases: false,
            cleanup: false,
            keep_sas_file: false,
            sas_file: None,
            plan_file: PathBuf::from(DEFAULT_PLAN_FILE),
            inputs: Vec::new(),
            alias: None,
            translate_options: Vec::new(),
            search_options: Vec::new(),
            validate_options: Vec::new(),
            portfolio: None,
            portfolio_bound: None,
            portfolio_single_plan: false,
        }
    }
}

impl PlanningRequest {
    /// Creates an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a request running the canonical stage order.
    #[must_use]
    pub fn run_all() -> Self {
        Self {
            run_all: true,
            ..Self::default()
        }
    }

    /// Sets the explicit component list.
    #[must_use]
    pub fn with_components(mut self, components: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.components = components.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the problem inputs.
    #[must_use]
    pub fn with_inputs(mut self, inputs: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the intermediate artifact path.
    #[must_use]
    pub fn with_sas_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sas_file = Some(path.into());
        self
    }

    /// Sets the plan file prefix.
    #[must_use]
    pub fn with_plan_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.plan_file = path.into();
        self
    }

    /// Keeps the intermediate artifact after search.
    #[must_use]
    pub const fn keeping_sas_file(mut self) -> Self {
        self.keep_sas_file = true;
        self
    }

    /// Sets the search options.
    #[must_use]
    pub fn with_search_options(mut self, options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.search_options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the portfolio file.
    #[must_use]
    pub fn with_portfolio(mut self, portfolio: impl Into<PathBuf>) -> Self {
        self.portfolio = Some(portfolio.into());
        self
    }

    /// Sets the alias.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Decodes a request from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRequest`] if the JSON does not describe a request.
    pub fn from_json(raw: &str) -> Result<Self, DriverError> {
        serde_json::from_str(raw).map_err(|e| ConfigError::InvalidRequest(e.to_string()).into())
    }

    /// Returns the path of the intermediate artifact.
    #[must_use]
    pub fn artifact_path(&self) -> &Path {
        self.sas_file
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_SAS_FILE))
    }

    /// Resolves the stage list of this request.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unknown names or an empty list.
    pub fn stages(&self) -> Result<Vec<Component>, ConfigError> {
        resolve_components(self.run_all, &self.components)
    }

    /// Returns true if the request is one of the short-circuit requests.
    #[must_use]
    pub const fn is_short_circuit(&self) -> bool {
        self.version || self.show_aliases || self.cleanup
    }

    /// Returns true if any portfolio option is set.
    #[must_use]
    pub const fn uses_portfolio(&self) -> bool {
        self.portfolio.is_some() || self.portfolio_bound.is_some() || self.portfolio_single_plan
    }

    /// Returns a copy with every portfolio option cleared.
    #[must_use]
    pub fn without_portfolio(&self) -> Self {
        Self {
            portfolio: None,
            portfolio_bound: None,
            portfolio_single_plan: false,
            ..self.clone()
        }
    }
}
