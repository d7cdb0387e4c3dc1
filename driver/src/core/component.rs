//! Pipeline component names and stage-list resolution.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named processing step of the planner pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    /// Problem description to intermediate artifact.
    Translate,
    /// Intermediate artifact to plan.
    Search,
    /// Plan and problem to pass/fail.
    Validate,
}

/// Stage order used when a request asks for every stage.
pub const RUN_ALL_COMPONENTS: [Component; 2] = [Component::Translate, Component::Search];

impl Component {
    /// Returns the component name as used in requests and status output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Translate => "translate",
            Self::Search => "search",
            Self::Validate => "validate",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Component {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "translate" => Ok(Self::Translate),
            "search" => Ok(Self::Search),
            "validate" => Ok(Self::Validate),
            other => Err(ConfigError::UnknownComponent(other.to_string())),
        }
    }
}

/// Resolves the stage list of a request.
///
/// `run_all` always wins over an explicit list. Otherwise the names are
/// parsed in the order given; every name is checked before anything runs.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownComponent`] for an unrecognized name and
/// [`ConfigError::EmptyComponents`] when nothing would run.
pub fn resolve_components<S: AsRef<str>>(
    run_all: bool,
    components: &[S],
) -> Result<Vec<Component>, ConfigError> {
    if run_all {
        return Ok(RUN_ALL_COMPONENTS.to_vec());
    }

    let resolved = components
        .iter()
        .map(|name| name.as_ref().parse::<Component>())
        .collect::<Result<Vec<_>, _>>()?;

    if resolved.is_empty() {
        return Err(ConfigError::EmptyComponents);
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_round_trips_through_names() {
        for component in [Component::Translate, Component::Search, Component::Validate] {
            assert_eq!(component.as_str().parse::<Component>().unwrap(), component);
            assert_eq!(component.to_string(), component.as_str());
        }
    }

    #[test]
    fn test_run_all_ignores_explicit_components() {
        let resolved = resolve_components(true, &["validate", "bogus"]).unwrap();
        assert_eq!(resolved, vec![Component::Translate, Component::Search]);
    }

    #[test]
    fn test_explicit_order_is_preserved() {
        let resolved = resolve_components(false, &["validate", "translate"]).unwrap();
        assert_eq!(resolved, vec![Component::Validate, Component::Translate]);
    }

    #[test]
    fn test_unknown_component_is_rejected() {
        let err = resolve_components(false, &["translate", "plan"]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownComponent(ref name) if name == "plan"));
    }

    #[test]
    fn test_empty_components_are_rejected() {
        let err = resolve_components::<&str>(false, &[]).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyComponents));
    }

    #[test]
    fn test_component_serialize() {
        let json = serde_json::to_string(&Component::Search).unwrap();
        assert_eq!(json, r#""search""#);
    }
}
