//! Named search configurations.
//!
//! An alias either expands to a list of search options or names a portfolio
//! file that lives in the configured portfolio directory.

use super::PlanningRequest;
use crate::errors::ConfigError;
use std::collections::BTreeMap;
use std::path::Path;

/// What an alias expands to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasTarget {
    /// Plain search options.
    Search(&'static [&'static str]),
    /// A portfolio file name.
    Portfolio(&'static str),
}

const LAMA_FIRST: &[&str] = &[
    "--evaluator",
    "hlm=lmcount(lm_factory=lm_reasonable_orders_hps(lm_rhw()),transform=adapt_costs(one),pref=false)",
    "--evaluator",
    "hff=ff(transform=adapt_costs(one))",
    "--search",
    "lazy_greedy([hff,hlm],preferred=[hff,hlm],cost_type=one,reopen_closed=false)",
];

const SEQ_OPT_BJOLP: &[&str] = &[
    "--evaluator",
    "lmc=lmcount(lm_merged([lm_rhw(),lm_hm(m=1)]),admissible=true)",
    "--search",
    "astar(lmc,lazy_evaluator=lmc)",
];

const SEQ_OPT_LMCUT: &[&str] = &["--search", "astar(lmcut())"];

/// Registry of the known aliases.
#[derive(Debug, Clone)]
pub struct AliasRegistry {
    aliases: BTreeMap<&'static str, AliasTarget>,
}

impl Default for AliasRegistry {
    fn default() -> Self {
        let aliases = BTreeMap::from([
            ("lama-first", AliasTarget::Search(LAMA_FIRST)),
            ("seq-opt-bjolp", AliasTarget::Search(SEQ_OPT_BJOLP)),
            ("seq-opt-lmcut", AliasTarget::Search(SEQ_OPT_LMCUT)),
            ("seq-opt-fdss-1", AliasTarget::Portfolio("seq_opt_fdss_1.py")),
            ("seq-opt-fdss-2", AliasTarget::Portfolio("seq_opt_fdss_2.py")),
            ("seq-opt-merge-and-shrink", AliasTarget::Portfolio("seq_opt_merge_and_shrink.py")),
            ("seq-sat-fdss-1", AliasTarget::Portfolio("seq_sat_fdss_1.py")),
            ("seq-sat-fdss-2", AliasTarget::Portfolio("seq_sat_fdss_2.py")),
            ("seq-sat-lama-2011", AliasTarget::Portfolio("seq_sat_lama_2011.py")),
        ]);
        Self { aliases }
    }
}

impl AliasRegistry {
    /// Creates the registry of built-in aliases.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every alias name, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.aliases.keys().map(|name| (*name).to_string()).collect()
    }

    /// Looks up an alias.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<AliasTarget> {
        self.aliases.get(name).copied()
    }

    /// Expands `request.alias` into search options or a portfolio.
    ///
    /// Requests without an alias are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownAlias`] for an unregistered name and
    /// [`ConfigError::AliasConflict`] when the request already carries
    /// search options or a portfolio.
    pub fn apply(&self, request: &mut PlanningRequest, portfolio_dir: &Path) -> Result<(), ConfigError> {
        let Some(name) = request.alias.as_deref() else {
            return Ok(());
        };
        let target = self
            .get(name)
            .ok_or_else(|| ConfigError::UnknownAlias(name.to_string()))?;

        if !request.search_options.is_empty() || request.portfolio.is_some() {
            return Err(ConfigError::AliasConflict(name.to_string()));
        }

        match target {
            AliasTarget::Search(options) => {
                request.search_options = options.iter().map(|s| (*s).to_string()).collect();
            }
            AliasTarget::Portfolio(file) => {
                request.portfolio = Some(portfolio_dir.join(file));
            }
        }
        request.alias = None;
        Ok(())
    }
}
