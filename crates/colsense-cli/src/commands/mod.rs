//! CLI command implementations.

pub mod infer;
pub mod rules;

use std::path::Path;

use colsense::RulesetConfig;

/// Load a ruleset configuration, or the defaults when no file is given.
pub(crate) fn load_ruleset_config(path: Option<&Path>) -> colsense::Result<RulesetConfig> {
    match path {
        Some(path) => RulesetConfig::from_file(path),
        None => Ok(RulesetConfig::default()),
    }
}
