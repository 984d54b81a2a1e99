//! Ordered, configurable rule collections.

use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::base::InferenceRule;
use super::defaults::{self, DEFAULT_RULE_NAMES};
use super::matcher::ColumnMatcherRule;
use crate::error::{ColsenseError, Result};

/// Tunable parameters for the built-in rule library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesetConfig {
    /// Max distinct/row ratio for the foreign identifier rule.
    pub foreign_identifier_ratio: f64,
    /// Max distinct/row ratio for the categorical dimension rule.
    pub categorical_ratio: f64,
    /// Column names treated as a primary time dimension.
    pub primary_time_pattern: String,
    /// Built-in rules to leave out, by name.
    pub disabled_rules: Vec<String>,
}

impl Default for RulesetConfig {
    fn default() -> Self {
        Self {
            foreign_identifier_ratio: defaults::DEFAULT_FOREIGN_IDENTIFIER_RATIO,
            categorical_ratio: defaults::DEFAULT_CATEGORICAL_RATIO,
            primary_time_pattern: defaults::DEFAULT_PRIMARY_TIME_PATTERN.to_string(),
            disabled_rules: Vec::new(),
        }
    }
}

impl RulesetConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ColsenseError::io(path, e))?;
        let config: RulesetConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check ratio bounds and disabled rule names.
    pub fn validate(&self) -> Result<()> {
        for (field, ratio) in [
            ("foreign_identifier_ratio", self.foreign_identifier_ratio),
            ("categorical_ratio", self.categorical_ratio),
        ] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(ColsenseError::Config(format!(
                    "{field} must be within [0, 1], got {ratio}"
                )));
            }
        }

        if let Some(unknown) = self
            .disabled_rules
            .iter()
            .find(|name| !DEFAULT_RULE_NAMES.contains(&name.as_str()))
        {
            return Err(ColsenseError::Config(format!("Unknown rule: {unknown}")));
        }

        Ok(())
    }
}

/// An ordered list of rules executed together over one context.
///
/// Rulesets are plain values: build one, adjust it, and hand it to the
/// [`InferenceRunner`](crate::runner::InferenceRunner).
#[derive(Debug)]
pub struct Ruleset {
    rules: Vec<Box<dyn InferenceRule>>,
}

impl Ruleset {
    /// A ruleset with no rules.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The 13 built-in rules with default parameters.
    pub fn default_rules() -> Self {
        Self::built_in(
            defaults::DEFAULT_FOREIGN_IDENTIFIER_RATIO,
            defaults::DEFAULT_CATEGORICAL_RATIO,
            defaults::primary_time_dimension_by_name(),
        )
    }

    /// The built-in rules, parameterized by `config`.
    pub fn from_config(config: &RulesetConfig) -> Result<Self> {
        config.validate()?;
        let pattern = Regex::new(&config.primary_time_pattern)?;

        let ruleset = Self::built_in(
            config.foreign_identifier_ratio,
            config.categorical_ratio,
            defaults::primary_time_dimension_by_pattern(pattern),
        );

        Ok(config
            .disabled_rules
            .iter()
            .fold(ruleset, |ruleset, name| ruleset.without_rule(name)))
    }

    fn built_in(
        foreign_identifier_ratio: f64,
        categorical_ratio: f64,
        primary_time_by_name: ColumnMatcherRule,
    ) -> Self {
        Self::empty()
            .with_rule(defaults::any_identifier_by_name())
            .with_rule(defaults::primary_identifier_by_name())
            .with_rule(defaults::unique_identifier_by_distinct_count())
            .with_rule(defaults::foreign_identifier_by_cardinality_ratio(
                foreign_identifier_ratio,
            ))
            .with_rule(defaults::time_dimension_by_time_type())
            .with_rule(primary_time_by_name)
            .with_rule(defaults::PrimaryTimeDimensionIfOnlyTimeRule)
            .with_rule(defaults::categorical_dimension_by_boolean_type())
            .with_rule(defaults::categorical_dimension_by_string_type())
            .with_rule(defaults::categorical_dimension_by_integer_type())
            .with_rule(defaults::categorical_dimension_by_cardinality_ratio(
                categorical_ratio,
            ))
            .with_rule(defaults::measure_by_real_type())
            .with_rule(defaults::measure_by_integer_type())
    }

    /// Append a rule.
    pub fn with_rule(mut self, rule: impl InferenceRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Drop every rule with the given name.
    pub fn without_rule(mut self, name: &str) -> Self {
        self.rules.retain(|rule| rule.name() != name);
        self
    }

    /// Rules in execution order.
    pub fn rules(&self) -> &[Box<dyn InferenceRule>] {
        &self.rules
    }

    /// Rule names in execution order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for Ruleset {
    fn default() -> Self {
        Self::default_rules()
    }
}
