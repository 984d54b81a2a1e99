//! Inference rules: the contract, reusable matchers and the built-in library.

mod base;
pub mod defaults;
mod matcher;
mod ruleset;

pub use base::{InferenceRule, RuleError, RuleEvaluation, RuleResult};
pub(crate) use base::panic_message;
pub use defaults::PrimaryTimeDimensionIfOnlyTimeRule;
pub use matcher::{ColumnMatcher, ColumnMatcherRule, LowCardinalityRatioRule, has_low_cardinality_ratio};
pub use ruleset::{Ruleset, RulesetConfig};
