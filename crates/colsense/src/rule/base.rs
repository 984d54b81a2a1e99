//! The rule contract.

use std::any::Any;
use std::fmt::Debug;

use thiserror::Error;

use crate::context::{ColumnReference, DataWarehouseInferenceContext};
use crate::signal::InferenceSignal;

/// Result type for rule evaluation.
pub type RuleResult<T> = std::result::Result<T, RuleError>;

/// A failure inside a rule, optionally naming the column being processed.
///
/// Built-in rules never fail. Custom rules report problems through this type
/// so the runner can attribute them and keep going.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct RuleError {
    pub column: Option<ColumnReference>,
    pub message: String,
}

impl RuleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            column: None,
            message: message.into(),
        }
    }

    pub fn for_column(column: ColumnReference, message: impl Into<String>) -> Self {
        Self {
            column: Some(column),
            message: message.into(),
        }
    }
}

/// What one rule produced: its signals plus any per-column failures.
///
/// A failure on one column does not discard signals produced for the others.
#[derive(Debug, Clone, Default)]
pub struct RuleEvaluation {
    pub signals: Vec<InferenceSignal>,
    pub errors: Vec<RuleError>,
}

impl From<RuleResult<Vec<InferenceSignal>>> for RuleEvaluation {
    fn from(result: RuleResult<Vec<InferenceSignal>>) -> Self {
        match result {
            Ok(signals) => Self {
                signals,
                errors: Vec::new(),
            },
            Err(err) => Self {
                signals: Vec::new(),
                errors: vec![err],
            },
        }
    }
}

/// A heuristic that produces signals about columns.
///
/// A rule reads the context and emits zero or more [`InferenceSignal`]s about
/// whatever columns it matches. It must be deterministic for a given context
/// and must not mutate anything. Missing statistics are a non-match, not an
/// error.
///
/// Prefer composing many small rules that each produce one signal type over
/// one large rule with branching logic. Rules whose decision depends only on
/// one column's own properties are best built with
/// [`ColumnMatcherRule`](super::ColumnMatcherRule).
pub trait InferenceRule: Send + Sync + Debug {
    /// Stable identifier used in logs, failure reports and configuration.
    fn name(&self) -> &str;

    /// Evaluate the rule over the whole context.
    fn process(&self, context: &DataWarehouseInferenceContext) -> RuleResult<Vec<InferenceSignal>>;

    /// Evaluate the rule, keeping partial results.
    ///
    /// The runner calls this. Rules that can fail per column override it to
    /// report each failing column and keep the signals for the rest.
    fn evaluate(&self, context: &DataWarehouseInferenceContext) -> RuleEvaluation {
        self.process(context).into()
    }
}

/// Text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
