//! A single piece of evidence about a column.

use serde::{Deserialize, Serialize};

use super::types::{InferenceSignalConfidence, InferenceSignalType};
use crate::context::ColumnReference;

/// One rule's claim about one column.
///
/// `is_complimentary` marks supporting evidence: a complimentary signal can
/// reinforce or refine a type but never decides a column's role on its own
/// when definitive evidence exists. For example, unique values are consistent
/// with both a unique identifier and a categorical dimension, so a uniqueness
/// rule emits a complimentary `ID.UNIQUE` that only deepens an `ID` decision
/// that other rules already support.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceSignal {
    pub column: ColumnReference,
    pub type_node: InferenceSignalType,
    pub confidence: InferenceSignalConfidence,
    pub is_complimentary: bool,
    /// Human-readable justification. May reach the user.
    pub reason: String,
}

impl InferenceSignal {
    /// Create a signal.
    pub fn new(
        column: ColumnReference,
        type_node: InferenceSignalType,
        confidence: InferenceSignalConfidence,
        is_complimentary: bool,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            column,
            type_node,
            confidence,
            is_complimentary,
            reason: reason.into(),
        }
    }

    /// Whether this signal can decide a column's type on its own.
    pub fn is_definitive(&self) -> bool {
        !self.is_complimentary
    }

    /// Whether this signal's type is incompatible with another's.
    pub fn conflicts_with(&self, other: &InferenceSignal) -> bool {
        InferenceSignalType::conflict(self.type_node, other.type_node)
    }
}
