//! Final per-column decisions.

use serde::{Deserialize, Serialize};

use crate::context::ColumnReference;
use crate::signal::{InferenceSignal, InferenceSignalConfidence, InferenceSignalType};

/// Why a column could not be given a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// No rule produced a signal for the column.
    NoSignals,
    /// Only complimentary evidence exists, and it is contradictory.
    ConflictingComplementary,
    /// The most confident definitive signals contradict each other.
    TiedDefinitive,
}

impl UnresolvedReason {
    pub fn label(&self) -> &'static str {
        match self {
            UnresolvedReason::NoSignals => "no signals",
            UnresolvedReason::ConflictingComplementary => "conflicting hints",
            UnresolvedReason::TiedDefinitive => "tied evidence",
        }
    }
}

/// Outcome of resolving one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Resolution {
    Resolved(InferenceSignalType),
    Unresolved(UnresolvedReason),
}

impl Resolution {
    /// The resolved type, if any.
    pub fn type_node(&self) -> Option<InferenceSignalType> {
        match self {
            Resolution::Resolved(type_node) => Some(*type_node),
            Resolution::Unresolved(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}

/// The resolver's verdict on one column, with its full evidence trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDecision {
    pub column: ColumnReference,
    pub resolution: Resolution,
    /// Confidence of the signal that supplied the resolved type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<InferenceSignalConfidence>,
    /// Justifications of the signals supporting the outcome.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
    /// Evidence that was overruled, ignored or contradictory.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub problems: Vec<String>,
    /// Every signal emitted for the column, in emission order.
    #[serde(default)]
    pub signals: Vec<InferenceSignal>,
}

impl ColumnDecision {
    /// An unresolved decision carrying the given evidence.
    pub fn unresolved(
        column: ColumnReference,
        reason: UnresolvedReason,
        signals: Vec<InferenceSignal>,
    ) -> Self {
        Self {
            column,
            resolution: Resolution::Unresolved(reason),
            confidence: None,
            reasons: Vec::new(),
            problems: Vec::new(),
            signals,
        }
    }

    /// The resolved type, if any.
    pub fn type_node(&self) -> Option<InferenceSignalType> {
        self.resolution.type_node()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution.is_resolved()
    }

    /// Whether a human should look at this column before trusting it.
    ///
    /// True for unresolved columns and for decisions below `HIGH` confidence.
    pub fn needs_review(&self) -> bool {
        !self.is_resolved()
            || self
                .confidence
                .is_none_or(|confidence| confidence < InferenceSignalConfidence::High)
    }
}
