//! Semantic type taxonomy, conflict relation and confidence tiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level semantic role of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalCategory {
    /// Identifier (primary, unique, foreign or generic key).
    Id,
    /// Dimension (time or categorical attribute).
    Dimension,
    /// Measure (aggregatable value).
    Measure,
}

impl SignalCategory {
    /// The generic member of this category.
    pub fn generic(self) -> InferenceSignalType {
        match self {
            SignalCategory::Id => InferenceSignalType::IdUnknown,
            SignalCategory::Dimension => InferenceSignalType::DimensionUnknown,
            SignalCategory::Measure => InferenceSignalType::MeasureUnknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SignalCategory::Id => "ID",
            SignalCategory::Dimension => "DIMENSION",
            SignalCategory::Measure => "MEASURE",
        }
    }
}

/// A node in the closed semantic type hierarchy.
///
/// Each category has a generic member (`*Unknown`) that every other member of
/// the category refines, directly or through an intermediate node:
///
/// ```text
/// ID.UNKNOWN ─┬─ ID.FOREIGN
///             └─ ID.UNIQUE ── ID.PRIMARY
/// DIMENSION.UNKNOWN ─┬─ DIMENSION.TIME ── DIMENSION.PRIMARY_TIME
///                    └─ DIMENSION.CATEGORICAL
/// MEASURE.UNKNOWN
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InferenceSignalType {
    #[serde(rename = "ID.UNKNOWN")]
    IdUnknown,
    #[serde(rename = "ID.FOREIGN")]
    IdForeign,
    #[serde(rename = "ID.UNIQUE")]
    IdUnique,
    #[serde(rename = "ID.PRIMARY")]
    IdPrimary,
    #[serde(rename = "DIMENSION.UNKNOWN")]
    DimensionUnknown,
    #[serde(rename = "DIMENSION.TIME")]
    DimensionTime,
    #[serde(rename = "DIMENSION.PRIMARY_TIME")]
    DimensionPrimaryTime,
    #[serde(rename = "DIMENSION.CATEGORICAL")]
    DimensionCategorical,
    #[serde(rename = "MEASURE.UNKNOWN")]
    MeasureUnknown,
}

impl InferenceSignalType {
    /// Every member of the hierarchy, in declaration order.
    pub const ALL: [InferenceSignalType; 9] = [
        InferenceSignalType::IdUnknown,
        InferenceSignalType::IdForeign,
        InferenceSignalType::IdUnique,
        InferenceSignalType::IdPrimary,
        InferenceSignalType::DimensionUnknown,
        InferenceSignalType::DimensionTime,
        InferenceSignalType::DimensionPrimaryTime,
        InferenceSignalType::DimensionCategorical,
        InferenceSignalType::MeasureUnknown,
    ];

    /// The category this type belongs to.
    pub fn category(self) -> SignalCategory {
        match self {
            InferenceSignalType::IdUnknown
            | InferenceSignalType::IdForeign
            | InferenceSignalType::IdUnique
            | InferenceSignalType::IdPrimary => SignalCategory::Id,
            InferenceSignalType::DimensionUnknown
            | InferenceSignalType::DimensionTime
            | InferenceSignalType::DimensionPrimaryTime
            | InferenceSignalType::DimensionCategorical => SignalCategory::Dimension,
            InferenceSignalType::MeasureUnknown => SignalCategory::Measure,
        }
    }

    /// The node this type directly refines. Generic members have no parent.
    pub fn parent(self) -> Option<InferenceSignalType> {
        match self {
            InferenceSignalType::IdUnknown => None,
            InferenceSignalType::IdForeign => Some(InferenceSignalType::IdUnknown),
            InferenceSignalType::IdUnique => Some(InferenceSignalType::IdUnknown),
            InferenceSignalType::IdPrimary => Some(InferenceSignalType::IdUnique),
            InferenceSignalType::DimensionUnknown => None,
            InferenceSignalType::DimensionTime => Some(InferenceSignalType::DimensionUnknown),
            InferenceSignalType::DimensionPrimaryTime => Some(InferenceSignalType::DimensionTime),
            InferenceSignalType::DimensionCategorical => {
                Some(InferenceSignalType::DimensionUnknown)
            }
            InferenceSignalType::MeasureUnknown => None,
        }
    }

    /// Ancestors from the generic member down to the direct parent.
    pub fn ancestors(self) -> Vec<InferenceSignalType> {
        let mut chain = Vec::new();
        let mut node = self.parent();
        while let Some(parent) = node {
            chain.push(parent);
            node = parent.parent();
        }
        chain.reverse();
        chain
    }

    /// Distance from the category's generic member. Higher is more specific.
    pub fn depth(self) -> usize {
        self.ancestors().len()
    }

    /// Whether `self` strictly refines `other`.
    pub fn is_descendant_of(self, other: InferenceSignalType) -> bool {
        self.ancestors().contains(&other)
    }

    /// Whether `self` is `other` or refines it.
    pub fn refines(self, other: InferenceSignalType) -> bool {
        self == other || self.is_descendant_of(other)
    }

    /// Whether a column cannot be both `a` and `b` at once.
    ///
    /// Two types are compatible only when one refines the other. Siblings and
    /// types from different categories conflict. The relation is symmetric and
    /// irreflexive.
    pub fn conflict(a: InferenceSignalType, b: InferenceSignalType) -> bool {
        !(a.refines(b) || b.refines(a))
    }

    /// Dotted display name, e.g. `ID.PRIMARY`.
    pub fn name(&self) -> &'static str {
        match self {
            InferenceSignalType::IdUnknown => "ID.UNKNOWN",
            InferenceSignalType::IdForeign => "ID.FOREIGN",
            InferenceSignalType::IdUnique => "ID.UNIQUE",
            InferenceSignalType::IdPrimary => "ID.PRIMARY",
            InferenceSignalType::DimensionUnknown => "DIMENSION.UNKNOWN",
            InferenceSignalType::DimensionTime => "DIMENSION.TIME",
            InferenceSignalType::DimensionPrimaryTime => "DIMENSION.PRIMARY_TIME",
            InferenceSignalType::DimensionCategorical => "DIMENSION.CATEGORICAL",
            InferenceSignalType::MeasureUnknown => "MEASURE.UNKNOWN",
        }
    }
}

impl fmt::Display for InferenceSignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Discrete confidence tiers for a signal.
///
/// Tiers are discrete so that every rule means the same thing by "medium".
/// Only used to rank conflicting evidence, never to add it up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InferenceSignalConfidence {
    Low,
    Medium,
    High,
    ForSure,
}

impl InferenceSignalConfidence {
    pub fn label(&self) -> &'static str {
        match self {
            InferenceSignalConfidence::Low => "low",
            InferenceSignalConfidence::Medium => "medium",
            InferenceSignalConfidence::High => "high",
            InferenceSignalConfidence::ForSure => "for sure",
        }
    }
}
