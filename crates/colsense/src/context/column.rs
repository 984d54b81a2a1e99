//! Column identity and per-column statistics.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ColsenseError, Result};

/// Identity of a column in the warehouse.
///
/// Both names are case-preserved and compared case-sensitively. Rules that
/// want case-insensitive matching normalize locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnReference {
    pub table_name: String,
    pub column_name: String,
}

impl ColumnReference {
    /// Create a reference to `table_name.column_name`.
    pub fn new(table_name: impl Into<String>, column_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            column_name: column_name.into(),
        }
    }
}

impl fmt::Display for ColumnReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table_name, self.column_name)
    }
}

/// Declared warehouse type of a column, collapsed to the families the rules care about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Whole numbers.
    Integer,
    /// Real numbers (float, double, numeric).
    Float,
    /// Text values.
    String,
    /// Boolean values.
    Boolean,
    /// Date, time, datetime or timestamp values.
    DateTime,
    /// Anything the profiler could not map.
    #[default]
    Unknown,
}

impl ColumnType {
    /// Map a warehouse type name onto a column type family.
    ///
    /// Matching is case-insensitive and ignores any parameter list, so
    /// `VARCHAR(255)` and `numeric(10, 2)` are recognized.
    pub fn from_sql_type(name: &str) -> Self {
        let base = name
            .split('(')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        match base.as_str() {
            "integer" | "int" | "bigint" | "smallint" | "tinyint" | "int64" => ColumnType::Integer,
            "float" | "float64" | "double" | "double precision" | "real" | "numeric"
            | "decimal" => ColumnType::Float,
            "string" | "varchar" | "text" | "char" | "character varying" => ColumnType::String,
            "boolean" | "bool" => ColumnType::Boolean,
            "datetime" | "timestamp" | "timestamp_ntz" | "timestamp_tz" | "date" | "time" => {
                ColumnType::DateTime
            }
            _ => ColumnType::Unknown,
        }
    }
}

/// Facts about one column, as collected by the warehouse profiler.
///
/// Either count may be absent when statistics collection was skipped or
/// failed. Rules that depend on an absent count must not match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProperties {
    pub column: ColumnReference,
    /// Declared type family.
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Rows in the owning table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,
    /// Distinct non-null values observed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distinct_row_count: Option<u64>,
}

impl ColumnProperties {
    /// Create properties with no statistics.
    pub fn new(column: ColumnReference, column_type: ColumnType) -> Self {
        Self {
            column,
            column_type,
            row_count: None,
            distinct_row_count: None,
        }
    }

    /// Set both row counts.
    pub fn with_counts(mut self, row_count: u64, distinct_row_count: u64) -> Self {
        self.row_count = Some(row_count);
        self.distinct_row_count = Some(distinct_row_count);
        self
    }

    /// Set the table row count only.
    pub fn with_row_count(mut self, row_count: u64) -> Self {
        self.row_count = Some(row_count);
        self
    }

    /// Ratio of distinct values to rows.
    ///
    /// `None` unless both counts are present and the table is non-empty.
    pub fn cardinality_ratio(&self) -> Option<f64> {
        match (self.distinct_row_count, self.row_count) {
            (Some(distinct), Some(rows)) if rows > 0 => Some(distinct as f64 / rows as f64),
            _ => None,
        }
    }

    /// Whether every row holds a distinct value.
    ///
    /// Requires both counts and a non-empty table.
    pub fn all_values_distinct(&self) -> bool {
        matches!(
            (self.distinct_row_count, self.row_count),
            (Some(distinct), Some(rows)) if rows > 0 && distinct == rows
        )
    }

    /// Check the `distinct_row_count <= row_count` invariant.
    pub fn validate(&self) -> Result<()> {
        if let (Some(distinct), Some(rows)) = (self.distinct_row_count, self.row_count) {
            if distinct > rows {
                return Err(ColsenseError::invalid_statistics(
                    &self.column,
                    format!("distinct_row_count ({distinct}) exceeds row_count ({rows})"),
                ));
            }
        }
        Ok(())
    }
}
