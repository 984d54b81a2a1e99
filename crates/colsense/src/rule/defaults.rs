//! The built-in rule library.
//!
//! Rules combine structural evidence (column name, declared type) with
//! statistical evidence (distinct-to-row ratio). Name and type matches are
//! `FOR_SURE`; statistical and broad type hints are `MEDIUM` and
//! complimentary, so they only ever support or refine a decision.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::base::{InferenceRule, RuleResult};
use super::matcher::{ColumnMatcherRule, LowCardinalityRatioRule};
use crate::context::{ColumnReference, ColumnType, DataWarehouseInferenceContext};
use crate::signal::{InferenceSignal, InferenceSignalConfidence, InferenceSignalType};

pub const ANY_IDENTIFIER_BY_NAME: &str = "any-identifier-by-name";
pub const PRIMARY_IDENTIFIER_BY_NAME: &str = "primary-identifier-by-name";
pub const UNIQUE_IDENTIFIER_BY_DISTINCT_COUNT: &str = "unique-identifier-by-distinct-count";
pub const FOREIGN_IDENTIFIER_BY_CARDINALITY_RATIO: &str = "foreign-identifier-by-cardinality-ratio";
pub const TIME_DIMENSION_BY_TIME_TYPE: &str = "time-dimension-by-time-type";
pub const PRIMARY_TIME_DIMENSION_BY_NAME: &str = "primary-time-dimension-by-name";
pub const PRIMARY_TIME_DIMENSION_IF_ONLY_TIME: &str = "primary-time-dimension-if-only-time";
pub const CATEGORICAL_DIMENSION_BY_BOOLEAN_TYPE: &str = "categorical-dimension-by-boolean-type";
pub const CATEGORICAL_DIMENSION_BY_STRING_TYPE: &str = "categorical-dimension-by-string-type";
pub const CATEGORICAL_DIMENSION_BY_INTEGER_TYPE: &str = "categorical-dimension-by-integer-type";
pub const CATEGORICAL_DIMENSION_BY_CARDINALITY_RATIO: &str =
    "categorical-dimension-by-cardinality-ratio";
pub const MEASURE_BY_REAL_TYPE: &str = "measure-by-real-type";
pub const MEASURE_BY_INTEGER_TYPE: &str = "measure-by-integer-type";

/// Names of the built-in rules, in default ruleset order.
pub const DEFAULT_RULE_NAMES: [&str; 13] = [
    ANY_IDENTIFIER_BY_NAME,
    PRIMARY_IDENTIFIER_BY_NAME,
    UNIQUE_IDENTIFIER_BY_DISTINCT_COUNT,
    FOREIGN_IDENTIFIER_BY_CARDINALITY_RATIO,
    TIME_DIMENSION_BY_TIME_TYPE,
    PRIMARY_TIME_DIMENSION_BY_NAME,
    PRIMARY_TIME_DIMENSION_IF_ONLY_TIME,
    CATEGORICAL_DIMENSION_BY_BOOLEAN_TYPE,
    CATEGORICAL_DIMENSION_BY_STRING_TYPE,
    CATEGORICAL_DIMENSION_BY_INTEGER_TYPE,
    CATEGORICAL_DIMENSION_BY_CARDINALITY_RATIO,
    MEASURE_BY_REAL_TYPE,
    MEASURE_BY_INTEGER_TYPE,
];

pub const DEFAULT_FOREIGN_IDENTIFIER_RATIO: f64 = 0.4;
pub const DEFAULT_CATEGORICAL_RATIO: f64 = 0.2;
pub const DEFAULT_PRIMARY_TIME_PATTERN: &str = r"(?i)^(ds|created_at|created_date|created_time)$";

// Also matches "userid" without an underscore.
static ANY_IDENTIFIER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)id$").unwrap());

static PRIMARY_TIME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_PRIMARY_TIME_PATTERN).unwrap());

// =============================================================================
// MATCHERS
// =============================================================================

/// Column name ends with `id`, in any case.
pub fn is_any_identifier_name(column: &ColumnReference) -> bool {
    ANY_IDENTIFIER_PATTERN.is_match(&column.column_name)
}

/// Column name is `id`, `<table>_id` or `<table>id`.
///
/// Case-insensitive. The table name is tried as written and with one
/// trailing `s` removed, so both `orders.order_id` and `orders.orders_id`
/// match.
pub fn is_primary_identifier_name(column: &ColumnReference) -> bool {
    let col_lower = column.column_name.to_lowercase();
    if col_lower == "id" {
        return true;
    }

    let table_lower = column.table_name.to_lowercase();
    let singular = table_lower.strip_suffix('s').unwrap_or(&table_lower);

    [table_lower.as_str(), singular].iter().any(|table| {
        !table.is_empty() && (col_lower == format!("{table}_id") || col_lower == format!("{table}id"))
    })
}

// =============================================================================
// IDENTIFIERS
// =============================================================================

pub fn any_identifier_by_name() -> ColumnMatcherRule {
    ColumnMatcherRule::new(
        ANY_IDENTIFIER_BY_NAME,
        InferenceSignalType::IdUnknown,
        InferenceSignalConfidence::ForSure,
        "Column name ends with `id`",
        |props| is_any_identifier_name(&props.column),
    )
}

pub fn primary_identifier_by_name() -> ColumnMatcherRule {
    ColumnMatcherRule::new(
        PRIMARY_IDENTIFIER_BY_NAME,
        InferenceSignalType::IdPrimary,
        InferenceSignalConfidence::ForSure,
        "Column name matches `(table_name?)(_?)id`",
        |props| is_primary_identifier_name(&props.column),
    )
}

pub fn unique_identifier_by_distinct_count() -> ColumnMatcherRule {
    ColumnMatcherRule::new(
        UNIQUE_IDENTIFIER_BY_DISTINCT_COUNT,
        InferenceSignalType::IdUnique,
        InferenceSignalConfidence::ForSure,
        "The values in the column are unique",
        |props| props.all_values_distinct(),
    )
    .complimentary()
}

pub fn foreign_identifier_by_cardinality_ratio(threshold: f64) -> LowCardinalityRatioRule {
    LowCardinalityRatioRule::new(
        FOREIGN_IDENTIFIER_BY_CARDINALITY_RATIO,
        threshold,
        InferenceSignalType::IdForeign,
        InferenceSignalConfidence::Medium,
    )
    .complimentary()
}

// =============================================================================
// DIMENSIONS
// =============================================================================

pub fn time_dimension_by_time_type() -> ColumnMatcherRule {
    ColumnMatcherRule::new(
        TIME_DIMENSION_BY_TIME_TYPE,
        InferenceSignalType::DimensionTime,
        InferenceSignalConfidence::ForSure,
        "Column type is time (TIME, DATE, DATETIME, TIMESTAMP)",
        |props| props.column_type == ColumnType::DateTime,
    )
}

/// Primary time dimension by the default name list (`ds`, `created_at`, ...).
pub fn primary_time_dimension_by_name() -> ColumnMatcherRule {
    primary_time_dimension_by_pattern(PRIMARY_TIME_PATTERN.clone())
}

/// Primary time dimension for column names matching `pattern`.
pub fn primary_time_dimension_by_pattern(pattern: Regex) -> ColumnMatcherRule {
    let reason = format!("Column name matches `{}`", pattern.as_str());
    ColumnMatcherRule::new(
        PRIMARY_TIME_DIMENSION_BY_NAME,
        InferenceSignalType::DimensionPrimaryTime,
        InferenceSignalConfidence::ForSure,
        reason,
        move |props| pattern.is_match(&props.column.column_name),
    )
}

/// Marks the only time column of a table as its primary time dimension.
///
/// Tables with zero or several time columns produce nothing.
#[derive(Debug, Default)]
pub struct PrimaryTimeDimensionIfOnlyTimeRule;

impl InferenceRule for PrimaryTimeDimensionIfOnlyTimeRule {
    fn name(&self) -> &str {
        PRIMARY_TIME_DIMENSION_IF_ONLY_TIME
    }

    fn process(&self, context: &DataWarehouseInferenceContext) -> RuleResult<Vec<InferenceSignal>> {
        let mut signals = Vec::new();

        for table in context.tables().values() {
            let time_columns: Vec<_> = table.columns_of_type(ColumnType::DateTime).collect();

            match time_columns.as_slice() {
                [only] => signals.push(InferenceSignal::new(
                    only.column.clone(),
                    InferenceSignalType::DimensionPrimaryTime,
                    InferenceSignalConfidence::ForSure,
                    false,
                    "The column is the only time column in its table",
                )),
                [] => {}
                several => debug!(
                    table = %table.name,
                    count = several.len(),
                    "Skipping table with several time columns"
                ),
            }
        }

        Ok(signals)
    }
}

pub fn categorical_dimension_by_boolean_type() -> ColumnMatcherRule {
    ColumnMatcherRule::new(
        CATEGORICAL_DIMENSION_BY_BOOLEAN_TYPE,
        InferenceSignalType::DimensionCategorical,
        InferenceSignalConfidence::ForSure,
        "Column type is BOOLEAN",
        |props| props.column_type == ColumnType::Boolean,
    )
}

pub fn categorical_dimension_by_string_type() -> ColumnMatcherRule {
    ColumnMatcherRule::new(
        CATEGORICAL_DIMENSION_BY_STRING_TYPE,
        InferenceSignalType::DimensionCategorical,
        InferenceSignalConfidence::Medium,
        "Column type is STRING",
        |props| props.column_type == ColumnType::String,
    )
    .complimentary()
}

pub fn categorical_dimension_by_integer_type() -> ColumnMatcherRule {
    ColumnMatcherRule::new(
        CATEGORICAL_DIMENSION_BY_INTEGER_TYPE,
        InferenceSignalType::DimensionCategorical,
        InferenceSignalConfidence::Medium,
        "Column type is INTEGER",
        |props| props.column_type == ColumnType::Integer,
    )
    .complimentary()
}

pub fn categorical_dimension_by_cardinality_ratio(threshold: f64) -> LowCardinalityRatioRule {
    LowCardinalityRatioRule::new(
        CATEGORICAL_DIMENSION_BY_CARDINALITY_RATIO,
        threshold,
        InferenceSignalType::DimensionCategorical,
        InferenceSignalConfidence::Medium,
    )
    .complimentary()
}

// =============================================================================
// MEASURES
// =============================================================================

pub fn measure_by_real_type() -> ColumnMatcherRule {
    ColumnMatcherRule::new(
        MEASURE_BY_REAL_TYPE,
        InferenceSignalType::MeasureUnknown,
        InferenceSignalConfidence::ForSure,
        "Column type is real (FLOAT, DOUBLE, DOUBLE PRECISION)",
        |props| props.column_type == ColumnType::Float,
    )
}

pub fn measure_by_integer_type() -> ColumnMatcherRule {
    ColumnMatcherRule::new(
        MEASURE_BY_INTEGER_TYPE,
        InferenceSignalType::MeasureUnknown,
        InferenceSignalConfidence::Medium,
        "Column type is INTEGER",
        |props| props.column_type == ColumnType::Integer,
    )
    .complimentary()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ColumnProperties, TableProperties};

    fn col(table: &str, column: &str) -> ColumnReference {
        ColumnReference::new(table, column)
    }

    fn props(column_type: ColumnType) -> ColumnProperties {
        ColumnProperties::new(col("t", "c"), column_type)
    }

    #[test]
    fn test_any_identifier_matcher() {
        assert!(is_any_identifier_name(&col("table", "id")));
        assert!(is_any_identifier_name(&col("table", "tableid")));
        assert!(is_any_identifier_name(&col("table", "table_id")));
        assert!(is_any_identifier_name(&col("table", "othertable_id")));
        assert!(is_any_identifier_name(&col("table", "USER_ID")));
        assert!(!is_any_identifier_name(&col("table", "whatever")));
        assert!(!is_any_identifier_name(&col("table", "validity")));
    }

    #[test]
    fn test_primary_identifier_matcher() {
        assert!(is_primary_identifier_name(&col("table", "id")));
        assert!(is_primary_identifier_name(&col("table", "tableid")));
        assert!(is_primary_identifier_name(&col("table", "table_id")));
        assert!(is_primary_identifier_name(&col("orders", "order_id")));
        assert!(is_primary_identifier_name(&col("orders", "orderid")));
        assert!(is_primary_identifier_name(&col("Orders", "ORDER_ID")));
        assert!(is_primary_identifier_name(&col("orders", "orders_id")));
        assert!(is_primary_identifier_name(&col("address", "address_id")));
        assert!(!is_primary_identifier_name(&col("address", "addre_id")));
        assert!(!is_primary_identifier_name(&col("table", "othertable_id")));
        assert!(!is_primary_identifier_name(&col("table", "othertableid")));
        assert!(!is_primary_identifier_name(&col("table", "whatever")));
        assert!(!is_primary_identifier_name(&col("table", "validity")));
    }

    #[test]
    fn test_primary_identifier_rule_metadata() {
        let rule = primary_identifier_by_name();
        assert_eq!(rule.name(), PRIMARY_IDENTIFIER_BY_NAME);
        assert_eq!(rule.confidence(), InferenceSignalConfidence::ForSure);
        assert_eq!(rule.type_node(), InferenceSignalType::IdPrimary);
        assert!(!rule.is_complimentary());
    }

    #[test]
    fn test_type_rules() {
        assert!(time_dimension_by_time_type().match_column(&props(ColumnType::DateTime)));
        assert!(categorical_dimension_by_boolean_type().match_column(&props(ColumnType::Boolean)));
        assert!(categorical_dimension_by_string_type().match_column(&props(ColumnType::String)));
        assert!(measure_by_real_type().match_column(&props(ColumnType::Float)));
        assert!(measure_by_integer_type().match_column(&props(ColumnType::Integer)));
        assert!(!measure_by_real_type().match_column(&props(ColumnType::Integer)));
        assert!(!time_dimension_by_time_type().match_column(&props(ColumnType::Unknown)));
    }

    #[test]
    fn test_unique_identifier_requires_counts() {
        let rule = unique_identifier_by_distinct_count();
        assert!(rule.match_column(&props(ColumnType::Integer).with_counts(10, 10)));
        assert!(!rule.match_column(&props(ColumnType::Integer).with_counts(10, 9)));
        assert!(!rule.match_column(&props(ColumnType::Integer).with_row_count(10)));
        assert!(!rule.match_column(&props(ColumnType::Integer)));
    }

    #[test]
    fn test_primary_time_by_name() {
        let rule = primary_time_dimension_by_name();
        let named = |name: &str| ColumnProperties::new(col("t", name), ColumnType::DateTime);

        assert!(rule.match_column(&named("ds")));
        assert!(rule.match_column(&named("created_at")));
        assert!(rule.match_column(&named("CREATED_DATE")));
        assert!(!rule.match_column(&named("updated_at")));
        assert!(!rule.match_column(&named("ds_partition")));
    }

    fn context_with_times(count: usize) -> DataWarehouseInferenceContext {
        let mut table = TableProperties::new("events").with_column("event_id", ColumnType::Integer);
        for i in 0..count {
            table = table.with_column(&format!("time_{i}"), ColumnType::DateTime);
        }
        DataWarehouseInferenceContext::new(vec![table]).unwrap()
    }

    #[test]
    fn test_only_time_column() {
        let signals = PrimaryTimeDimensionIfOnlyTimeRule.process(&context_with_times(1)).unwrap();

        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].column, col("events", "time_0"));
        assert_eq!(signals[0].type_node, InferenceSignalType::DimensionPrimaryTime);
        assert!(signals[0].is_definitive());
    }

    #[test]
    fn test_no_or_several_time_columns() {
        let rule = PrimaryTimeDimensionIfOnlyTimeRule;
        assert!(rule.process(&context_with_times(0)).unwrap().is_empty());
        assert!(rule.process(&context_with_times(2)).unwrap().is_empty());
        assert!(rule.process(&context_with_times(3)).unwrap().is_empty());
    }

    #[test]
    fn test_only_time_is_per_table() {
        let ctx = DataWarehouseInferenceContext::new(vec![
            TableProperties::new("a").with_column("ds", ColumnType::DateTime),
            TableProperties::new("b")
                .with_column("start", ColumnType::DateTime)
                .with_column("end", ColumnType::DateTime),
        ])
        .unwrap();

        let signals = PrimaryTimeDimensionIfOnlyTimeRule.process(&ctx).unwrap();
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].column, col("a", "ds"));
    }
}
