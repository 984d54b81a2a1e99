//! Immutable warehouse snapshot consumed by inference rules.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::column::{ColumnProperties, ColumnReference, ColumnType};
use crate::error::{ColsenseError, Result};

/// Properties of every column in one table, in profiler order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableProperties {
    pub name: String,
    pub columns: IndexMap<String, ColumnProperties>,
}

impl TableProperties {
    /// Create an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: IndexMap::new(),
        }
    }

    /// Add a column with no statistics.
    pub fn with_column(self, name: &str, column_type: ColumnType) -> Self {
        let props = ColumnProperties::new(ColumnReference::new(&self.name, name), column_type);
        self.with_properties(props)
    }

    /// Add a column with both row counts.
    pub fn with_counted_column(
        self,
        name: &str,
        column_type: ColumnType,
        row_count: u64,
        distinct_row_count: u64,
    ) -> Self {
        let props = ColumnProperties::new(ColumnReference::new(&self.name, name), column_type)
            .with_counts(row_count, distinct_row_count);
        self.with_properties(props)
    }

    /// Add pre-built column properties. A later column with the same name replaces the earlier one.
    pub fn with_properties(mut self, props: ColumnProperties) -> Self {
        self.columns.insert(props.column.column_name.clone(), props);
        self
    }

    /// Get a column by name.
    pub fn get(&self, column_name: &str) -> Option<&ColumnProperties> {
        self.columns.get(column_name)
    }

    /// Columns with a given declared type.
    pub fn columns_of_type(&self, column_type: ColumnType) -> impl Iterator<Item = &ColumnProperties> {
        self.columns
            .values()
            .filter(move |props| props.column_type == column_type)
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Per-table, per-column statistics for one inference run.
///
/// Built once from profiler output and read-only afterwards. Besides the
/// per-table view it keeps a flat index from [`ColumnReference`] to
/// [`ColumnProperties`] in table-then-column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataWarehouseInferenceContext {
    tables: IndexMap<String, TableProperties>,
    columns: IndexMap<ColumnReference, ColumnProperties>,
}

impl DataWarehouseInferenceContext {
    /// Build a context, validating table membership and row-count invariants.
    pub fn new(tables: impl IntoIterator<Item = TableProperties>) -> Result<Self> {
        let mut table_map: IndexMap<String, TableProperties> = IndexMap::new();
        let mut columns = IndexMap::new();

        for table in tables {
            if table_map.contains_key(&table.name) {
                return Err(ColsenseError::invalid_statistics(
                    &table.name,
                    "table appears more than once",
                ));
            }

            for (name, props) in &table.columns {
                if props.column.table_name != table.name || &props.column.column_name != name {
                    return Err(ColsenseError::invalid_statistics(
                        &props.column,
                        format!("column is registered under '{}.{}'", table.name, name),
                    ));
                }
                props.validate()?;
                columns.insert(props.column.clone(), props.clone());
            }

            table_map.insert(table.name.clone(), table);
        }

        Ok(Self {
            tables: table_map,
            columns,
        })
    }

    /// All tables, in profiler order.
    pub fn tables(&self) -> &IndexMap<String, TableProperties> {
        &self.tables
    }

    /// All columns across all tables.
    pub fn columns(&self) -> &IndexMap<ColumnReference, ColumnProperties> {
        &self.columns
    }

    /// Properties of a table's columns.
    pub fn table(&self, table_name: &str) -> Option<&TableProperties> {
        self.tables.get(table_name)
    }

    /// Properties of a single column.
    pub fn column(&self, column: &ColumnReference) -> Option<&ColumnProperties> {
        self.columns.get(column)
    }

    /// Number of tables.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Number of columns across all tables.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Whether the context holds no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders() -> TableProperties {
        TableProperties::new("orders")
            .with_counted_column("order_id", ColumnType::Integer, 100, 100)
            .with_counted_column("status", ColumnType::String, 100, 4)
            .with_column("ds", ColumnType::DateTime)
    }

    #[test]
    fn test_flat_index_follows_table_order() {
        let ctx = DataWarehouseInferenceContext::new(vec![
            orders(),
            TableProperties::new("customers").with_column("id", ColumnType::Integer),
        ])
        .unwrap();

        let names: Vec<String> = ctx.columns().keys().map(|c| c.to_string()).collect();
        assert_eq!(
            names,
            vec!["orders.order_id", "orders.status", "orders.ds", "customers.id"]
        );
        assert_eq!(ctx.table_count(), 2);
        assert_eq!(ctx.column_count(), 4);
    }

    #[test]
    fn test_lookup_by_reference() {
        let ctx = DataWarehouseInferenceContext::new(vec![orders()]).unwrap();

        let status = ctx.column(&ColumnReference::new("orders", "status")).unwrap();
        assert_eq!(status.distinct_row_count, Some(4));
        assert!(ctx.column(&ColumnReference::new("orders", "STATUS")).is_none());
        assert!(ctx.table("orders").unwrap().get("ds").is_some());
    }

    #[test]
    fn test_rejects_duplicate_tables() {
        let err = DataWarehouseInferenceContext::new(vec![orders(), orders()]).unwrap_err();
        assert!(matches!(err, ColsenseError::InvalidStatistics { .. }));
    }

    #[test]
    fn test_rejects_distinct_above_rows() {
        let table = TableProperties::new("t").with_counted_column("c", ColumnType::String, 3, 4);
        assert!(DataWarehouseInferenceContext::new(vec![table]).is_err());
    }

    #[test]
    fn test_rejects_misfiled_column() {
        let stray = ColumnProperties::new(ColumnReference::new("other", "c"), ColumnType::String);
        let table = TableProperties::new("t").with_properties(stray);
        assert!(DataWarehouseInferenceContext::new(vec![table]).is_err());
    }

    #[test]
    fn test_columns_of_type() {
        let table = orders();
        let times: Vec<&str> = table
            .columns_of_type(ColumnType::DateTime)
            .map(|p| p.column.column_name.as_str())
            .collect();
        assert_eq!(times, vec!["ds"]);
    }
}
