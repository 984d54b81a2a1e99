//! Warehouse statistics snapshots stored on disk.
//!
//! Two layouts are supported. A JSON document:
//!
//! ```json
//! {"tables": [{"name": "orders", "columns": [
//!     {"name": "order_id", "type": "INTEGER", "row_count": 100, "distinct_row_count": 100}
//! ]}]}
//! ```
//!
//! or a flat delimited file, one row per column, with the header
//! `table,column,type,row_count,distinct_row_count`. Empty count cells mean
//! the statistic was not collected. Files ending in `.tsv` are tab separated.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::context::{
    ColumnProperties, ColumnReference, ColumnType, DataWarehouseInferenceContext, TableProperties,
};
use crate::error::{ColsenseError, Result};

/// On-disk snapshot layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    Json,
    Csv,
    Tsv,
}

impl SnapshotFormat {
    /// Pick a format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("json") => Ok(SnapshotFormat::Json),
            Some("csv") => Ok(SnapshotFormat::Csv),
            Some("tsv") | Some("tab") => Ok(SnapshotFormat::Tsv),
            _ => Err(ColsenseError::UnsupportedFormat(format!(
                "cannot infer snapshot format of '{}' (expected .json, .csv or .tsv)",
                path.display()
            ))),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SnapshotFormat::Json => "json",
            SnapshotFormat::Csv => "csv",
            SnapshotFormat::Tsv => "tsv",
        }
    }
}

/// Where a context came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    pub format: SnapshotFormat,
    pub table_count: usize,
    pub column_count: usize,
    /// When the snapshot was read.
    pub loaded_at: DateTime<Utc>,
}

/// Reads snapshot files into an inference context.
#[derive(Debug, Clone, Default)]
pub struct SnapshotLoader {
    /// Format override. `None` picks the format from the file extension.
    format: Option<SnapshotFormat>,
}

impl SnapshotLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always parse files as `format`, whatever their extension.
    pub fn with_format(format: SnapshotFormat) -> Self {
        Self {
            format: Some(format),
        }
    }

    /// Load a snapshot file.
    pub fn load(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<(DataWarehouseInferenceContext, SnapshotMetadata)> {
        let path = path.as_ref();
        let format = match self.format {
            Some(format) => format,
            None => SnapshotFormat::from_path(path)?,
        };

        let contents = fs::read(path).map_err(|e| ColsenseError::io(path, e))?;
        let hash = format!("sha256:{:x}", Sha256::digest(&contents));

        let context = self.parse_bytes(&contents, format)?;
        debug!(
            path = %path.display(),
            format = format.label(),
            tables = context.table_count(),
            columns = context.column_count(),
            "Loaded snapshot"
        );

        let metadata = SnapshotMetadata {
            file: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.to_path_buf(),
            hash,
            size_bytes: contents.len() as u64,
            format,
            table_count: context.table_count(),
            column_count: context.column_count(),
            loaded_at: Utc::now(),
        };

        Ok((context, metadata))
    }

    /// Parse snapshot contents already in memory.
    pub fn parse_bytes(
        &self,
        bytes: &[u8],
        format: SnapshotFormat,
    ) -> Result<DataWarehouseInferenceContext> {
        match format {
            SnapshotFormat::Json => parse_json(bytes),
            SnapshotFormat::Csv => parse_delimited(bytes, b','),
            SnapshotFormat::Tsv => parse_delimited(bytes, b'\t'),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SnapshotDocument {
    tables: Vec<TableDocument>,
}

#[derive(Debug, Deserialize)]
struct TableDocument {
    name: String,
    #[serde(default)]
    columns: Vec<ColumnDocument>,
}

#[derive(Debug, Deserialize)]
struct ColumnDocument {
    name: String,
    #[serde(rename = "type", default)]
    column_type: String,
    #[serde(default)]
    row_count: Option<u64>,
    #[serde(default)]
    distinct_row_count: Option<u64>,
}

/// One row of a delimited snapshot.
#[derive(Debug, Deserialize)]
struct ColumnRow {
    table: String,
    column: String,
    #[serde(rename = "type", default)]
    column_type: String,
    #[serde(default)]
    row_count: Option<u64>,
    #[serde(default)]
    distinct_row_count: Option<u64>,
}

fn parse_json(bytes: &[u8]) -> Result<DataWarehouseInferenceContext> {
    let document: SnapshotDocument = serde_json::from_slice(bytes)?;

    let mut tables = Vec::with_capacity(document.tables.len());
    for table_doc in document.tables {
        let mut table = new_table(&table_doc.name)?;
        for column in table_doc.columns {
            insert_column(
                &mut table,
                &column.name,
                &column.column_type,
                column.row_count,
                column.distinct_row_count,
            )?;
        }
        tables.push(table);
    }

    DataWarehouseInferenceContext::new(tables)
}

fn parse_delimited(bytes: &[u8], delimiter: u8) -> Result<DataWarehouseInferenceContext> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut tables: IndexMap<String, TableProperties> = IndexMap::new();
    for record in reader.deserialize() {
        let row: ColumnRow = record?;
        if !tables.contains_key(&row.table) {
            tables.insert(row.table.clone(), new_table(&row.table)?);
        }
        if let Some(table) = tables.get_mut(&row.table) {
            insert_column(
                table,
                &row.column,
                &row.column_type,
                row.row_count,
                row.distinct_row_count,
            )?;
        }
    }

    DataWarehouseInferenceContext::new(tables.into_values())
}

fn new_table(name: &str) -> Result<TableProperties> {
    if name.trim().is_empty() {
        return Err(ColsenseError::invalid_statistics(
            "<unnamed>",
            "table name is empty",
        ));
    }
    Ok(TableProperties::new(name))
}

fn insert_column(
    table: &mut TableProperties,
    name: &str,
    column_type: &str,
    row_count: Option<u64>,
    distinct_row_count: Option<u64>,
) -> Result<()> {
    let column = ColumnReference::new(&table.name, name);
    if name.trim().is_empty() {
        return Err(ColsenseError::invalid_statistics(column, "column name is empty"));
    }
    if table.columns.contains_key(name) {
        return Err(ColsenseError::invalid_statistics(
            column,
            "column appears more than once",
        ));
    }

    let props = ColumnProperties {
        column,
        column_type: ColumnType::from_sql_type(column_type),
        row_count,
        distinct_row_count,
    };
    table.columns.insert(name.to_string(), props);
    Ok(())
}
