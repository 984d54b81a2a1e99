//! Warehouse statistics snapshot that inference rules read from.

mod column;
mod warehouse;

pub use column::{ColumnProperties, ColumnReference, ColumnType};
pub use warehouse::{DataWarehouseInferenceContext, TableProperties};
