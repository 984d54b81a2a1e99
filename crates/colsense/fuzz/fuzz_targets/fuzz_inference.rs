//! Fuzz target for the full inference pipeline.
//!
//! Builds a context from arbitrary column statistics and runs the default
//! ruleset over it. Inference must never panic and must decide every column.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use colsense::{
    ColumnProperties, ColumnReference, ColumnType, DataWarehouseInferenceContext,
    InferenceRunner, Ruleset, TableProperties,
};

#[derive(Debug, Arbitrary)]
struct FuzzColumn {
    table: u8,
    name: String,
    type_name: String,
    row_count: Option<u64>,
    distinct_row_count: Option<u64>,
}

fuzz_target!(|columns: Vec<FuzzColumn>| {
    let mut tables: Vec<TableProperties> = (0..4)
        .map(|i| TableProperties::new(format!("table_{i}")))
        .collect();

    for column in columns {
        let table = &mut tables[(column.table % 4) as usize];
        let props = ColumnProperties {
            column: ColumnReference::new(table.name.clone(), column.name.clone()),
            column_type: ColumnType::from_sql_type(&column.type_name),
            row_count: column.row_count,
            distinct_row_count: column.distinct_row_count,
        };
        table.columns.insert(column.name, props);
    }

    // Statistics with distinct > rows are rejected up front.
    let Ok(context) = DataWarehouseInferenceContext::new(tables) else {
        return;
    };

    let runner = InferenceRunner::new(Ruleset::default_rules()).unwrap();
    let report = runner.run(&context);
    assert!(report.is_clean());
    assert_eq!(report.decisions.len(), context.column_count());
});
