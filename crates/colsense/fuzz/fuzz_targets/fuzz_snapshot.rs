//! Fuzz target for snapshot parsing.
//!
//! This fuzzer tests that the snapshot loader:
//! 1. Never panics on malformed JSON or delimited input
//! 2. Only returns contexts that satisfy the row-count invariants

#![no_main]

use libfuzzer_sys::fuzz_target;
use colsense::input::SnapshotFormat;
use colsense::SnapshotLoader;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let loader = SnapshotLoader::new();
    for format in [SnapshotFormat::Json, SnapshotFormat::Csv, SnapshotFormat::Tsv] {
        if let Ok(context) = loader.parse_bytes(data, format) {
            for props in context.columns().values() {
                assert!(props.validate().is_ok());
            }
        }
    }
});
