//! Example: Infer semantic column types from a warehouse statistics snapshot.
//!
//! Usage:
//!   cargo run --example infer -- <snapshot_path>
//!
//! Example:
//!   cargo run --example infer -- test_data/orders.json

use std::env;
use std::path::Path;

use colsense::{Colsense, Resolution};

fn main() -> colsense::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example infer -- <snapshot_path>");
        eprintln!("\nExample:");
        eprintln!("  cargo run --example infer -- test_data/orders.json");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    if !path.exists() {
        eprintln!("Error: File not found: {}", path.display());
        std::process::exit(1);
    }

    let colsense = Colsense::new()?;
    let outcome = colsense.infer(path)?;

    println!("## Source");
    println!("  File: {}", outcome.source.file);
    println!("  Format: {}", outcome.source.format.label());
    println!("  Tables: {}", outcome.source.table_count);
    println!("  Columns: {}", outcome.source.column_count);
    println!();

    println!("## Decisions");
    for decision in outcome.report.decisions.values() {
        match decision.resolution {
            Resolution::Resolved(type_node) => println!(
                "  {:<40} {:<24} {}",
                decision.column.to_string(),
                type_node.name(),
                decision.confidence.map(|c| c.label()).unwrap_or("-")
            ),
            Resolution::Unresolved(reason) => {
                println!("  {:<40} UNRESOLVED ({})", decision.column.to_string(), reason.label())
            }
        }
        for problem in &decision.problems {
            println!("      ! {problem}");
        }
    }

    for failure in &outcome.report.failures {
        println!("Rule '{}' failed: {}", failure.rule, failure.message);
    }

    Ok(())
}
