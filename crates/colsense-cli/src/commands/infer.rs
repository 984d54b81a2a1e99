//! Infer command - resolve a semantic type for every column in a snapshot.

use std::path::PathBuf;

use colored::{ColoredString, Colorize};
use colsense::{
    Colsense, ColsenseConfig, ColumnDecision, InferenceSignalConfidence, Resolution, RunnerConfig,
};

use super::load_ruleset_config;

pub fn run(
    file: PathBuf,
    config: Option<PathBuf>,
    json_output: bool,
    parallel: bool,
    unresolved_only: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Validate input file exists
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let ruleset = load_ruleset_config(config.as_deref())?;
    let colsense = Colsense::with_config(ColsenseConfig {
        ruleset,
        runner: RunnerConfig { parallel },
    })?;

    let outcome = colsense.infer(&file)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Inferring".cyan().bold(),
        file.display().to_string().white()
    );
    println!(
        "{} tables, {} columns, {} rules",
        outcome.source.table_count.to_string().white().bold(),
        outcome.source.column_count.to_string().white().bold(),
        outcome.report.rule_count.to_string().white().bold()
    );
    println!();

    println!(
        "  {} {} {} {}",
        format!("{:20}", "TABLE").bold(),
        format!("{:24}", "COLUMN").bold(),
        format!("{:24}", "DECISION").bold(),
        "CONFIDENCE".bold()
    );

    for decision in outcome
        .report
        .decisions
        .values()
        .filter(|d| !unresolved_only || !d.is_resolved())
    {
        print_decision(decision, verbose);
    }

    if !outcome.report.failures.is_empty() {
        println!();
        println!("{}", "Rule failures:".red().bold());
        for failure in &outcome.report.failures {
            match &failure.column {
                Some(column) => println!("  {} ({}): {}", failure.rule, column, failure.message),
                None => println!("  {}: {}", failure.rule, failure.message),
            }
        }
    }

    // Summary
    let unresolved = outcome.report.unresolved().count();
    println!();
    println!("{}", "Summary:".yellow().bold());
    for (type_node, count) in outcome.report.counts_by_type() {
        println!("  {:24} {}", type_node.name(), count.to_string().white());
    }
    if unresolved > 0 {
        println!("  {:24} {}", "UNRESOLVED", unresolved.to_string().red());
        println!();
        println!(
            "Run with {} to see why columns were left unresolved",
            "--verbose".cyan().bold()
        );
    } else {
        println!();
        println!("{}", "Every column was resolved.".green());
    }

    Ok(())
}

fn print_decision(decision: &ColumnDecision, verbose: bool) {
    let (label, confidence) = match decision.resolution {
        Resolution::Resolved(type_node) => {
            let confidence = decision
                .confidence
                .map(colored_confidence)
                .unwrap_or_else(|| "-".normal());
            (format!("{:24}", type_node.name()).green(), confidence)
        }
        Resolution::Unresolved(reason) => (
            format!("{:24}", format!("UNRESOLVED ({})", reason.label())).red(),
            "-".normal(),
        ),
    };

    println!(
        "  {:20} {:24} {} {}",
        decision.column.table_name, decision.column.column_name, label, confidence
    );

    if verbose {
        for reason in &decision.reasons {
            println!("      {} {}", "+".green(), reason);
        }
        for problem in &decision.problems {
            println!("      {} {}", "!".yellow(), problem);
        }
    }
}

fn colored_confidence(confidence: InferenceSignalConfidence) -> ColoredString {
    match confidence {
        InferenceSignalConfidence::ForSure | InferenceSignalConfidence::High => {
            confidence.label().green()
        }
        InferenceSignalConfidence::Medium => confidence.label().yellow(),
        InferenceSignalConfidence::Low => confidence.label().red(),
    }
}
