//! Rules command - list the active ruleset.

use std::path::PathBuf;

use colored::Colorize;
use colsense::{InferenceRule, Ruleset};

use super::load_ruleset_config;

pub fn run(config: Option<PathBuf>, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_ruleset_config(config.as_deref())?;
    let ruleset = Ruleset::from_config(&config)?;

    println!("{} ({} rules)", "Active ruleset".cyan().bold(), ruleset.len());
    for (i, rule) in ruleset.rules().iter().enumerate() {
        println!("  {:>2}. {}", i + 1, rule.name());
    }

    if !config.disabled_rules.is_empty() {
        println!();
        println!("{}", "Disabled:".yellow().bold());
        for name in &config.disabled_rules {
            println!("  {}", name.dimmed());
        }
    }

    if verbose {
        println!();
        println!("{}", "Parameters:".yellow().bold());
        println!("  foreign_identifier_ratio: {}", config.foreign_identifier_ratio);
        println!("  categorical_ratio:        {}", config.categorical_ratio);
        println!("  primary_time_pattern:     {}", config.primary_time_pattern);
    }

    Ok(())
}
