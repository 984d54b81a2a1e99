//! Main Colsense struct and public API.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::context::DataWarehouseInferenceContext;
use crate::error::Result;
use crate::input::{InferenceContextProvider, SnapshotLoader, SnapshotMetadata};
use crate::rule::{Ruleset, RulesetConfig};
use crate::runner::{InferenceReport, InferenceRunner, RunnerConfig};

/// Configuration for a Colsense instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColsenseConfig {
    /// Parameters for the built-in rules.
    pub ruleset: RulesetConfig,
    /// Runner settings.
    pub runner: RunnerConfig,
}

/// Result of inferring types for a snapshot file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceOutcome {
    /// Metadata about the snapshot file.
    pub source: SnapshotMetadata,
    /// Per-column decisions and rule failures.
    pub report: InferenceReport,
}

/// The main Colsense inference engine.
#[derive(Debug)]
pub struct Colsense {
    config: ColsenseConfig,
    loader: SnapshotLoader,
    runner: InferenceRunner,
}

impl Colsense {
    /// Create an instance running the built-in rules with default parameters.
    pub fn new() -> Result<Self> {
        Self::with_config(ColsenseConfig::default())
    }

    /// Create an instance with custom configuration.
    pub fn with_config(config: ColsenseConfig) -> Result<Self> {
        let ruleset = Ruleset::from_config(&config.ruleset)?;
        let runner = InferenceRunner::with_config(ruleset, config.runner.clone())?;

        Ok(Self {
            config,
            loader: SnapshotLoader::new(),
            runner,
        })
    }

    /// Create an instance with a hand-built ruleset.
    ///
    /// `config.ruleset` is ignored in favor of `ruleset`.
    pub fn with_ruleset(ruleset: Ruleset, config: ColsenseConfig) -> Result<Self> {
        let runner = InferenceRunner::with_config(ruleset, config.runner.clone())?;

        Ok(Self {
            config,
            loader: SnapshotLoader::new(),
            runner,
        })
    }

    /// Read snapshots with a specific loader.
    pub fn with_loader(mut self, loader: SnapshotLoader) -> Self {
        self.loader = loader;
        self
    }

    pub fn config(&self) -> &ColsenseConfig {
        &self.config
    }

    /// The active ruleset.
    pub fn ruleset(&self) -> &Ruleset {
        self.runner.ruleset()
    }

    /// Load a snapshot file and infer a type for every column in it.
    pub fn infer(&self, path: impl AsRef<Path>) -> Result<InferenceOutcome> {
        let (context, source) = self.loader.load(path)?;
        let report = self.runner.run(&context);

        Ok(InferenceOutcome { source, report })
    }

    /// Infer types for a context that is already in memory.
    pub fn infer_context(&self, context: &DataWarehouseInferenceContext) -> InferenceReport {
        self.runner.run(context)
    }

    /// Fetch a context from a provider and infer types for it.
    pub fn infer_from(&self, provider: &dyn InferenceContextProvider) -> Result<InferenceReport> {
        let context = provider.get_context()?;
        Ok(self.runner.run(&context))
    }
}
