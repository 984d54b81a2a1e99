//! Colsense: rule-based semantic type inference for warehouse columns.
//!
//! Colsense looks at the statistics a warehouse profiler collects (column
//! names, declared types, row and distinct counts) and decides what role each
//! column plays in a semantic model: identifier, dimension or measure.
//!
//! # How it works
//!
//! - **Rules** inspect a [`DataWarehouseInferenceContext`] and emit
//!   [`InferenceSignal`]s: typed, confidence-weighted claims about columns.
//! - **Signals** are either definitive or complimentary. Complimentary ones
//!   only support or refine what definitive evidence says.
//! - **The solver** reduces each column's signals to one decision, using the
//!   type hierarchy to tell refinements apart from contradictions. A column
//!   it cannot settle is reported as unresolved rather than guessed.
//!
//! # Example
//!
//! ```no_run
//! use colsense::Colsense;
//!
//! let colsense = Colsense::new().unwrap();
//! let outcome = colsense.infer("warehouse_stats.json").unwrap();
//!
//! for decision in outcome.report.decisions.values() {
//!     println!("{}: {:?}", decision.column, decision.type_node());
//! }
//! ```

pub mod context;
pub mod error;
pub mod input;
pub mod rule;
pub mod runner;
pub mod signal;
pub mod solver;

mod colsense;

pub use crate::colsense::{Colsense, ColsenseConfig, InferenceOutcome};
pub use context::{
    ColumnProperties, ColumnReference, ColumnType, DataWarehouseInferenceContext, TableProperties,
};
pub use error::{ColsenseError, Result};
pub use input::{InferenceContextProvider, SnapshotLoader, SnapshotMetadata};
pub use rule::{InferenceRule, RuleError, Ruleset, RulesetConfig};
pub use runner::{InferenceReport, InferenceRunner, RuleFailure, RunnerConfig};
pub use signal::{InferenceSignal, InferenceSignalConfidence, InferenceSignalType};
pub use solver::{ColumnDecision, ConflictResolver, InferenceSolver, Resolution, UnresolvedReason};
