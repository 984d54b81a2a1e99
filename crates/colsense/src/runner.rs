//! Executes a ruleset over a warehouse context and resolves every column.

use std::panic::{self, AssertUnwindSafe};

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crate::context::{ColumnReference, DataWarehouseInferenceContext};
use crate::error::{ColsenseError, Result};
use crate::rule::{InferenceRule, RuleError, Ruleset, panic_message};
use crate::signal::{InferenceSignal, InferenceSignalType};
use crate::solver::{ColumnDecision, ConflictResolver, InferenceSolver, Resolution};

/// Runner settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Evaluate rules and resolve columns on the rayon thread pool.
    pub parallel: bool,
}

/// A rule that returned an error or panicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFailure {
    pub rule: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<ColumnReference>,
    pub message: String,
}

/// Everything one run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceReport {
    /// One decision per column: context columns first in context order, then
    /// columns only known from signals, in first-seen order.
    #[serde(with = "decision_list")]
    pub decisions: IndexMap<ColumnReference, ColumnDecision>,
    pub failures: Vec<RuleFailure>,
    pub signal_count: usize,
    pub rule_count: usize,
}

impl InferenceReport {
    /// Decision for one column.
    pub fn decision(&self, column: &ColumnReference) -> Option<&ColumnDecision> {
        self.decisions.get(column)
    }

    pub fn resolved(&self) -> impl Iterator<Item = &ColumnDecision> {
        self.decisions.values().filter(|d| d.is_resolved())
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &ColumnDecision> {
        self.decisions.values().filter(|d| !d.is_resolved())
    }

    /// Number of columns resolved to each type, in hierarchy order. Types with no columns are omitted.
    pub fn counts_by_type(&self) -> IndexMap<InferenceSignalType, usize> {
        InferenceSignalType::ALL
            .iter()
            .filter_map(|&type_node| {
                let count = self
                    .resolved()
                    .filter(|d| d.type_node() == Some(type_node))
                    .count();
                (count > 0).then_some((type_node, count))
            })
            .collect()
    }

    /// Whether every rule ran without failing.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Applies a ruleset to a context and hands each column's signals to a solver.
#[derive(Debug)]
pub struct InferenceRunner {
    ruleset: Ruleset,
    solver: Box<dyn InferenceSolver>,
    config: RunnerConfig,
}

impl InferenceRunner {
    /// Create a sequential runner using the [`ConflictResolver`].
    pub fn new(ruleset: Ruleset) -> Result<Self> {
        Self::with_config(ruleset, RunnerConfig::default())
    }

    /// Create a runner with explicit settings.
    pub fn with_config(ruleset: Ruleset, config: RunnerConfig) -> Result<Self> {
        if ruleset.is_empty() {
            return Err(ColsenseError::EmptyRuleset);
        }
        Ok(Self {
            ruleset,
            solver: Box::new(ConflictResolver),
            config,
        })
    }

    /// Replace the solver.
    pub fn with_solver(mut self, solver: impl InferenceSolver + 'static) -> Self {
        self.solver = Box::new(solver);
        self
    }

    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run every rule, then resolve every column.
    ///
    /// Signals are concatenated in ruleset order regardless of whether rules
    /// ran in parallel. Failures are reported in the result; a rule failing on
    /// one column keeps the signals it produced for the others, and the other
    /// rules still run.
    #[instrument(skip_all, fields(rules = self.ruleset.len(), columns = context.column_count()))]
    pub fn run(&self, context: &DataWarehouseInferenceContext) -> InferenceReport {
        let outcomes: Vec<_> = if self.config.parallel {
            self.ruleset
                .rules()
                .par_iter()
                .map(|rule| run_rule(rule.as_ref(), context))
                .collect()
        } else {
            self.ruleset
                .rules()
                .iter()
                .map(|rule| run_rule(rule.as_ref(), context))
                .collect()
        };

        let mut signals = Vec::new();
        let mut failures = Vec::new();
        for (rule_signals, rule_failures) in outcomes {
            signals.extend(rule_signals);
            failures.extend(rule_failures);
        }
        let signal_count = signals.len();

        let decisions = self.resolve(context, signals);
        let unresolved = decisions.values().filter(|d| !d.is_resolved()).count();

        info!(
            signals = signal_count,
            decisions = decisions.len(),
            unresolved,
            failures = failures.len(),
            "Inference complete"
        );

        InferenceReport {
            decisions,
            failures,
            signal_count,
            rule_count: self.ruleset.len(),
        }
    }

    fn resolve(
        &self,
        context: &DataWarehouseInferenceContext,
        signals: Vec<InferenceSignal>,
    ) -> IndexMap<ColumnReference, ColumnDecision> {
        let mut grouped: IndexMap<ColumnReference, Vec<InferenceSignal>> = context
            .columns()
            .keys()
            .map(|column| (column.clone(), Vec::new()))
            .collect();

        for signal in signals {
            if context.column(&signal.column).is_none() {
                debug!(column = %signal.column, "Signal for a column outside the context");
            }
            grouped
                .entry(signal.column.clone())
                .or_default()
                .push(signal);
        }

        if self.config.parallel {
            let grouped: Vec<_> = grouped.into_iter().collect();
            grouped
                .into_par_iter()
                .map(|(column, column_signals)| self.solve(column, &column_signals))
                .collect::<Vec<_>>()
                .into_iter()
                .collect()
        } else {
            grouped
                .into_iter()
                .map(|(column, column_signals)| self.solve(column, &column_signals))
                .collect()
        }
    }

    fn solve(
        &self,
        column: ColumnReference,
        signals: &[InferenceSignal],
    ) -> (ColumnReference, ColumnDecision) {
        let decision = self.solver.solve_column(&column, signals);
        if let Resolution::Unresolved(reason) = decision.resolution {
            warn!(column = %column, reason = reason.label(), "Column left unresolved");
        }
        (column, decision)
    }
}

fn run_rule(
    rule: &dyn InferenceRule,
    context: &DataWarehouseInferenceContext,
) -> (Vec<InferenceSignal>, Vec<RuleFailure>) {
    match panic::catch_unwind(AssertUnwindSafe(|| rule.evaluate(context))) {
        Ok(evaluation) => {
            debug!(
                rule = rule.name(),
                signals = evaluation.signals.len(),
                errors = evaluation.errors.len(),
                "Rule finished"
            );
            let failures = evaluation
                .errors
                .into_iter()
                .map(|err| failure(rule, err))
                .collect();
            (evaluation.signals, failures)
        }
        Err(payload) => {
            let err = RuleError::new(format!("rule panicked: {}", panic_message(payload.as_ref())));
            (Vec::new(), vec![failure(rule, err)])
        }
    }
}

fn failure(rule: &dyn InferenceRule, err: RuleError) -> RuleFailure {
    error!(rule = rule.name(), column = ?err.column, error = %err, "Rule failed");
    RuleFailure {
        rule: rule.name().to_string(),
        column: err.column,
        message: err.message,
    }
}

/// Serializes decisions as a list, since column references are not string keys.
mod decision_list {
    use indexmap::IndexMap;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::context::ColumnReference;
    use crate::solver::ColumnDecision;

    pub fn serialize<S>(
        decisions: &IndexMap<ColumnReference, ColumnDecision>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(decisions.values())
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<IndexMap<ColumnReference, ColumnDecision>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let decisions = Vec::<ColumnDecision>::deserialize(deserializer)?;
        Ok(decisions
            .into_iter()
            .map(|decision| (decision.column.clone(), decision))
            .collect())
    }
}
