//! Single-column matcher rules.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use super::base::{InferenceRule, RuleError, RuleEvaluation, RuleResult, panic_message};
use crate::context::{ColumnProperties, DataWarehouseInferenceContext};
use crate::signal::{InferenceSignal, InferenceSignalConfidence, InferenceSignalType};

/// Predicate over one column's properties.
pub type ColumnMatcher = Box<dyn Fn(&ColumnProperties) -> bool + Send + Sync>;

/// A rule built from a column predicate plus fixed signal metadata.
///
/// Every column in the context is tested independently; each match produces
/// one signal with the configured type, confidence and reason. A predicate
/// that panics on a column fails only that column.
pub struct ColumnMatcherRule {
    name: String,
    type_node: InferenceSignalType,
    confidence: InferenceSignalConfidence,
    is_complimentary: bool,
    reason: String,
    matcher: ColumnMatcher,
}

impl ColumnMatcherRule {
    /// Create a rule producing definitive signals.
    pub fn new<F>(
        name: impl Into<String>,
        type_node: InferenceSignalType,
        confidence: InferenceSignalConfidence,
        reason: impl Into<String>,
        matcher: F,
    ) -> Self
    where
        F: Fn(&ColumnProperties) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            type_node,
            confidence,
            is_complimentary: false,
            reason: reason.into(),
            matcher: Box::new(matcher),
        }
    }

    /// Mark produced signals as complimentary.
    pub fn complimentary(mut self) -> Self {
        self.is_complimentary = true;
        self
    }

    pub fn type_node(&self) -> InferenceSignalType {
        self.type_node
    }

    pub fn confidence(&self) -> InferenceSignalConfidence {
        self.confidence
    }

    pub fn is_complimentary(&self) -> bool {
        self.is_complimentary
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Test a single column.
    pub fn match_column(&self, props: &ColumnProperties) -> bool {
        (self.matcher)(props)
    }
}

impl fmt::Debug for ColumnMatcherRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnMatcherRule")
            .field("name", &self.name)
            .field("type_node", &self.type_node)
            .field("confidence", &self.confidence)
            .field("is_complimentary", &self.is_complimentary)
            .finish_non_exhaustive()
    }
}

impl InferenceRule for ColumnMatcherRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, context: &DataWarehouseInferenceContext) -> RuleResult<Vec<InferenceSignal>> {
        let mut evaluation = self.evaluate(context);
        if evaluation.errors.is_empty() {
            Ok(evaluation.signals)
        } else {
            Err(evaluation.errors.swap_remove(0))
        }
    }

    fn evaluate(&self, context: &DataWarehouseInferenceContext) -> RuleEvaluation {
        let mut evaluation = RuleEvaluation::default();
        for props in context.columns().values() {
            match panic::catch_unwind(AssertUnwindSafe(|| self.match_column(props))) {
                Ok(true) => evaluation.signals.push(InferenceSignal::new(
                    props.column.clone(),
                    self.type_node,
                    self.confidence,
                    self.is_complimentary,
                    self.reason.clone(),
                )),
                Ok(false) => {}
                Err(payload) => evaluation.errors.push(RuleError::for_column(
                    props.column.clone(),
                    format!("rule panicked: {}", panic_message(payload.as_ref())),
                )),
            }
        }
        evaluation
    }
}

/// Whether `distinct_row_count / row_count <= threshold`.
///
/// Never matches when either count is missing or the table is empty.
pub fn has_low_cardinality_ratio(props: &ColumnProperties, threshold: f64) -> bool {
    props
        .cardinality_ratio()
        .is_some_and(|ratio| ratio <= threshold)
}

/// Matches columns whose values repeat a lot.
///
/// A low distinct-to-row ratio is the signature of foreign keys and
/// categorical dimensions. The boundary is inclusive.
#[derive(Debug)]
pub struct LowCardinalityRatioRule {
    inner: ColumnMatcherRule,
}

impl LowCardinalityRatioRule {
    /// Create a rule producing definitive signals for columns at or below `threshold`.
    pub fn new(
        name: impl Into<String>,
        threshold: f64,
        type_node: InferenceSignalType,
        confidence: InferenceSignalConfidence,
    ) -> Self {
        let inner = ColumnMatcherRule::new(
            name,
            type_node,
            confidence,
            format!("Column cardinality ratio (distinct / rows) is at most {threshold}"),
            move |props| has_low_cardinality_ratio(props, threshold),
        );
        Self { inner }
    }

    /// Mark produced signals as complimentary.
    pub fn complimentary(mut self) -> Self {
        self.inner = self.inner.complimentary();
        self
    }

    pub fn match_column(&self, props: &ColumnProperties) -> bool {
        self.inner.match_column(props)
    }
}

impl InferenceRule for LowCardinalityRatioRule {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn process(&self, context: &DataWarehouseInferenceContext) -> RuleResult<Vec<InferenceSignal>> {
        self.inner.process(context)
    }

    fn evaluate(&self, context: &DataWarehouseInferenceContext) -> RuleEvaluation {
        self.inner.evaluate(context)
    }
}
