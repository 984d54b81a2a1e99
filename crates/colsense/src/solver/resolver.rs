//! Reduces a column's signals to a single decision.

use std::fmt::Debug;

use super::decision::{ColumnDecision, Resolution, UnresolvedReason};
use crate::context::ColumnReference;
use crate::signal::{InferenceSignal, InferenceSignalType};

/// Turns the signals gathered for one column into a decision.
pub trait InferenceSolver: Send + Sync + Debug {
    /// Resolve one column. `signals` holds every signal for the column in emission order.
    fn solve_column(&self, column: &ColumnReference, signals: &[InferenceSignal]) -> ColumnDecision;
}

/// Resolves columns using the type hierarchy's conflict relation.
///
/// Definitive signals decide; complimentary signals support or refine.
///
/// 1. Complimentary signals that conflict with any definitive signal are dropped.
/// 2. Definitive signals are taken tier by tier, most confident first. A
///    signal that conflicts with evidence already accepted is overruled. If
///    the top tier contradicts itself the column is unresolved.
/// 3. The most specific accepted type is the base decision. Remaining
///    complimentary signals that refine it may deepen it, using the same
///    tiered acceptance.
///
/// Without definitive evidence, mutually compatible complimentary signals
/// resolve to the most confident one; contradictory ones leave the column
/// unresolved. Nothing is ever decided by signal order alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictResolver;

impl ConflictResolver {
    pub fn new() -> Self {
        Self
    }
}

impl InferenceSolver for ConflictResolver {
    fn solve_column(&self, column: &ColumnReference, signals: &[InferenceSignal]) -> ColumnDecision {
        let mut decision =
            ColumnDecision::unresolved(column.clone(), UnresolvedReason::NoSignals, signals.to_vec());

        if signals.is_empty() {
            decision
                .problems
                .push("No rule produced a signal for this column".to_string());
            return decision;
        }

        let (definitive, complimentary): (Vec<&InferenceSignal>, Vec<&InferenceSignal>) =
            signals.iter().partition(|signal| signal.is_definitive());

        if definitive.is_empty() {
            resolve_complimentary_only(&mut decision, signals, &complimentary);
        } else {
            resolve_with_definitive(&mut decision, signals, &definitive, &complimentary);
        }

        decision
    }
}

/// Signals accepted while walking confidence tiers.
#[derive(Default)]
struct Chain<'a> {
    /// Pairwise compatible signals, so they all lie on one path of the hierarchy.
    accepted: Vec<&'a InferenceSignal>,
    /// Conflicted with something accepted at a higher tier.
    overruled: Vec<&'a InferenceSignal>,
    /// The tier at which equally confident signals disagreed, if any.
    tied: Vec<&'a InferenceSignal>,
}

/// Accept signals from the most confident tier down, stopping at the first tier that contradicts itself.
fn walk_tiers<'a>(signals: &[&'a InferenceSignal]) -> Chain<'a> {
    let mut tiers: Vec<_> = signals.iter().map(|signal| signal.confidence).collect();
    tiers.sort_unstable_by(|a, b| b.cmp(a));
    tiers.dedup();

    let mut chain = Chain::default();
    for tier in tiers {
        let (fits, overruled): (Vec<&InferenceSignal>, Vec<&InferenceSignal>) = signals
            .iter()
            .copied()
            .filter(|signal| signal.confidence == tier)
            .partition(|signal| chain.accepted.iter().all(|a| !a.conflicts_with(signal)));
        chain.overruled.extend(overruled);

        if pairwise_compatible(&fits) {
            chain.accepted.extend(fits);
        } else {
            chain.tied = fits;
            break;
        }
    }
    chain
}

fn pairwise_compatible(signals: &[&InferenceSignal]) -> bool {
    signals
        .iter()
        .enumerate()
        .all(|(i, a)| signals[i + 1..].iter().all(|b| !a.conflicts_with(b)))
}

/// Deepest type, then highest confidence, then first emitted.
fn most_specific<'a>(signals: &[&'a InferenceSignal]) -> Option<&'a InferenceSignal> {
    signals.iter().copied().reduce(|best, signal| {
        let key = (signal.type_node.depth(), signal.confidence);
        if key > (best.type_node.depth(), best.confidence) {
            signal
        } else {
            best
        }
    })
}

/// Highest confidence, then deepest type, then first emitted.
fn most_confident<'a>(signals: &[&'a InferenceSignal]) -> Option<&'a InferenceSignal> {
    signals.iter().copied().reduce(|best, signal| {
        let key = (signal.confidence, signal.type_node.depth());
        if key > (best.confidence, best.type_node.depth()) {
            signal
        } else {
            best
        }
    })
}

fn describe(signal: &InferenceSignal) -> String {
    format!(
        "{} ({}, {} confidence)",
        signal.type_node,
        signal.reason,
        signal.confidence.label()
    )
}

fn describe_all(signals: &[&InferenceSignal]) -> String {
    signals
        .iter()
        .map(|signal| describe(signal))
        .collect::<Vec<_>>()
        .join(" vs ")
}

fn contains(signals: &[&InferenceSignal], signal: &InferenceSignal) -> bool {
    signals.iter().any(|s| std::ptr::eq(*s, signal))
}

/// Fill in the resolved type and the reasons that support it.
fn resolve_to(
    decision: &mut ColumnDecision,
    all: &[InferenceSignal],
    winner: &InferenceSignal,
    excluded: &[&InferenceSignal],
) {
    let final_type: InferenceSignalType = winner.type_node;
    decision.resolution = Resolution::Resolved(final_type);
    decision.confidence = Some(winner.confidence);
    decision.reasons = all
        .iter()
        .filter(|signal| final_type.refines(signal.type_node) && !contains(excluded, signal))
        .map(|signal| signal.reason.clone())
        .collect();
}

fn resolve_complimentary_only(
    decision: &mut ColumnDecision,
    all: &[InferenceSignal],
    complimentary: &[&InferenceSignal],
) {
    if !pairwise_compatible(complimentary) {
        decision.resolution = Resolution::Unresolved(UnresolvedReason::ConflictingComplementary);
        decision.problems.push(format!(
            "Complimentary signals disagree and no definitive signal settles them: {}",
            describe_all(complimentary)
        ));
        return;
    }

    if let Some(winner) = most_confident(complimentary) {
        resolve_to(decision, all, winner, &[]);
    }
}

fn resolve_with_definitive(
    decision: &mut ColumnDecision,
    all: &[InferenceSignal],
    definitive: &[&InferenceSignal],
    complimentary: &[&InferenceSignal],
) {
    let (discarded, supporting): (Vec<&InferenceSignal>, Vec<&InferenceSignal>) = complimentary
        .iter()
        .copied()
        .partition(|c| definitive.iter().any(|d| d.conflicts_with(c)));

    for signal in &discarded {
        decision.problems.push(format!(
            "Ignored complimentary {}: contradicted by definitive evidence",
            describe(signal)
        ));
    }

    let chain = walk_tiers(definitive);
    for signal in &chain.overruled {
        decision
            .problems
            .push(format!("Overruled {}", describe(signal)));
    }

    let Some(base) = most_specific(&chain.accepted) else {
        decision.resolution = Resolution::Unresolved(UnresolvedReason::TiedDefinitive);
        decision.problems.push(format!(
            "Equally confident definitive signals disagree: {}",
            describe_all(&chain.tied)
        ));
        return;
    };

    if !chain.tied.is_empty() {
        decision.problems.push(format!(
            "Stopped refining at {}: equally confident signals disagree: {}",
            base.type_node,
            describe_all(&chain.tied)
        ));
    }

    let refinements: Vec<&InferenceSignal> = supporting
        .iter()
        .copied()
        .filter(|signal| signal.type_node.is_descendant_of(base.type_node))
        .collect();
    let refined = walk_tiers(&refinements);

    for signal in &refined.overruled {
        decision
            .problems
            .push(format!("Overruled complimentary {}", describe(signal)));
    }
    if !refined.tied.is_empty() {
        decision.problems.push(format!(
            "Complimentary refinements of {} disagree: {}",
            base.type_node,
            describe_all(&refined.tied)
        ));
    }

    let winner = most_specific(&refined.accepted).unwrap_or(base);
    resolve_to(decision, all, winner, &discarded);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::InferenceSignalConfidence as C;
    use crate::signal::InferenceSignalType as T;

    fn column() -> ColumnReference {
        ColumnReference::new("table", "col")
    }

    fn definitive(type_node: T, confidence: C, reason: &str) -> InferenceSignal {
        InferenceSignal::new(column(), type_node, confidence, false, reason)
    }

    fn complimentary(type_node: T, confidence: C, reason: &str) -> InferenceSignal {
        InferenceSignal::new(column(), type_node, confidence, true, reason)
    }

    fn solve(signals: &[InferenceSignal]) -> ColumnDecision {
        ConflictResolver.solve_column(&column(), signals)
    }

    #[test]
    fn test_empty_signals_are_unresolved() {
        let decision = solve(&[]);

        assert_eq!(
            decision.resolution,
            Resolution::Unresolved(UnresolvedReason::NoSignals)
        );
        assert!(decision.signals.is_empty());
        assert!(decision.confidence.is_none());
        assert_eq!(decision.problems.len(), 1);
    }

    #[test]
    fn test_follow_signal_path() {
        let signals = [
            definitive(T::IdUnique, C::High, "UNIQUE"),
            definitive(T::IdPrimary, C::ForSure, "PRIMARY"),
        ];

        let decision = solve(&signals);

        assert_eq!(decision.type_node(), Some(T::IdPrimary));
        assert_eq!(decision.reasons, vec!["UNIQUE", "PRIMARY"]);
    }

    #[test]
    fn test_prefers_most_specific_compatible_definitive() {
        let signals = [
            definitive(T::IdPrimary, C::ForSure, "PRIMARY"),
            definitive(T::IdUnknown, C::ForSure, "ID"),
        ];

        let decision = solve(&signals);

        assert_eq!(decision.type_node(), Some(T::IdPrimary));
        assert_eq!(decision.confidence, Some(C::ForSure));
        assert!(decision.problems.is_empty());
    }

    #[test]
    fn test_complimentary_refines_definitive_parent() {
        let signals = [
            definitive(T::IdUnknown, C::High, "ID"),
            complimentary(T::IdUnique, C::ForSure, "UNIQUE"),
            complimentary(T::IdPrimary, C::ForSure, "PRIMARY"),
        ];

        let decision = solve(&signals);

        assert_eq!(decision.type_node(), Some(T::IdPrimary));
        assert_eq!(decision.reasons, vec!["ID", "UNIQUE", "PRIMARY"]);
    }

    #[test]
    fn test_definitive_overrides_conflicting_complimentary() {
        let signals = [
            definitive(T::DimensionCategorical, C::Medium, "CATEG_DIM"),
            complimentary(T::IdUnique, C::ForSure, "UNIQUE"),
            complimentary(T::IdPrimary, C::ForSure, "PRIMARY"),
        ];

        let decision = solve(&signals);

        assert_eq!(decision.type_node(), Some(T::DimensionCategorical));
        assert_eq!(decision.reasons, vec!["CATEG_DIM"]);
        assert_eq!(decision.problems.len(), 2);
    }

    #[test]
    fn test_conflicting_definitive_resolved_by_confidence() {
        let signals = [
            definitive(T::IdForeign, C::High, "FOREIGN"),
            definitive(T::IdPrimary, C::ForSure, "PRIMARY"),
        ];

        let decision = solve(&signals);

        assert_eq!(decision.type_node(), Some(T::IdPrimary));
        assert!(decision.problems[0].contains("ID.FOREIGN"));
    }

    #[test]
    fn test_equally_confident_contradiction_is_unresolved() {
        let signals = [
            definitive(T::IdForeign, C::High, "FOREIGN"),
            definitive(T::IdPrimary, C::High, "PRIMARY"),
        ];

        let decision = solve(&signals);

        assert_eq!(
            decision.resolution,
            Resolution::Unresolved(UnresolvedReason::TiedDefinitive)
        );
        assert!(decision.confidence.is_none());
        assert!(decision.problems[0].contains("ID.FOREIGN"));
        assert!(decision.problems[0].contains("ID.PRIMARY"));
        assert_eq!(decision.signals.len(), 2);
    }

    #[test]
    fn test_stop_at_internal_node_if_trail_stops() {
        let signals = [
            definitive(T::IdUnknown, C::High, "KEY"),
            definitive(T::IdUnique, C::High, "UNIQUE"),
        ];

        let decision = solve(&signals);

        assert_eq!(decision.type_node(), Some(T::IdUnique));
        assert_eq!(decision.reasons, vec!["KEY", "UNIQUE"]);
    }

    #[test]
    fn test_agreeing_complimentary_signals_resolve() {
        let signals = [
            complimentary(T::DimensionCategorical, C::Medium, "STRING"),
            complimentary(T::DimensionCategorical, C::Medium, "LOW_CARDINALITY"),
        ];

        let decision = solve(&signals);

        assert_eq!(decision.type_node(), Some(T::DimensionCategorical));
        assert_eq!(decision.confidence, Some(C::Medium));
        assert!(decision.needs_review());
    }

    #[test]
    fn test_compatible_complimentary_takes_most_confident() {
        let signals = [
            complimentary(T::IdPrimary, C::Low, "PRIMARY"),
            complimentary(T::IdUnique, C::High, "UNIQUE"),
        ];

        let decision = solve(&signals);

        assert_eq!(decision.type_node(), Some(T::IdUnique));
        assert_eq!(decision.confidence, Some(C::High));
    }

    #[test]
    fn test_conflicting_complimentary_signals_are_unresolved() {
        let signals = [
            complimentary(T::DimensionCategorical, C::Medium, "INTEGER"),
            complimentary(T::MeasureUnknown, C::Medium, "INTEGER"),
        ];

        let decision = solve(&signals);

        assert_eq!(
            decision.resolution,
            Resolution::Unresolved(UnresolvedReason::ConflictingComplementary)
        );
    }

    #[test]
    fn test_tied_complimentary_refinements_keep_base() {
        let signals = [
            definitive(T::IdUnknown, C::ForSure, "ID"),
            complimentary(T::IdForeign, C::Medium, "FOREIGN"),
            complimentary(T::IdUnique, C::Medium, "UNIQUE"),
        ];

        let decision = solve(&signals);

        assert_eq!(decision.type_node(), Some(T::IdUnknown));
        assert_eq!(decision.confidence, Some(C::ForSure));
        assert!(decision.problems[0].contains("disagree"));
    }

    #[test]
    fn test_lower_tier_refines_accepted_chain() {
        let signals = [
            definitive(T::DimensionTime, C::ForSure, "TIME"),
            definitive(T::MeasureUnknown, C::Medium, "REAL"),
            definitive(T::DimensionPrimaryTime, C::High, "ONLY_TIME"),
        ];

        let decision = solve(&signals);

        assert_eq!(decision.type_node(), Some(T::DimensionPrimaryTime));
        assert_eq!(decision.confidence, Some(C::High));
        assert_eq!(decision.problems.len(), 1);
        assert!(decision.problems[0].contains("MEASURE.UNKNOWN"));
    }

    #[test]
    fn test_signal_order_does_not_matter() {
        let mut signals = vec![
            definitive(T::IdUnknown, C::ForSure, "ID"),
            definitive(T::IdPrimary, C::ForSure, "PRIMARY"),
            complimentary(T::IdUnique, C::ForSure, "UNIQUE"),
            complimentary(T::MeasureUnknown, C::Medium, "INTEGER"),
            complimentary(T::DimensionCategorical, C::Medium, "INTEGER"),
        ];

        let forward = solve(&signals);
        signals.reverse();
        let backward = solve(&signals);

        assert_eq!(forward.resolution, backward.resolution);
        assert_eq!(forward.confidence, backward.confidence);
    }
}
