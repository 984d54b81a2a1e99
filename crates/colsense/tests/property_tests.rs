//! Property-based tests for Colsense.
//!
//! These tests use proptest to generate random warehouse statistics and
//! signal sets and check that inference keeps its invariants:
//!
//! 1. **No panics**: Rules and the solver never crash on any statistics
//! 2. **Determinism**: The same context always produces the same report
//! 3. **Order independence**: Shuffling a column's signals never changes its decision
//! 4. **Consistency**: The conflict relation is symmetric and irreflexive
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p colsense --test property_tests
//!
//! # More cases
//! PROPTEST_CASES=10000 cargo test -p colsense --test property_tests
//! ```

use proptest::prelude::*;

use colsense::rule::has_low_cardinality_ratio;
use colsense::{
    ColumnProperties, ColumnReference, ColumnType, ConflictResolver,
    DataWarehouseInferenceContext, InferenceRunner, InferenceSignal, InferenceSignalConfidence,
    InferenceSignalType, InferenceSolver, Ruleset, TableProperties,
};

// =============================================================================
// Test Strategies
// =============================================================================

fn signal_type() -> impl Strategy<Value = InferenceSignalType> {
    prop::sample::select(InferenceSignalType::ALL.to_vec())
}

fn confidence() -> impl Strategy<Value = InferenceSignalConfidence> {
    prop_oneof![
        Just(InferenceSignalConfidence::Low),
        Just(InferenceSignalConfidence::Medium),
        Just(InferenceSignalConfidence::High),
        Just(InferenceSignalConfidence::ForSure),
    ]
}

fn column_type() -> impl Strategy<Value = ColumnType> {
    prop_oneof![
        Just(ColumnType::Integer),
        Just(ColumnType::Float),
        Just(ColumnType::String),
        Just(ColumnType::Boolean),
        Just(ColumnType::DateTime),
        Just(ColumnType::Unknown),
    ]
}

/// Column names that sometimes trigger the name-based rules.
fn column_name() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,12}",
        "[a-z]{1,8}_id",
        Just("id".to_string()),
        Just("ds".to_string()),
        Just("created_at".to_string()),
    ]
}

/// Row counts with distinct counts that never exceed them, either possibly absent.
fn counts() -> impl Strategy<Value = (Option<u64>, Option<u64>)> {
    (0u64..10_000).prop_flat_map(|rows| {
        (
            prop::option::of(Just(rows)),
            prop::option::of(0..=rows),
        )
    })
}

fn table(name: String) -> impl Strategy<Value = TableProperties> {
    prop::collection::vec((column_name(), column_type(), counts()), 0..8).prop_map(
        move |columns| {
            columns.into_iter().fold(
                TableProperties::new(name.clone()),
                |table, (column, column_type, (rows, distinct))| {
                    let props = ColumnProperties {
                        column: ColumnReference::new(name.clone(), column),
                        column_type,
                        row_count: rows,
                        distinct_row_count: distinct,
                    };
                    table.with_properties(props)
                },
            )
        },
    )
}

fn context() -> impl Strategy<Value = DataWarehouseInferenceContext> {
    (table("orders".to_string()), table("users".to_string()))
        .prop_map(|(orders, users)| {
            DataWarehouseInferenceContext::new(vec![orders, users]).expect("valid context")
        })
}

fn signals() -> impl Strategy<Value = Vec<InferenceSignal>> {
    prop::collection::vec((signal_type(), confidence(), any::<bool>()), 0..10).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (type_node, confidence, is_complimentary))| {
                InferenceSignal::new(
                    ColumnReference::new("t", "c"),
                    type_node,
                    confidence,
                    is_complimentary,
                    format!("signal {i}"),
                )
            })
            .collect()
    })
}

// =============================================================================
// Type Hierarchy Properties
// =============================================================================

proptest! {
    #[test]
    fn conflict_is_symmetric(a in signal_type(), b in signal_type()) {
        prop_assert_eq!(
            InferenceSignalType::conflict(a, b),
            InferenceSignalType::conflict(b, a)
        );
    }

    #[test]
    fn conflict_is_irreflexive(a in signal_type()) {
        prop_assert!(!InferenceSignalType::conflict(a, a));
    }

    #[test]
    fn refinements_never_conflict(a in signal_type()) {
        for ancestor in a.ancestors() {
            prop_assert!(!InferenceSignalType::conflict(a, ancestor));
        }
    }
}

// =============================================================================
// Rule Properties
// =============================================================================

proptest! {
    #[test]
    fn ratio_rule_agrees_with_division(
        rows in 1u64..100_000,
        distinct_fraction in 0.0f64..=1.0,
        threshold in 0.0f64..=1.0,
    ) {
        let distinct = ((rows as f64) * distinct_fraction) as u64;
        let props = ColumnProperties::new(ColumnReference::new("t", "c"), ColumnType::Integer)
            .with_counts(rows, distinct);

        let expected = (distinct as f64 / rows as f64) <= threshold;
        prop_assert_eq!(has_low_cardinality_ratio(&props, threshold), expected);
    }

    #[test]
    fn ratio_rule_never_matches_empty_tables(threshold in 0.0f64..=1.0) {
        let props = ColumnProperties::new(ColumnReference::new("t", "c"), ColumnType::Integer)
            .with_counts(0, 0);
        prop_assert!(!has_low_cardinality_ratio(&props, threshold));
    }
}

// =============================================================================
// Solver Properties
// =============================================================================

proptest! {
    #[test]
    fn solver_never_panics_and_keeps_signals(signals in signals()) {
        let column = ColumnReference::new("t", "c");
        let decision = ConflictResolver.solve_column(&column, &signals);

        prop_assert_eq!(&decision.signals, &signals);
        prop_assert_eq!(decision.is_resolved(), decision.confidence.is_some());
    }

    #[test]
    fn solver_ignores_signal_order(
        (original, shuffled) in signals().prop_flat_map(|s| (Just(s.clone()), Just(s).prop_shuffle()))
    ) {
        let column = ColumnReference::new("t", "c");
        let a = ConflictResolver.solve_column(&column, &original);
        let b = ConflictResolver.solve_column(&column, &shuffled);

        prop_assert_eq!(a.resolution, b.resolution);
        prop_assert_eq!(a.confidence, b.confidence);
    }

    #[test]
    fn resolved_type_refines_some_definitive_signal(signals in signals()) {
        let column = ColumnReference::new("t", "c");
        let decision = ConflictResolver.solve_column(&column, &signals);

        let definitive: Vec<_> = signals.iter().filter(|s| s.is_definitive()).collect();
        if let (Some(resolved), false) = (decision.type_node(), definitive.is_empty()) {
            prop_assert!(definitive.iter().any(|s| resolved.refines(s.type_node)));
        }
    }
}

// =============================================================================
// Runner Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn runner_decides_every_column(context in context()) {
        let runner = InferenceRunner::new(Ruleset::default_rules()).unwrap();
        let report = runner.run(&context);

        prop_assert!(report.is_clean());
        prop_assert_eq!(report.decisions.len(), context.column_count());
        for column in context.columns().keys() {
            prop_assert!(report.decision(column).is_some());
        }
    }

    #[test]
    fn runner_is_deterministic(context in context()) {
        let runner = InferenceRunner::new(Ruleset::default_rules()).unwrap();
        prop_assert_eq!(runner.run(&context), runner.run(&context));
    }
}
