//! Property-based tests for the statistics engine
//!
//! - Test aggregation invariants over arbitrary session lists
//! - Run with ProptestConfig::with_cases(100)

use judgment_analytics::session::{
    Condition, ConditionId, Judgment, SessionRecord, TrialRecord,
};
use judgment_analytics::stats::StatisticsEngine;
use judgment_analytics::{AnalyticsConfig, ParticipantMergePolicy};
use proptest::prelude::*;

// ============================================================================
// Property Test Generators (Strategies)
// ============================================================================

fn arb_condition() -> impl Strategy<Value = Option<Condition>> {
    prop_oneof![
        4 => prop::sample::select(ConditionId::ALL.to_vec())
            .prop_map(|id| Some(Condition::Known(id))),
        1 => Just(Some(Condition::Unknown("filler".to_string()))),
        1 => Just(None),
    ]
}

fn arb_judgment() -> impl Strategy<Value = Option<Judgment>> {
    prop_oneof![
        3 => Just(Some(Judgment::Grammatical)),
        3 => Just(Some(Judgment::Ungrammatical)),
        1 => Just(None),
    ]
}

/// Valid times dominate; zero, negative and missing values still occur.
fn arb_response_time() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        6 => (1.0f64..20_000.0).prop_map(Some),
        1 => Just(Some(0.0)),
        1 => (-500.0f64..0.0).prop_map(Some),
        1 => Just(None),
    ]
}

fn arb_trial() -> impl Strategy<Value = TrialRecord> {
    (
        arb_condition(),
        arb_judgment(),
        arb_judgment(),
        arb_response_time(),
    )
        .prop_map(|(condition, expected, response, rt)| {
            TrialRecord::builder()
                .condition(condition)
                .expected(expected)
                .response(response)
                .response_time_ms(rt)
                .build()
        })
}

/// Participant IDs come from a small pool so merges actually happen.
fn arb_session() -> impl Strategy<Value = SessionRecord> {
    (
        prop::sample::select(vec!["P1", "P2", "P3"]),
        prop::collection::vec(arb_trial(), 1..30),
    )
        .prop_map(|(id, trials)| SessionRecord::new(id, trials, format!("{id}.json")))
}

fn arb_sessions() -> impl Strategy<Value = Vec<SessionRecord>> {
    prop::collection::vec(arb_session(), 0..6)
}

fn arb_policy() -> impl Strategy<Value = ParticipantMergePolicy> {
    prop_oneof![
        Just(ParticipantMergePolicy::PerSession),
        Just(ParticipantMergePolicy::MergeById),
    ]
}

fn engine_config(policy: ParticipantMergePolicy, bin_width_ms: f64) -> AnalyticsConfig {
    AnalyticsConfig::builder()
        .merge_policy(policy)
        .histogram_bin_width_ms(bin_width_ms)
        .build()
        .unwrap()
}

fn all_trials(sessions: &[SessionRecord]) -> impl Iterator<Item = &TrialRecord> {
    sessions.iter().flat_map(|s| s.trials())
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: accuracy is recomputed from the expected/response pair
    #[test]
    fn prop_accuracy_matches_recomputed_correct_count(sessions in arb_sessions()) {
        let stats = StatisticsEngine::new(&sessions).global_stats();

        let total = all_trials(&sessions).count();
        let correct = all_trials(&sessions)
            .filter(|t| matches!((t.expected(), t.response()), (Some(e), Some(r)) if e == r))
            .count();

        prop_assert_eq!(stats.total_trials, total);
        prop_assert_eq!(stats.total_participants, sessions.len());
        if total == 0 {
            prop_assert!(stats.accuracy_pct.abs() < f64::EPSILON);
        } else {
            #[allow(clippy::cast_precision_loss)]
            let expected = 100.0 * correct as f64 / total as f64;
            prop_assert!((stats.accuracy_pct - expected).abs() < 1e-9);
        }
    }

    /// Property: mean response time only sees valid (> 0) times
    #[test]
    fn prop_mean_uses_valid_response_times(sessions in arb_sessions()) {
        let stats = StatisticsEngine::new(&sessions).global_stats();
        let valid: Vec<f64> = all_trials(&sessions)
            .filter_map(TrialRecord::valid_response_time_ms)
            .collect();

        if valid.is_empty() {
            prop_assert!(stats.avg_response_time_ms.abs() < f64::EPSILON);
        } else {
            #[allow(clippy::cast_precision_loss)]
            let expected = valid.iter().sum::<f64>() / valid.len() as f64;
            prop_assert!((stats.avg_response_time_ms - expected).abs() < 1e-6);
            prop_assert!(stats.avg_response_time_ms > 0.0);
        }
    }

    /// Property: conditions without trials are omitted, order is fixed
    #[test]
    fn prop_condition_stats_cover_present_conditions(sessions in arb_sessions()) {
        let stats = StatisticsEngine::new(&sessions).condition_stats();

        let present: Vec<ConditionId> = ConditionId::ALL
            .into_iter()
            .filter(|id| all_trials(&sessions).any(|t| t.condition_id() == Some(*id)))
            .collect();
        let reported: Vec<ConditionId> = stats.iter().map(|s| s.condition).collect();

        prop_assert_eq!(reported, present);
        prop_assert!(stats.iter().all(|s| s.trials > 0));
    }

    /// Property: a single-condition trial set yields one condition entry
    #[test]
    fn prop_single_condition_yields_one_entry(
        trials in prop::collection::vec(
            (arb_judgment(), arb_judgment(), arb_response_time()),
            1..40,
        )
    ) {
        let trials = trials
            .into_iter()
            .map(|(expected, response, rt)| {
                TrialRecord::builder()
                    .condition(Some(Condition::Known(ConditionId::SimpleNonAmbiguous)))
                    .expected(expected)
                    .response(response)
                    .response_time_ms(rt)
                    .build()
            })
            .collect();
        let sessions = vec![SessionRecord::new("P1", trials, "p1.json")];

        let stats = StatisticsEngine::new(&sessions).condition_stats();
        prop_assert_eq!(stats.len(), 1);
        prop_assert_eq!(stats[0].condition, ConditionId::SimpleNonAmbiguous);
    }

    /// Property: each learning curve ends at its participant's accuracy
    #[test]
    fn prop_learning_curve_ends_at_participant_accuracy(
        sessions in arb_sessions(),
        policy in arb_policy(),
    ) {
        let config = engine_config(policy, 500.0);
        let engine = StatisticsEngine::with_config(&sessions, &config);
        let curves = engine.learning_curves();
        let participants = engine.participant_stats();

        prop_assert_eq!(curves.len(), participants.len());
        for (curve, row) in curves.iter().zip(&participants) {
            prop_assert_eq!(&curve.participant_id, &row.participant_id);
            prop_assert_eq!(curve.points.len(), row.total_trials);
            prop_assert_eq!(curve.final_accuracy_pct(), Some(row.accuracy_pct));
            prop_assert!(curve.points.iter().all(|p| (0.0..=100.0).contains(p)));
        }
    }

    /// Property: histogram counts sum to the number of valid response times
    #[test]
    fn prop_histogram_covers_valid_response_times(
        sessions in arb_sessions(),
        policy in arb_policy(),
        bin_width_ms in 10.0f64..2_000.0,
    ) {
        let config = engine_config(policy, bin_width_ms);
        let histogram = StatisticsEngine::with_config(&sessions, &config).response_time_histogram();
        let valid = all_trials(&sessions)
            .filter(|t| t.valid_response_time_ms().is_some())
            .count();

        prop_assert_eq!(histogram.total(), valid);
        prop_assert!(histogram.bins.len() <= judgment_analytics::config::MAX_HISTOGRAM_BINS);
        for series in &histogram.series {
            prop_assert_eq!(series.counts.len(), histogram.bins.len());
        }
        for pair in histogram.bins.windows(2) {
            prop_assert!((pair[0].end_ms - pair[1].start_ms).abs() < 1e-6);
        }
    }

    /// Property: identical input gives byte-identical output
    #[test]
    fn prop_report_is_deterministic(sessions in arb_sessions(), policy in arb_policy()) {
        let config = engine_config(policy, 250.0);
        let first = serde_json::to_string(&StatisticsEngine::with_config(&sessions, &config).report()).unwrap();
        let second = serde_json::to_string(&StatisticsEngine::with_config(&sessions, &config).report()).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Property: merging never changes the global totals
    #[test]
    fn prop_merge_policy_preserves_totals(sessions in arb_sessions()) {
        let per_session = engine_config(ParticipantMergePolicy::PerSession, 500.0);
        let merged = engine_config(ParticipantMergePolicy::MergeById, 500.0);

        let rows = StatisticsEngine::with_config(&sessions, &per_session).participant_stats();
        let merged_rows = StatisticsEngine::with_config(&sessions, &merged).participant_stats();

        prop_assert_eq!(rows.len(), sessions.len());
        prop_assert!(merged_rows.len() <= rows.len());
        prop_assert_eq!(
            rows.iter().map(|r| r.total_trials).sum::<usize>(),
            merged_rows.iter().map(|r| r.total_trials).sum::<usize>()
        );
        prop_assert_eq!(
            merged_rows.iter().map(|r| r.sessions).sum::<usize>(),
            sessions.len()
        );
    }

    /// Property: diagonal plus one off-diagonal cell gives the row's trial count
    #[test]
    fn prop_confusion_rows_split_correct_and_incorrect(sessions in arb_sessions()) {
        let engine = StatisticsEngine::new(&sessions);
        let confusion = engine.confusion_counts();
        let conditions = engine.condition_stats();

        for stats in &conditions {
            let row = stats.condition;
            let other = ConditionId::ALL
                .into_iter()
                .find(|id| *id != row)
                .unwrap();
            prop_assert_eq!(confusion.correct(row) + confusion.cell(row, other), stats.trials);
        }
    }
}

#[test]
fn test_empty_input_yields_zeroed_global_stats() {
    let sessions: Vec<SessionRecord> = Vec::new();
    let stats = StatisticsEngine::new(&sessions).global_stats();
    assert_eq!(stats.total_trials, 0);
    assert_eq!(stats.total_participants, 0);
    assert!(stats.accuracy_pct.abs() < f64::EPSILON);
    assert!(stats.avg_response_time_ms.abs() < f64::EPSILON);
}

#[test]
fn test_store_order_matters_for_curves() {
    let correct = TrialRecord::new(
        1,
        ConditionId::AmbiguousEasy,
        Judgment::Grammatical,
        Some(Judgment::Grammatical),
        500.0,
    );
    let wrong = TrialRecord::new(
        2,
        ConditionId::AmbiguousEasy,
        Judgment::Grammatical,
        Some(Judgment::Ungrammatical),
        500.0,
    );

    let forward = vec![SessionRecord::new("P1", vec![correct.clone(), wrong.clone()], "a")];
    let reverse = vec![SessionRecord::new("P1", vec![wrong, correct], "a")];

    assert_eq!(
        StatisticsEngine::new(&forward).learning_curves()[0].points,
        vec![100.0, 50.0]
    );
    assert_eq!(
        StatisticsEngine::new(&reverse).learning_curves()[0].points,
        vec![0.0, 50.0]
    );
}
