//! Replay of executed traces against the fixture CDG

mod common;

use alloy_primitives::U256;
use common::*;
use solmosa_core::features::cdg::build_cdg;
use solmosa_core::{ApproachLevelMatrix, CallResult, ControlDependencyGraph, FitnessEvaluator, ScoringError, StackSnapshot};
use std::collections::BTreeSet;

fn fixture() -> (ControlDependencyGraph, ApproachLevelMatrix) {
    let cdg = build_cdg("Threshold", &threshold_cfg(), &BTreeSet::new()).unwrap();
    let matrix = ApproachLevelMatrix::compute(&cdg);
    (cdg, matrix)
}

fn deployed() -> CallResult {
    CallResult::executed(vec![StackSnapshot::new(0, vec![])])
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

#[test]
fn test_taken_branch_scores_zero() {
    let (cdg, matrix) = fixture();
    let evaluator = FitnessEvaluator::new(&cdg, &matrix);

    let results = vec![deployed(), CallResult::executed(check_trace(U256::from(10u8)))];
    let distances = evaluator.distance_vector(&results).unwrap();

    assert_eq!(distances[EDGE_TO_FALLBACK], 1.0);
    assert_eq!(distances[EDGE_TO_CHECK], 0.0);
    assert_eq!(distances[EDGE_X_ABOVE_FIVE], 0.0);
    // x - 5 = 5 away from flipping
    assert!(close(distances[EDGE_X_AT_MOST_FIVE], 5.0 / 6.0));
}

#[test]
fn test_false_branch_needs_one_more_step() {
    let (cdg, matrix) = fixture();
    let evaluator = FitnessEvaluator::new(&cdg, &matrix);

    let results = vec![deployed(), CallResult::executed(check_trace(U256::from(3u8)))];
    let distances = evaluator.distance_vector(&results).unwrap();

    assert!(close(distances[EDGE_X_ABOVE_FIVE], 0.75));
    assert_eq!(distances[EDGE_X_AT_MOST_FIVE], 0.0);

    let boundary = vec![deployed(), CallResult::executed(check_trace(U256::from(5u8)))];
    let distances = evaluator.distance_vector(&boundary).unwrap();
    assert!(close(distances[EDGE_X_ABOVE_FIVE], 0.5));
}

#[test]
fn test_minimum_is_kept_across_calls() {
    let (cdg, matrix) = fixture();
    let evaluator = FitnessEvaluator::new(&cdg, &matrix);

    let results = vec![
        deployed(),
        CallResult::executed(check_trace(U256::from(100u8))),
        CallResult::executed(check_trace(U256::from(7u8))),
    ];
    let distances = evaluator.distance_vector(&results).unwrap();
    assert!(close(distances[EDGE_X_AT_MOST_FIVE], 2.0 / 3.0));
}

#[test]
fn test_reverted_guard_leaves_branches_unresolved() {
    let (cdg, matrix) = fixture();
    let evaluator = FitnessEvaluator::new(&cdg, &matrix);

    let results = vec![deployed(), CallResult::executed(reverted_check_trace())];
    let distances = evaluator.distance_vector(&results).unwrap();

    assert_eq!(distances[EDGE_TO_CHECK], 0.0);
    assert_eq!(distances[EDGE_X_ABOVE_FIVE], 1.0);
    assert_eq!(distances[EDGE_X_AT_MOST_FIVE], 1.0);
}

#[test]
fn test_fallback_call_uses_approach_level() {
    let (cdg, matrix) = fixture();
    let evaluator = FitnessEvaluator::new(&cdg, &matrix);

    let results = vec![deployed(), CallResult::executed(fallback_trace())];
    let distances = evaluator.distance_vector(&results).unwrap();

    assert_eq!(distances[EDGE_TO_FALLBACK], 0.0);
    // selector 0x2 vs 0x1
    assert_eq!(distances[EDGE_TO_CHECK], 0.5);
    assert_eq!(distances[EDGE_X_ABOVE_FIVE], 1.0);
    assert_eq!(distances[EDGE_X_AT_MOST_FIVE], 1.0);
}

#[test]
fn test_unscored_calls_leave_everything_unreached() {
    let (cdg, matrix) = fixture();
    let evaluator = FitnessEvaluator::new(&cdg, &matrix);

    let results = vec![
        deployed(),
        CallResult::OutOfEther,
        CallResult::PassTime,
        CallResult::executed(vec![]),
    ];
    let distances = evaluator.distance_vector(&results).unwrap();
    assert!(distances.iter().all(|d| d.is_infinite()));
}

#[test]
fn test_trace_must_start_at_pc_zero() {
    let (cdg, matrix) = fixture();
    let evaluator = FitnessEvaluator::new(&cdg, &matrix);

    let mut trace = check_trace(U256::from(1u8));
    trace.remove(0);
    let err = evaluator
        .distance_vector(&[deployed(), CallResult::executed(trace)])
        .unwrap_err();
    assert_eq!(err, ScoringError::TraceStartsMidway { call: 1, pc: 2 });
}
