//! Relevant and active targets

use super::archive::Archive;
use crate::features::cdg::ControlDependencyGraph;
use crate::features::flow_graph::{DISPATCHER, FALLBACK};
use crate::features::genotype::TestCase;
use crate::shared::opcodes::CALLVALUE;
use std::collections::BTreeSet;

/// Edges worth covering, fixed once per contract
///
/// Edges into the dispatcher or fallback, edges touching an ignored
/// method, and edges into revert stubs are irrelevant. The revert of a
/// payable method's `msg.value` guard stays a target.
pub fn relevant_targets(
    cdg: &ControlDependencyGraph,
    payable_methods: &BTreeSet<String>,
    ignored_methods: &[String],
) -> Vec<bool> {
    let ignored = |method: &str| ignored_methods.iter().any(|m| m == method);

    cdg.edges()
        .iter()
        .map(|edge| {
            let start = cdg.node(edge.start);
            let end = cdg.node(edge.end);
            if end.method() == DISPATCHER || end.method() == FALLBACK {
                return false;
            }
            if ignored(start.method()) || ignored(end.method()) {
                return false;
            }
            if end.is_revert_terminated() {
                let value_guard = payable_methods.contains(end.method())
                    && start.last_block().is_some_and(|b| b.contains_opcode(CALLVALUE));
                return value_guard;
            }
            true
        })
        .collect()
}

/// Targets that steer preference sorting this generation
///
/// Relevant, not yet archived, and reached by some test with a distance
/// in `(0, 1]`.
pub fn active_targets(tests: &[TestCase], relevant: &[bool], archive: &Archive) -> Vec<usize> {
    relevant
        .iter()
        .enumerate()
        .filter(|&(target, &is_relevant)| is_relevant && !archive.is_covered(target))
        .filter(|&(target, _)| {
            tests.iter().any(|t| {
                let d = t.distance(target);
                d > 0.0 && d <= 1.0
            })
        })
        .map(|(target, _)| target)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::genotype::{MethodCall, MethodKind, MethodSpec};
    use alloy_primitives::{Address, U256};

    fn scored(distances: Vec<f64>) -> TestCase {
        let spec = MethodSpec::new("constructor", vec![], false, MethodKind::Constructor);
        let mut tc = TestCase::new(vec![MethodCall::new(&spec, vec![], Address::ZERO, U256::ZERO)]);
        tc.distance_vector = Some(distances);
        tc
    }

    #[test]
    fn test_active_targets_need_reached_distance() {
        let tests = vec![scored(vec![0.5, 2.0, 0.0, 1.0]), scored(vec![3.0, 4.0, 0.3, f64::INFINITY])];
        let relevant = [true, true, true, false];
        let mut archive = Archive::new(4);
        assert_eq!(active_targets(&tests, &relevant, &archive), vec![0, 2]);

        archive.update(&tests, &relevant);
        assert_eq!(active_targets(&tests, &relevant, &archive), vec![0]);
    }
}
