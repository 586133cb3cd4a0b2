//! Trace replay
//!
//! Walks each call's trace through the CDG, scoring every edge that
//! leaves a node the call passed through, then fills unreached edges with
//! their approach level from the closest traversed edge.

use super::branch_distance::branch_distance;
use super::errors::ScoringError;
use crate::features::cdg::{ControlDependencyGraph, NodeIdx};
use crate::features::distance::domain::ApproachLevelMatrix;
use crate::features::execution::{CallResult, StackSnapshot};
use crate::features::genotype::TestCase;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Scores executed test cases against every CDG edge
pub struct FitnessEvaluator<'a> {
    cdg: &'a ControlDependencyGraph,
    approach_levels: &'a ApproachLevelMatrix,
}

/// Replay state shared by all calls of one test case
struct Replay {
    scores: Vec<f64>,
    traversed: BTreeSet<usize>,
    visited: Vec<bool>,
}

impl<'a> FitnessEvaluator<'a> {
    pub fn new(cdg: &'a ControlDependencyGraph, approach_levels: &'a ApproachLevelMatrix) -> Self {
        Self { cdg, approach_levels }
    }

    /// Score `test_case` from its call results, storing distances and return values
    pub fn evaluate(&self, test_case: &mut TestCase, results: &[CallResult]) -> Result<(), ScoringError> {
        if results.len() != test_case.len() {
            return Err(ScoringError::CallCountMismatch {
                expected: test_case.len(),
                received: results.len(),
            });
        }
        test_case.distance_vector = Some(self.distance_vector(results)?);
        test_case.return_values = results.iter().map(CallResult::return_value).collect();
        Ok(())
    }

    /// Distance on every edge; the constructor result at index 0 is not scored
    pub fn distance_vector(&self, results: &[CallResult]) -> Result<Vec<f64>, ScoringError> {
        let mut replay = Replay {
            scores: vec![f64::INFINITY; self.cdg.edge_count()],
            traversed: BTreeSet::new(),
            visited: vec![false; self.cdg.nodes().len()],
        };

        for (call, result) in results.iter().enumerate().skip(1) {
            match result {
                CallResult::Executed { trace, .. } => {
                    if trace.is_empty() {
                        warn!(call, "executor returned an empty trace, skipping call");
                        continue;
                    }
                    self.replay_call(call, trace, &mut replay)?;
                }
                CallResult::OutOfEther => {
                    warn!(call, "sender ran out of ether, call not scored");
                }
                CallResult::PassTime | CallResult::PassBlocks => {
                    debug!(call, "pseudo-call not scored");
                }
            }
        }

        self.fill_unreached(replay)
    }

    fn replay_call(&self, call: usize, trace: &[StackSnapshot], replay: &mut Replay) -> Result<(), ScoringError> {
        if trace[0].pc != 0 {
            return Err(ScoringError::TraceStartsMidway {
                call,
                pc: trace[0].pc,
            });
        }

        let mut current = self.cdg.root();
        let mut i = 0;
        loop {
            let node = self.cdg.node(current);
            if node.is_terminal() {
                return Ok(());
            }
            let Some(last) = node.last_block() else {
                return Ok(());
            };
            let in_last = |pc: usize| pc >= last.start_pc && pc <= last.end_pc;

            let entered = i;
            while i < trace.len() && !in_last(trace[i].pc) {
                i += 1;
            }
            while i < trace.len() && in_last(trace[i].pc) {
                i += 1;
            }
            let segment = &trace[entered..i];
            replay.visited[current] = true;

            let next = trace.get(i).and_then(|s| self.cdg.node_landing_at(s.pc));
            let Some(next) = next else {
                debug!(
                    call,
                    node = %node.id,
                    pc = trace.get(i).map(|s| s.pc),
                    "call left the graph"
                );
                self.score_outgoing(current, None, segment, replay)?;
                return Ok(());
            };
            if next == current {
                return Err(ScoringError::SelfLoop {
                    node: node.id.to_string(),
                });
            }

            self.score_outgoing(current, Some(next), segment, replay)?;
            for &e in self.cdg.edges_into(next) {
                if replay.visited[self.cdg.edge(e).start] {
                    replay.scores[e] = 0.0;
                }
                if replay.scores[e] == 0.0 {
                    replay.traversed.insert(e);
                }
            }
            current = next;
        }
    }

    fn score_outgoing(
        &self,
        node: NodeIdx,
        next: Option<NodeIdx>,
        segment: &[StackSnapshot],
        replay: &mut Replay,
    ) -> Result<(), ScoringError> {
        for &e in self.cdg.edges_from(node) {
            let edge = self.cdg.edge(e);
            let distance = branch_distance(edge, next, segment)?;
            replay.scores[e] = replay.scores[e].min(distance);
            if Some(edge.end) == next {
                replay.traversed.insert(e);
            }
        }
        Ok(())
    }

    fn fill_unreached(&self, replay: Replay) -> Result<Vec<f64>, ScoringError> {
        let Replay {
            mut scores,
            traversed,
            ..
        } = replay;

        if traversed.is_empty() {
            return Ok(scores);
        }
        for (target, score) in scores.iter_mut().enumerate() {
            if score.is_finite() {
                continue;
            }
            let level = traversed
                .iter()
                .map(|&reached| self.approach_levels.get(reached, target))
                .min()
                .unwrap_or(usize::MAX);
            if level == 0 {
                return Err(ScoringError::ZeroApproachLevel { edge: target });
            }
            *score = level as f64;
        }
        Ok(scores)
    }
}
