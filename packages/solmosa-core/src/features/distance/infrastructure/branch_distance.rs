//! Normalised branch distance
//!
//! Measures how far the comparison controlling an edge is from flipping.
//! A taken edge scores 0, an edge without a usable predicate or snapshot
//! scores 1, everything else lands strictly between.

use super::errors::ScoringError;
use crate::features::cdg::{CompactEdge, NodeIdx, PredicateKind};
use crate::features::execution::StackSnapshot;
use crate::features::genotype::infrastructure::numeric::u256_to_f64;
use alloy_primitives::{I256, U256};

/// `x / (x + 1)`
pub fn normalise(x: f64) -> Result<f64, ScoringError> {
    if x == -1.0 {
        return Err(ScoringError::NormaliseMinusOne);
    }
    Ok(x / (x + 1.0))
}

/// Distance of `edge` given the node actually reached after its start node
///
/// `reached` is `None` when the call left the graph (reverted into an
/// eliminated stub or ran out of trace). `segment` holds the snapshots
/// taken while executing the edge's start node.
pub fn branch_distance(
    edge: &CompactEdge,
    reached: Option<NodeIdx>,
    segment: &[StackSnapshot],
) -> Result<f64, ScoringError> {
    if reached == Some(edge.end) {
        return Ok(0.0);
    }
    let predicate = &edge.predicate;
    if predicate.is_none() {
        return Ok(1.0);
    }
    let Some(snapshot) = segment.iter().find(|s| s.pc == predicate.pc) else {
        return Ok(1.0);
    };
    let Some(s1) = snapshot.s1() else {
        return Ok(1.0);
    };
    let s1 = parse_word(s1, snapshot.pc)?;

    if predicate.kind == PredicateKind::IsZero {
        let flip = if s1.is_zero() { U256::from(1u8) } else { s1 };
        return normalise(u256_to_f64(flip));
    }

    let Some(s2) = snapshot.s2() else {
        return Ok(1.0);
    };
    let s2 = parse_word(s2, snapshot.pc)?;

    let flip = match predicate.kind {
        PredicateKind::Eq => {
            if s1 == s2 {
                return Ok(1.0);
            }
            abs_diff(s1, s2)
        }
        PredicateKind::Lt => comparison_flip(s1 < s2, abs_diff(s1, s2)),
        PredicateKind::Gt => comparison_flip(s1 > s2, abs_diff(s1, s2)),
        PredicateKind::Slt => {
            let (a, b) = (I256::from_raw(s1), I256::from_raw(s2));
            comparison_flip(a < b, signed_abs_diff(a, b))
        }
        PredicateKind::Sgt => {
            let (a, b) = (I256::from_raw(s1), I256::from_raw(s2));
            comparison_flip(a > b, signed_abs_diff(a, b))
        }
        PredicateKind::IsZero | PredicateKind::None => return Ok(1.0),
    };
    normalise(u256_to_f64(flip))
}

/// Amount the operands must move to change the comparison outcome
fn comparison_flip(holds: bool, diff: U256) -> U256 {
    if holds {
        diff
    } else {
        diff.saturating_add(U256::from(1u8))
    }
}

fn abs_diff(a: U256, b: U256) -> U256 {
    if a >= b {
        a - b
    } else {
        b - a
    }
}

fn signed_abs_diff(a: I256, b: I256) -> U256 {
    if a >= b {
        a.into_raw().wrapping_sub(b.into_raw())
    } else {
        b.into_raw().wrapping_sub(a.into_raw())
    }
}

fn parse_word(value: &str, pc: usize) -> Result<U256, ScoringError> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    U256::from_str_radix(digits, 16).map_err(|_| ScoringError::MalformedStackValue {
        pc,
        value: value.to_string(),
    })
}
