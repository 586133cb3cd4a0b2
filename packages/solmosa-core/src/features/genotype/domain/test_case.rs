use super::method_call::MethodCall;

/// Rank of a test case that has not been sorted yet
pub const UNRANKED: usize = usize::MAX;

/// Genotype: a constructor call followed by method calls
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    calls: Vec<MethodCall>,
    /// One distance per CDG edge, set after scoring
    pub distance_vector: Option<Vec<f64>>,
    pub return_values: Vec<String>,
    /// Non-dominated front index
    pub rank: usize,
    pub subvector_distance: usize,
}

impl TestCase {
    pub fn new(calls: Vec<MethodCall>) -> Self {
        Self {
            calls,
            distance_vector: None,
            return_values: Vec::new(),
            rank: UNRANKED,
            subvector_distance: 0,
        }
    }

    pub fn calls(&self) -> &[MethodCall] {
        &self.calls
    }

    /// Replace the call sequence and forget any fitness computed for the old one
    pub fn set_calls(&mut self, calls: Vec<MethodCall>) {
        self.calls = calls;
        self.reset_fitness();
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Distance on edge `target`, infinite when unscored
    pub fn distance(&self, target: usize) -> f64 {
        self.distance_vector
            .as_ref()
            .and_then(|d| d.get(target).copied())
            .unwrap_or(f64::INFINITY)
    }

    pub fn covers(&self, target: usize) -> bool {
        self.distance(target) == 0.0
    }

    pub fn is_scored(&self) -> bool {
        self.distance_vector.is_some()
    }

    pub fn same_calls(&self, other: &TestCase) -> bool {
        self.calls == other.calls
    }

    pub fn reset_fitness(&mut self) {
        self.distance_vector = None;
        self.return_values.clear();
        self.rank = UNRANKED;
        self.subvector_distance = 0;
    }

    pub fn method_names(&self) -> Vec<String> {
        self.calls.iter().map(|c| c.method.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::genotype::domain::{MethodSpec, MethodKind};
    use alloy_primitives::{Address, U256};

    fn call(name: &str) -> MethodCall {
        let kind = if name == "constructor" { MethodKind::Constructor } else { MethodKind::Function };
        MethodCall::new(&MethodSpec::new(name, vec![], false, kind), vec![], Address::ZERO, U256::ZERO)
    }

    #[test]
    fn test_unscored_distance_is_infinite() {
        let tc = TestCase::new(vec![call("constructor")]);
        assert_eq!(tc.rank, UNRANKED);
        assert!(tc.distance(0).is_infinite());
        assert!(!tc.covers(0));
    }

    #[test]
    fn test_set_calls_resets_fitness() {
        let mut tc = TestCase::new(vec![call("constructor")]);
        tc.distance_vector = Some(vec![0.0, 0.5]);
        tc.rank = 0;
        assert!(tc.covers(0));

        tc.set_calls(vec![call("constructor"), call("f")]);
        assert!(!tc.is_scored());
        assert_eq!(tc.rank, UNRANKED);
        assert_eq!(tc.method_names(), vec!["constructor", "f"]);
    }
}
