use crate::features::genotype::domain::TestCase;
use rand::Rng;

/// Single-point crossover with one fractional cut applied to both parents
///
/// The cut never falls before the constructor, so both children start
/// with a constructor call. Children are always fresh test cases.
pub fn crossover<R: Rng + ?Sized>(first: &TestCase, second: &TestCase, rng: &mut R) -> (TestCase, TestCase) {
    let alpha: f64 = rng.gen();
    let cut_first = cut_point(alpha, first.len());
    let cut_second = cut_point(alpha, second.len());

    let head_first = &first.calls()[..cut_first];
    let tail_first = &first.calls()[cut_first..];
    let head_second = &second.calls()[..cut_second];
    let tail_second = &second.calls()[cut_second..];

    let child_first = TestCase::new(head_first.iter().chain(tail_second).cloned().collect());
    let child_second = TestCase::new(head_second.iter().chain(tail_first).cloned().collect());
    (child_first, child_second)
}

fn cut_point(alpha: f64, len: usize) -> usize {
    ((alpha * len as f64).floor() as usize).max(1).min(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::genotype::domain::{MethodCall, MethodKind, MethodSpec};
    use alloy_primitives::{Address, U256};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_case(names: &[&str]) -> TestCase {
        TestCase::new(
            names
                .iter()
                .map(|name| {
                    let kind = if *name == "constructor" { MethodKind::Constructor } else { MethodKind::Function };
                    MethodCall::new(&MethodSpec::new(*name, vec![], false, kind), vec![], Address::ZERO, U256::ZERO)
                })
                .collect(),
        )
    }

    #[test]
    fn test_single_call_parents_are_reproduced() {
        let first = test_case(&["constructor"]);
        let second = test_case(&["constructor"]);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            let (a, b) = crossover(&first, &second, &mut rng);
            assert!(a.same_calls(&first));
            assert!(b.same_calls(&second));
        }
    }

    #[test]
    fn test_children_keep_constructor_and_calls() {
        let first = test_case(&["constructor", "a", "b", "c"]);
        let second = test_case(&["constructor", "x", "y"]);
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..50 {
            let (a, b) = crossover(&first, &second, &mut rng);
            assert_eq!(a.calls()[0].method, "constructor");
            assert_eq!(b.calls()[0].method, "constructor");
            assert_eq!(a.len() + b.len(), first.len() + second.len());
            assert!(!a.is_scored() && !b.is_scored());
        }
    }

    #[test]
    fn test_cut_point_bounds() {
        assert_eq!(cut_point(0.0, 4), 1);
        assert_eq!(cut_point(0.5, 4), 2);
        assert_eq!(cut_point(0.999, 4), 3);
        assert_eq!(cut_point(0.3, 1), 1);
    }
}
