use super::node::NodeIdx;
use super::predicate::Predicate;
use serde::Serialize;
use std::hash::{Hash, Hasher};

/// Dominator edge `start → end` carrying the predicate of `start`
///
/// Identity is the endpoint pair: edges with the same endpoints are equal
/// and hash alike whatever their predicate.
#[derive(Debug, Clone, Serialize)]
pub struct CompactEdge {
    pub start: NodeIdx,
    pub end: NodeIdx,
    pub predicate: Predicate,
}

impl CompactEdge {
    pub fn new(start: NodeIdx, end: NodeIdx, predicate: Predicate) -> Self {
        Self {
            start,
            end,
            predicate,
        }
    }
}

impl PartialEq for CompactEdge {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl Eq for CompactEdge {}

impl Hash for CompactEdge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::cdg::domain::PredicateKind;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;

    fn hash_of(edge: &CompactEdge) -> u64 {
        let mut hasher = DefaultHasher::new();
        edge.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_identity_ignores_predicate() {
        let a = CompactEdge::new(1, 4, Predicate::new(PredicateKind::Lt, 30, 1));
        let b = CompactEdge::new(1, 4, Predicate::new(PredicateKind::IsZero, 41, 1));
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_direction_matters() {
        let p = Predicate::none(0, 0);
        assert_ne!(CompactEdge::new(1, 2, p.clone()), CompactEdge::new(2, 1, p));
    }
}
