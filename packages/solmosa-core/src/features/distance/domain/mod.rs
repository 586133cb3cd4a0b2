//! Approach-level matrix

/// `E × E` matrix of approach levels between CDG edges
///
/// `get(reached, target)` is the number of CDG hops from the end of the
/// traversed edge `reached` to the start of `target`, capped by the
/// target's depth below the root. The diagonal holds that depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproachLevelMatrix {
    size: usize,
    /// Row-major, row = reached edge
    levels: Vec<usize>,
}

impl ApproachLevelMatrix {
    pub fn from_rows(rows: Vec<Vec<usize>>) -> Self {
        let size = rows.len();
        debug_assert!(rows.iter().all(|r| r.len() == size));
        Self {
            size,
            levels: rows.into_iter().flatten().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn get(&self, reached: usize, target: usize) -> usize {
        self.levels[reached * self.size + target]
    }

    /// Depth of the target edge's start node below the root
    pub fn max_level(&self, target: usize) -> usize {
        self.get(target, target)
    }

    pub fn row(&self, reached: usize) -> &[usize] {
        &self.levels[reached * self.size..(reached + 1) * self.size]
    }
}
