use crate::features::genotype::TestCase;
use tracing::debug;

/// Shortest known covering test per CDG edge
///
/// Slots only ever go from empty to filled, and a filled slot is only
/// replaced by a test with fewer calls.
#[derive(Debug, Clone, Default)]
pub struct Archive {
    slots: Vec<Option<TestCase>>,
}

impl Archive {
    pub fn new(targets: usize) -> Self {
        Self {
            slots: vec![None; targets],
        }
    }

    /// Archive covering tests from `tests`; returns the number of newly covered targets
    pub fn update(&mut self, tests: &[TestCase], relevant: &[bool]) -> usize {
        let mut newly_covered = 0;
        for (target, slot) in self.slots.iter_mut().enumerate() {
            if !relevant.get(target).copied().unwrap_or(false) {
                continue;
            }
            let best = tests
                .iter()
                .filter(|t| t.covers(target))
                .min_by_key(|t| t.len());
            let Some(best) = best else {
                continue;
            };
            match slot {
                None => {
                    debug!(target, calls = best.len(), "target covered");
                    *slot = Some(best.clone());
                    newly_covered += 1;
                }
                Some(current) if best.len() < current.len() => {
                    debug!(target, from = current.len(), to = best.len(), "shorter covering test archived");
                    *slot = Some(best.clone());
                }
                Some(_) => {}
            }
        }
        newly_covered
    }

    pub fn slot(&self, target: usize) -> Option<&TestCase> {
        self.slots.get(target).and_then(Option::as_ref)
    }

    pub fn is_covered(&self, target: usize) -> bool {
        self.slot(target).is_some()
    }

    pub fn covered_count(&self, relevant: &[bool]) -> usize {
        (0..self.slots.len())
            .filter(|&t| relevant.get(t).copied().unwrap_or(false) && self.is_covered(t))
            .count()
    }

    /// True if every relevant target has a covering test
    pub fn is_complete(&self, relevant: &[bool]) -> bool {
        (0..self.slots.len()).all(|t| !relevant.get(t).copied().unwrap_or(false) || self.is_covered(t))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn into_slots(self) -> Vec<Option<TestCase>> {
        self.slots
    }
}
