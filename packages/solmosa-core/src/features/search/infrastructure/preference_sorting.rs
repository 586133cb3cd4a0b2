//! Preference sorting and fast non-dominated sort
//!
//! Fronts are lists of indices into the population being sorted. Front 0
//! holds one champion per active target; the rest of the population is
//! ranked by classic non-dominated sorting on the active targets only.

use crate::features::genotype::{TestCase, UNRANKED};
use std::cmp::Ordering;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Split `tests` into fronts, assigning `rank` on every test
pub fn preference_sorting(tests: &mut [TestCase], active: &[usize], population_size: usize) -> Vec<Vec<usize>> {
    for test in tests.iter_mut() {
        test.rank = UNRANKED;
        test.subvector_distance = 0;
    }

    let mut champions: Vec<usize> = Vec::new();
    for &target in active {
        if let Some(best) = champion(tests, target) {
            if !champions.contains(&best) {
                champions.push(best);
            }
        }
    }
    for &c in &champions {
        tests[c].rank = 0;
    }

    let remaining: Vec<usize> = (0..tests.len()).filter(|i| !champions.contains(i)).collect();
    let mut fronts = vec![champions];

    if fronts[0].len() > population_size {
        // Champions alone fill the population; the rest is one tail front
        for &i in &remaining {
            tests[i].rank = 1;
        }
        fronts.push(remaining);
    } else {
        fronts.extend(fast_non_dominated_sort(tests, &remaining, active, 1));
    }

    fronts.retain(|f| !f.is_empty());
    fronts
}

/// Lowest distance on `target`, fewer calls on ties, first seen otherwise
fn champion(tests: &[TestCase], target: usize) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, test) in tests.iter().enumerate() {
        let better = match best {
            None => true,
            Some(b) => match test.distance(target).total_cmp(&tests[b].distance(target)) {
                Ordering::Less => true,
                Ordering::Equal => test.len() < tests[b].len(),
                Ordering::Greater => false,
            },
        };
        if better {
            best = Some(i);
        }
    }
    best
}

/// `p` is no worse than `q` on every active target and better on one
pub fn dominates(p: &TestCase, q: &TestCase, active: &[usize]) -> bool {
    let mut strictly_better = false;
    for &target in active {
        let (dp, dq) = (p.distance(target), q.distance(target));
        if dp > dq {
            return false;
        }
        if dp < dq {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Non-dominated fronts of `members`, ranked from `first_rank` upwards
pub fn fast_non_dominated_sort(
    tests: &mut [TestCase],
    members: &[usize],
    active: &[usize],
    first_rank: usize,
) -> Vec<Vec<usize>> {
    let view: &[TestCase] = tests;
    let relation = |&p: &usize| -> (Vec<usize>, usize) {
        let mut dominated = Vec::new();
        let mut dominators = 0;
        for (slot, &q) in members.iter().enumerate() {
            if p == q {
                continue;
            }
            if dominates(&view[p], &view[q], active) {
                dominated.push(slot);
            } else if dominates(&view[q], &view[p], active) {
                dominators += 1;
            }
        }
        (dominated, dominators)
    };

    #[cfg(feature = "parallel")]
    let relations: Vec<(Vec<usize>, usize)> = members.par_iter().map(relation).collect();
    #[cfg(not(feature = "parallel"))]
    let relations: Vec<(Vec<usize>, usize)> = members.iter().map(relation).collect();

    let mut counts: Vec<usize> = relations.iter().map(|(_, n)| *n).collect();
    let mut current: Vec<usize> = (0..members.len()).filter(|&s| counts[s] == 0).collect();
    let mut fronts = Vec::new();
    let mut rank = first_rank;

    while !current.is_empty() {
        let mut next = Vec::new();
        for &s in &current {
            for &d in &relations[s].0 {
                counts[d] -= 1;
                if counts[d] == 0 {
                    next.push(d);
                }
            }
        }
        let front: Vec<usize> = current.iter().map(|&s| members[s]).collect();
        for &i in &front {
            tests[i].rank = rank;
        }
        fronts.push(front);
        current = next;
        rank += 1;
    }
    fronts
}

/// For each front member, the number of peers better than it on some active target
pub fn subvector_distance(tests: &mut [TestCase], front: &[usize], active: &[usize]) {
    let distances: Vec<usize> = front
        .iter()
        .map(|&p| {
            front
                .iter()
                .filter(|&&q| q != p)
                .filter(|&&q| active.iter().any(|&t| tests[q].distance(t) < tests[p].distance(t)))
                .count()
        })
        .collect();
    for (&p, d) in front.iter().zip(distances) {
        tests[p].subvector_distance = d;
    }
}
