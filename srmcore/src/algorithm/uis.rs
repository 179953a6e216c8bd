use std::collections::{BTreeMap, HashSet};

use itertools::Itertools;

use crate::data::transition::{PeptideId, Transition};
use crate::error::SrmError;
use crate::algorithm::interference::CandidateSet;
use crate::params::Tolerance;

/// Transition combinations are encoded as bits of a single integer, so at
/// most this many transitions can be searched at once.
pub const COMBINATION_LIMIT: usize = 64;

/// Result of the minimal unique ion signature search for one target.
///
/// `minimal_order` is the smallest subset size at which a unique signature
/// exists, `None` if none was found up to `searched_to`. The latter outcome
/// is a legitimate negative result, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UisResult {
    pub minimal_order: Option<usize>,
    /// All unique subsets of size `minimal_order`, each a sorted list of
    /// 0-based target transition indices, in ascending lexicographic order.
    pub minimal_subsets: Vec<Vec<usize>>,
    pub searched_to: usize,
}

/// Collapses a candidate set into one bit vector per interfering peptide:
/// bit i is set when any of the peptide's transitions matches target
/// transition i within the Q3 tolerance. Masks are returned in ascending
/// peptide id order, peptides with no Q3 match are dropped.
pub fn interference_masks(
    target_transitions: &[Transition],
    candidates: &CandidateSet,
    q3_window: &Tolerance,
) -> Result<Vec<u64>, SrmError> {
    if target_transitions.len() > COMBINATION_LIMIT {
        return Err(SrmError::TooManyTransitions {
            given: target_transitions.len(),
            limit: COMBINATION_LIMIT,
        });
    }

    let mut per_peptide: BTreeMap<PeptideId, u64> = BTreeMap::new();
    for hit in &candidates.hits {
        let mask = per_peptide.entry(hit.peptide_id).or_insert(0);
        for (i, transition) in target_transitions.iter().enumerate() {
            if q3_window.contains(transition.q3, hit.q3) {
                *mask |= 1 << i;
            }
        }
    }

    Ok(per_peptide.into_values().filter(|&m| m != 0).collect())
}

/// Finds the minimal unique ion signatures of a target peptide.
///
/// A subset of the target's transitions is non-unique if a single
/// interfering peptide matches every transition in it, a containment test on
/// the interferer's bit vector. Subsets are enumerated by increasing size so
/// the first size with any unique subset is the answer; searching stops
/// there.
///
/// With no interferers every single transition is trivially unique.
pub fn minimal_uis(
    target_transitions: &[Transition],
    candidates: &CandidateSet,
    q3_window: &Tolerance,
    max_uis: usize,
) -> Result<UisResult, SrmError> {
    let n = target_transitions.len();
    let masks = interference_masks(target_transitions, candidates, q3_window)?;
    let searched_to = max_uis.min(n);

    for order in 1..=searched_to {
        let unique: Vec<Vec<usize>> = (0..n)
            .combinations(order)
            .filter(|combination| {
                let subset = combination.iter().fold(0u64, |mask, &i| mask | 1 << i);
                !masks.iter().any(|&mask| mask & subset == subset)
            })
            .collect();
        if !unique.is_empty() {
            return Ok(UisResult {
                minimal_order: Some(order),
                minimal_subsets: unique,
                searched_to: order,
            });
        }
    }

    Ok(UisResult {
        minimal_order: None,
        minimal_subsets: Vec::new(),
        searched_to,
    })
}

/// Number of distinct non-unique transition combinations per order
/// 1..=`max_order`, enumerated from the interferer bit vectors instead of
/// the full combination space.
pub fn non_unique_counts(
    masks: &[u64],
    n_transitions: usize,
    max_order: usize,
) -> Result<Vec<usize>, SrmError> {
    if n_transitions > COMBINATION_LIMIT {
        return Err(SrmError::TooManyTransitions {
            given: n_transitions,
            limit: COMBINATION_LIMIT,
        });
    }

    let mut counts = Vec::with_capacity(max_order);
    for order in 1..=max_order {
        let mut seen: HashSet<u64> = HashSet::new();
        for &mask in masks {
            let bits: Vec<usize> = (0..n_transitions).filter(|&i| mask & 1 << i != 0).collect();
            if bits.len() < order {
                continue;
            }
            for combination in bits.into_iter().combinations(order) {
                let subset = combination.iter().fold(0u64, |m, &i| m | 1 << i);
                seen.insert(subset);
            }
        }
        counts.push(seen.len());
    }
    Ok(counts)
}

/// The minimal number of leading transitions, in the caller's preferred
/// order, that no single interferer matches completely. `None` when even the
/// full list is matched by some interferer.
pub fn min_needed_transitions(masks: &[u64], n_transitions: usize) -> Option<usize> {
    let mut max_overlap = 0;
    for &mask in masks {
        // length of the run of matched transitions starting at index 0
        let run = (!mask).trailing_zeros() as usize;
        if run > max_overlap {
            max_overlap = run;
        }
    }
    let needed = max_overlap + 1;
    if needed > n_transitions {
        None
    } else {
        Some(needed)
    }
}
