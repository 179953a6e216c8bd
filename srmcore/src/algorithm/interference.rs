use ordered_float::OrderedFloat;

use crate::chemistry::constants::MASS_DIFF_C13;
use crate::data::peptide::Peptide;
use crate::data::transition::{CorpusTransition, PeptideId, Transition};
use crate::index::range_index::TransitionIndex;
use crate::params::SearchParams;

/// The interfering corpus transitions found for one target peptide, the
/// union over all its transitions' window queries, deduplicated and in a
/// deterministic order. Recomputed per target, never shared.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    pub hits: Vec<CorpusTransition>,
}

impl CandidateSet {
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Distinct interfering peptide ids, ascending.
    pub fn peptide_ids(&self) -> Vec<PeptideId> {
        let mut ids: Vec<PeptideId> = self.hits.iter().map(|h| h.peptide_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

/// Finds all background transitions interfering with a target peptide.
///
/// For every target transition the index is queried over the Q1 x Q3 window
/// around its coordinates, with the lower Q1 edge widened so that heavier
/// C13 isotopologues of a background precursor are not missed. Hits are then
/// dropped in order: wrong isotope position, the target itself, precursor
/// charge outside the configured set, retention time outside the window.
///
/// This is a pure read + filter pipeline over an immutable index, safe to
/// run concurrently for many targets.
pub fn find_interferers(
    target: &Peptide,
    target_transitions: &[Transition],
    index: &TransitionIndex,
    params: &SearchParams,
) -> CandidateSet {
    let isotope_shift = params.max_isotopes as f64 * MASS_DIFF_C13;
    let mut hits = Vec::new();

    for transition in target_transitions {
        let (q1_lo, q1_hi) = params.q1_window.bounds(transition.q1);
        let (q3_lo, q3_hi) = params.q3_window.bounds(transition.q3);

        for hit in index.query(q1_lo - isotope_shift, q1_hi, q3_lo, q3_hi) {
            if !isotope_accepted(&hit, q1_lo, q1_hi, params.max_isotopes) {
                continue;
            }
            if params.exclude_self && hit.peptide_id == target.id {
                continue;
            }
            if !params.interferer_charges.is_empty()
                && !params.interferer_charges.contains(&hit.charge)
            {
                continue;
            }
            if let Some(window) = params.ssrcalc_window {
                if (hit.ssrcalc - target.ssrcalc).abs() > window / 2.0 {
                    continue;
                }
            }
            hits.push(hit);
        }
    }

    hits.sort_by_key(|h| {
        (
            h.peptide_id,
            OrderedFloat(h.q1),
            OrderedFloat(h.q3),
            h.charge,
        )
    });
    hits.dedup_by_key(|h| {
        (
            h.peptide_id,
            OrderedFloat(h.q1),
            OrderedFloat(h.q3),
            h.charge,
        )
    });

    CandidateSet { hits }
}

/// A hit is kept if any of its first `max_isotopes` C13 isotope peaks falls
/// inside the undilated Q1 window. With `max_isotopes` of zero this is the
/// plain window test.
fn isotope_accepted(
    hit: &CorpusTransition,
    q1_lo: f64,
    q1_hi: f64,
    max_isotopes: usize,
) -> bool {
    let charge = hit.charge.max(1) as f64;
    (0..=max_isotopes).any(|isotope| {
        let shifted = hit.q1 + isotope as f64 * MASS_DIFF_C13 / charge;
        shifted >= q1_lo && shifted <= q1_hi
    })
}
