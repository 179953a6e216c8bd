use ordered_float::OrderedFloat;

use crate::data::transition::CorpusTransition;
use crate::error::SrmError;

pub const DEFAULT_BUCKET_SIZE: usize = 1024;

/// A contiguous Q1 slice of the corpus, re-sorted by Q3 for binary search.
#[derive(Debug, Clone)]
struct Bucket {
    q1_min: f64,
    q1_max: f64,
    entries: Vec<CorpusTransition>,
}

/// Two-level range index over the (Q1, Q3) plane of a background transition
/// corpus.
///
/// The corpus is sorted by Q1 once and chunked into fixed-size buckets, each
/// bucket keeps its Q1 bounds and holds its entries sorted by Q3. A window
/// query binary-searches the bucket bounds on Q1, then binary-searches Q3
/// inside each overlapping bucket; only the two boundary buckets need a
/// per-entry Q1 check. Query cost is O(log n + k) in the result size plus a
/// bucket-sized boundary term.
///
/// The index is built once and never mutated, queries take `&self` and any
/// number of workers may search it concurrently. A corpus change requires a
/// rebuild.
#[derive(Debug, Clone)]
pub struct TransitionIndex {
    buckets: Vec<Bucket>,
    q1_keys: Vec<f64>,
    size: usize,
}

impl TransitionIndex {
    /// Bulk-builds the index with the default bucket size.
    pub fn build(corpus: Vec<CorpusTransition>) -> Result<Self, SrmError> {
        Self::build_with_bucket_size(corpus, DEFAULT_BUCKET_SIZE)
    }

    /// Bulk-builds the index. The corpus must be non-empty and every Q1, Q3
    /// and retention time value must be finite, otherwise no index is
    /// exposed.
    pub fn build_with_bucket_size(
        mut corpus: Vec<CorpusTransition>,
        bucket_size: usize,
    ) -> Result<Self, SrmError> {
        if corpus.is_empty() {
            return Err(SrmError::IndexBuild {
                reason: "empty corpus".to_string(),
            });
        }
        if bucket_size == 0 {
            return Err(SrmError::IndexBuild {
                reason: "bucket size must be positive".to_string(),
            });
        }
        for entry in &corpus {
            if !entry.q1.is_finite() || !entry.q3.is_finite() || !entry.ssrcalc.is_finite() {
                return Err(SrmError::IndexBuild {
                    reason: format!(
                        "non-finite mass values for peptide {}",
                        entry.peptide_id
                    ),
                });
            }
        }

        corpus.sort_by_key(|e| {
            (
                OrderedFloat(e.q1),
                OrderedFloat(e.q3),
                e.peptide_id,
                e.charge,
            )
        });
        let size = corpus.len();
        let q1_keys: Vec<f64> = corpus.iter().map(|e| e.q1).collect();

        let mut buckets = Vec::with_capacity(size.div_ceil(bucket_size));
        for chunk in corpus.chunks(bucket_size) {
            let q1_min = chunk.first().map(|e| e.q1).unwrap_or(f64::NAN);
            let q1_max = chunk.last().map(|e| e.q1).unwrap_or(f64::NAN);
            let mut entries = chunk.to_vec();
            entries.sort_by_key(|e| (OrderedFloat(e.q3), e.peptide_id, e.charge));
            buckets.push(Bucket {
                q1_min,
                q1_max,
                entries,
            });
        }

        log::info!(
            "built transition index over {} transitions in {} buckets",
            size,
            buckets.len()
        );

        Ok(TransitionIndex {
            buckets,
            q1_keys,
            size,
        })
    }

    /// Number of indexed transitions.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Smallest and largest indexed Q1.
    pub fn q1_bounds(&self) -> (f64, f64) {
        (self.q1_keys[0], self.q1_keys[self.size - 1])
    }

    /// Returns every transition inside the axis-aligned window, bounds
    /// inclusive on all four edges. A degenerate window (lo > hi on either
    /// axis) yields an empty result. The output order is deterministic:
    /// ascending by bucket Q1, then by Q3 within each bucket.
    pub fn query(&self, q1_lo: f64, q1_hi: f64, q3_lo: f64, q3_hi: f64) -> Vec<CorpusTransition> {
        let mut hits = Vec::new();
        if q1_lo > q1_hi || q3_lo > q3_hi {
            return hits;
        }

        let first = self.buckets.partition_point(|b| b.q1_max < q1_lo);
        for bucket in &self.buckets[first..] {
            if bucket.q1_min > q1_hi {
                break;
            }
            let start = bucket.entries.partition_point(|e| e.q3 < q3_lo);
            let end = bucket.entries.partition_point(|e| e.q3 <= q3_hi);
            if q1_lo <= bucket.q1_min && bucket.q1_max <= q1_hi {
                // the whole bucket lies inside the Q1 window
                hits.extend_from_slice(&bucket.entries[start..end]);
            } else {
                hits.extend(
                    bucket.entries[start..end]
                        .iter()
                        .filter(|e| e.q1 >= q1_lo && e.q1 <= q1_hi)
                        .cloned(),
                );
            }
        }
        hits
    }

    /// Number of corpus transitions with Q1 inside [lo, hi], computed from
    /// the sorted Q1 keys. Used for partition sizing.
    pub fn count_in_q1_range(&self, q1_lo: f64, q1_hi: f64) -> usize {
        if q1_lo > q1_hi {
            return 0;
        }
        let lower = self.q1_keys.partition_point(|&q| q < q1_lo);
        let upper = self.q1_keys.partition_point(|&q| q <= q1_hi);
        upper - lower
    }

    /// The ascending Q1 keys inside [lo, hi].
    pub fn q1_keys_in_range(&self, q1_lo: f64, q1_hi: f64) -> &[f64] {
        if q1_lo > q1_hi {
            return &[];
        }
        let lower = self.q1_keys.partition_point(|&q| q < q1_lo);
        let upper = self.q1_keys.partition_point(|&q| q <= q1_hi);
        &self.q1_keys[lower..upper]
    }
}
