use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::error::SrmError;
use crate::index::range_index::TransitionIndex;

/// Splits a Q1 range into sub-ranges of roughly `max_per_chunk` corpus
/// transitions each, sampled from the index's sorted Q1 keys. The first
/// chunk starts at `q1_lo` and the last chunk ends at `q1_hi`. Each chunk
/// can then be processed by an independent worker against the shared index.
///
/// An empty range or a range without corpus transitions is reported as an
/// error, not retried.
pub fn partition_q1_range(
    index: &TransitionIndex,
    q1_lo: f64,
    q1_hi: f64,
    max_per_chunk: usize,
) -> Result<Vec<(f64, f64)>, SrmError> {
    if max_per_chunk == 0 {
        return Err(SrmError::Partition {
            reason: "chunk size must be positive".to_string(),
        });
    }
    if q1_lo > q1_hi {
        return Err(SrmError::Partition {
            reason: format!("degenerate Q1 range [{}, {}]", q1_lo, q1_hi),
        });
    }
    let keys = index.q1_keys_in_range(q1_lo, q1_hi);
    if keys.is_empty() {
        return Err(SrmError::Partition {
            reason: format!("no corpus transitions in Q1 range [{}, {}]", q1_lo, q1_hi),
        });
    }

    let mut bounds = vec![q1_lo];
    let mut rank = max_per_chunk;
    while rank < keys.len() {
        bounds.push(keys[rank]);
        rank += max_per_chunk;
    }
    bounds.push(q1_hi);

    let ranges: Vec<(f64, f64)> = bounds.windows(2).map(|w| (w[0], w[1])).collect();
    log::info!(
        "partitioned Q1 range [{}, {}] into {} chunks of <= {} transitions",
        q1_lo,
        q1_hi,
        ranges.len(),
        max_per_chunk
    );
    Ok(ranges)
}

/// Outcome of one partition run.
#[derive(Debug)]
pub struct PartitionReport<T> {
    pub q1_lo: f64,
    pub q1_hi: f64,
    pub elapsed: Duration,
    pub outcome: Result<T, SrmError>,
}

/// Runs a worker over every partition on the rayon pool.
///
/// Failures stay confined to their partition: a worker error is recorded in
/// that partition's report and the siblings keep running. A partition whose
/// worker finished but blew the time budget is reported as timed out, the
/// caller may resubmit it with a smaller chunk size.
pub fn process_partitions<T, F>(
    ranges: &[(f64, f64)],
    budget: Option<Duration>,
    worker: F,
) -> Vec<PartitionReport<T>>
where
    T: Send,
    F: Fn(f64, f64) -> Result<T, SrmError> + Sync,
{
    ranges
        .par_iter()
        .map(|&(q1_lo, q1_hi)| {
            let started = Instant::now();
            let mut outcome = worker(q1_lo, q1_hi);
            let elapsed = started.elapsed();
            if let Some(budget) = budget {
                if elapsed > budget && outcome.is_ok() {
                    outcome = Err(SrmError::PartitionTimeout {
                        q1_lo,
                        q1_hi,
                        budget_ms: budget.as_millis() as u64,
                    });
                }
            }
            if let Err(ref error) = outcome {
                log::warn!("partition [{}, {}] failed: {}", q1_lo, q1_hi, error);
            }
            PartitionReport {
                q1_lo,
                q1_hi,
                elapsed,
                outcome,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::transition::CorpusTransition;

    fn index_with_q1s(q1s: &[f64]) -> TransitionIndex {
        let corpus: Vec<CorpusTransition> = q1s
            .iter()
            .enumerate()
            .map(|(i, &q1)| CorpusTransition::new(i as i64, 2, q1, 300.0, 0.0))
            .collect();
        TransitionIndex::build(corpus).unwrap()
    }

    #[test]
    fn test_partition_bounds_are_pinned() {
        let q1s: Vec<f64> = (0..10).map(|i| 500.0 + i as f64).collect();
        let index = index_with_q1s(&q1s);

        let ranges = partition_q1_range(&index, 400.0, 1400.0, 4).unwrap();
        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges[0].0, 400.0);
        assert_eq!(ranges[2].1, 1400.0);
        // interior bounds sit on sampled corpus Q1 values
        assert_eq!(ranges[0].1, 504.0);
        assert_eq!(ranges[1].1, 508.0);
        // chunks tile the range
        assert_eq!(ranges[0].1, ranges[1].0);
        assert_eq!(ranges[1].1, ranges[2].0);
    }

    #[test]
    fn test_single_chunk_when_range_is_small() {
        let index = index_with_q1s(&[500.0, 501.0]);
        let ranges = partition_q1_range(&index, 400.0, 1400.0, 100).unwrap();
        assert_eq!(ranges, vec![(400.0, 1400.0)]);
    }

    #[test]
    fn test_empty_range_is_reported() {
        let index = index_with_q1s(&[500.0]);
        assert!(matches!(
            partition_q1_range(&index, 600.0, 700.0, 10),
            Err(SrmError::Partition { .. })
        ));
        assert!(matches!(
            partition_q1_range(&index, 700.0, 600.0, 10),
            Err(SrmError::Partition { .. })
        ));
        assert!(matches!(
            partition_q1_range(&index, 400.0, 700.0, 0),
            Err(SrmError::Partition { .. })
        ));
    }

    #[test]
    fn test_failures_stay_confined_to_their_partition() {
        let ranges = vec![(400.0, 500.0), (500.0, 600.0), (600.0, 700.0)];
        let reports = process_partitions(&ranges, None, |q1_lo, _| {
            if q1_lo == 500.0 {
                Err(SrmError::Partition {
                    reason: "malformed peptide".to_string(),
                })
            } else {
                Ok(q1_lo as i64)
            }
        });

        assert_eq!(reports.len(), 3);
        let failed: Vec<f64> = reports
            .iter()
            .filter(|r| r.outcome.is_err())
            .map(|r| r.q1_lo)
            .collect();
        assert_eq!(failed, vec![500.0]);
    }

    #[test]
    fn test_blown_budget_is_reported_as_timeout() {
        let ranges = vec![(400.0, 500.0)];
        let reports = process_partitions(&ranges, Some(Duration::ZERO), |_, _| {
            std::thread::sleep(Duration::from_millis(5));
            Ok(())
        });
        assert!(matches!(
            reports[0].outcome,
            Err(SrmError::PartitionTimeout { .. })
        ));
    }
}
