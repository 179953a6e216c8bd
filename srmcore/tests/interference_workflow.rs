use srmcore::algorithm::fragmentation::target_transitions;
use srmcore::algorithm::interference::find_interferers;
use srmcore::algorithm::partition::{partition_q1_range, process_partitions};
use srmcore::algorithm::uis::{
    interference_masks, min_needed_transitions, minimal_uis, non_unique_counts,
};
use srmcore::chemistry::residues::ResidueTable;
use srmcore::data::peptide::Peptide;
use srmcore::data::transition::{CorpusTransition, Transition};
use srmcore::index::range_index::TransitionIndex;
use srmcore::params::{SearchParams, Tolerance};

fn setup() -> (Peptide, Vec<Transition>, TransitionIndex, SearchParams) {
    let table = ResidueTable::monoisotopic();
    let params = SearchParams {
        q1_window: Tolerance::Da(0.7),
        q3_window: Tolerance::Da(1.0),
        ..SearchParams::default()
    };

    let target = Peptide::new(1, "AAAAEIAVK", 2, 20.0).unwrap();
    let all = target_transitions(&target, &params, &table).unwrap();
    let targets: Vec<Transition> = all[..5].to_vec();
    let q1 = targets[0].q1;

    // an interferer sharing the Q1/Q3 windows of the first two transitions
    // and a second background peptide far outside the Q1 window
    let corpus = vec![
        CorpusTransition::new(2, 2, q1 + 0.1, targets[0].q3 + 0.2, 20.0),
        CorpusTransition::new(2, 2, q1 + 0.1, targets[1].q3 - 0.2, 20.0),
        CorpusTransition::new(2, 2, q1 + 0.1, 800.0, 20.0),
        CorpusTransition::new(3, 2, q1 + 200.0, targets[0].q3, 20.0),
        CorpusTransition::new(3, 2, q1 + 200.0, targets[2].q3, 20.0),
    ];
    let index = TransitionIndex::build(corpus).unwrap();
    (target, targets, index, params)
}

#[test]
fn test_end_to_end_minimal_uis() {
    let (target, targets, index, params) = setup();

    let candidates = find_interferers(&target, &targets, &index, &params);
    assert_eq!(candidates.peptide_ids(), vec![2]);

    let result = minimal_uis(&targets, &candidates, &params.q3_window, params.max_uis).unwrap();
    assert_eq!(result.minimal_order, Some(1));
    // any single transition the interferer does not reproduce is a signature
    assert_eq!(result.minimal_subsets, vec![vec![2], vec![3], vec![4]]);
}

#[test]
fn test_end_to_end_interference_orders() {
    let (target, targets, index, params) = setup();
    let candidates = find_interferers(&target, &targets, &index, &params);
    let masks = interference_masks(&targets, &candidates, &params.q3_window).unwrap();
    assert_eq!(masks, vec![0b00011]);

    // the interferer reproduces the first two transitions, a third is needed
    assert_eq!(min_needed_transitions(&masks, targets.len()), Some(3));

    let counts = non_unique_counts(&masks, targets.len(), 3).unwrap();
    assert_eq!(counts, vec![2, 1, 0]);
}

#[test]
fn test_end_to_end_is_deterministic() {
    let (target, targets, index, params) = setup();

    let first_candidates = find_interferers(&target, &targets, &index, &params);
    let second_candidates = find_interferers(&target, &targets, &index, &params);
    assert_eq!(first_candidates.hits, second_candidates.hits);

    let first = minimal_uis(&targets, &first_candidates, &params.q3_window, params.max_uis)
        .unwrap();
    let second = minimal_uis(&targets, &second_candidates, &params.q3_window, params.max_uis)
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_partitioned_search_covers_all_chunks() {
    let (target, targets, index, params) = setup();
    let (q1_min, q1_max) = index.q1_bounds();

    let ranges = partition_q1_range(&index, q1_min, q1_max, 2).unwrap();
    assert!(ranges.len() > 1);
    assert_eq!(ranges.first().unwrap().0, q1_min);
    assert_eq!(ranges.last().unwrap().1, q1_max);

    let reports = process_partitions(&ranges, None, |_, _| {
        let candidates = find_interferers(&target, &targets, &index, &params);
        minimal_uis(&targets, &candidates, &params.q3_window, params.max_uis)
    });
    assert_eq!(reports.len(), ranges.len());
    assert!(reports.iter().all(|r| r.outcome.is_ok()));
}
