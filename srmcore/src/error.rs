use thiserror::Error;

use crate::chemistry::residues::Modification;

/// Errors produced by the assay design core.
///
/// Validation happens eagerly at the boundaries (sequence parsing, mass
/// computation, index construction) so that no silently wrong masses leave
/// the fragment model. Downstream components propagate these unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SrmError {
    #[error("invalid residue symbol '{symbol}' in sequence '{sequence}'")]
    InvalidSequence { sequence: String, symbol: char },

    #[error("unknown modification code [{code}] on residue '{residue}'")]
    UnknownModificationCode { residue: char, code: u32 },

    #[error("residue {position} of '{sequence}' already carries a {existing} modification")]
    ModificationConflict {
        sequence: String,
        position: usize,
        existing: Modification,
    },

    #[error("position {position} is out of range for a peptide of length {length}")]
    PositionOutOfRange { position: usize, length: usize },

    #[error("charge state must be positive, got {0}")]
    InvalidCharge(i32),

    #[error("cannot build transition index: {reason}")]
    IndexBuild { reason: String },

    #[error("cannot partition Q1 range: {reason}")]
    Partition { reason: String },

    #[error("partition [{q1_lo}, {q1_hi}] exceeded its time budget of {budget_ms} ms")]
    PartitionTimeout { q1_lo: f64, q1_hi: f64, budget_ms: u64 },

    #[error("{given} transitions exceed the combination limit of {limit}")]
    TooManyTransitions { given: usize, limit: usize },
}
