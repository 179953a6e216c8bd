use std::fmt;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

pub type PeptideId = i64;

/// Fragment ion nomenclature: the six backbone series plus neutral-loss
/// variants. Precursor losses are computed from the total peptide mass and
/// carry a single mass instead of a positional series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IonType {
    A,
    B,
    C,
    X,
    Y,
    Z,
    AMinusNH3,
    BMinusH2O,
    BMinusNH3,
    BPlusH2O,
    YMinusH2O,
    YMinusNH3,
    PrecursorMinusH2O,
    PrecursorMinusNH3,
}

impl IonType {
    /// True for the precursor-loss pseudo series (M-H2O, M-NH3).
    pub fn is_precursor_loss(&self) -> bool {
        matches!(self, IonType::PrecursorMinusH2O | IonType::PrecursorMinusNH3)
    }

    pub fn label(&self) -> &'static str {
        match self {
            IonType::A => "a",
            IonType::B => "b",
            IonType::C => "c",
            IonType::X => "x",
            IonType::Y => "y",
            IonType::Z => "z",
            IonType::AMinusNH3 => "a-NH3",
            IonType::BMinusH2O => "b-H2O",
            IonType::BMinusNH3 => "b-NH3",
            IonType::BPlusH2O => "b+H2O",
            IonType::YMinusH2O => "y-H2O",
            IonType::YMinusNH3 => "y-NH3",
            IonType::PrecursorMinusH2O => "M-H2O",
            IonType::PrecursorMinusNH3 => "M-NH3",
        }
    }
}

impl Display for IonType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One monitored transition of a target peptide: the precursor m/z (Q1)
/// paired with one fragment m/z (Q3), annotated with the fragment identity.
/// Transitions are produced by the fragment model and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub peptide_id: PeptideId,
    pub ion: IonType,
    pub ordinal: usize,
    pub charge: i32,
    pub q1: f64,
    pub q3: f64,
}

impl Transition {
    /// Display label in the usual notation, e.g. `y4+2`.
    pub fn label(&self) -> String {
        format!("{}{}+{}", self.ion.label(), self.ordinal, self.charge)
    }
}

/// One (Q1, Q3) point of the background corpus, tagged with its owning
/// peptide. The retention time of the owning precursor rides along so that
/// window queries can be filtered without a second lookup. Entries are
/// created during bulk load and never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusTransition {
    pub peptide_id: PeptideId,
    pub charge: i32,
    pub q1: f64,
    pub q3: f64,
    pub ssrcalc: f64,
}

impl CorpusTransition {
    pub fn new(peptide_id: PeptideId, charge: i32, q1: f64, q3: f64, ssrcalc: f64) -> Self {
        CorpusTransition {
            peptide_id,
            charge,
            q1,
            q3,
            ssrcalc,
        }
    }
}
