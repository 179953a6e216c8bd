use std::collections::HashMap;
use std::fmt;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::SrmError;

/// Chemical modifications that a residue can carry.
///
/// Each kind has a fixed monoisotopic mass delta and is recognized in the
/// legacy bracket notation by the integer mass of the modified residue,
/// e.g. `C[160]` for carbamidomethylated cysteine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modification {
    Carbamidomethyl,
    Oxidation,
    Phospho,
}

impl Modification {
    /// Monoisotopic mass delta added to the bare residue mass.
    pub fn mass_delta(&self) -> f64 {
        match self {
            Modification::Carbamidomethyl => 57.021464,
            Modification::Oxidation => 15.994915,
            Modification::Phospho => 79.966331,
        }
    }

    /// Resolve a legacy bracket code on a residue, e.g. `('C', 160)`.
    ///
    /// # Arguments
    ///
    /// * `residue` - one-letter residue symbol carrying the bracket
    /// * `code` - the integer inside the bracket
    ///
    /// # Returns
    ///
    /// * `Some(Modification)` if the (residue, code) pair is recognized
    ///
    /// # Example
    ///
    /// ```
    /// use srmcore::chemistry::residues::Modification;
    ///
    /// assert_eq!(Modification::from_bracket_code('C', 160), Some(Modification::Carbamidomethyl));
    /// assert_eq!(Modification::from_bracket_code('S', 167), Some(Modification::Phospho));
    /// assert_eq!(Modification::from_bracket_code('A', 160), None);
    /// ```
    pub fn from_bracket_code(residue: char, code: u32) -> Option<Modification> {
        match (residue, code) {
            ('C', 160) => Some(Modification::Carbamidomethyl),
            ('M', 147) => Some(Modification::Oxidation),
            ('S', 167) | ('T', 181) | ('Y', 243) => Some(Modification::Phospho),
            _ => None,
        }
    }

    /// Bracket code of this modification on the given residue, the inverse of
    /// `from_bracket_code`.
    pub fn bracket_code(&self, residue: char) -> Option<u32> {
        match (self, residue) {
            (Modification::Carbamidomethyl, 'C') => Some(160),
            (Modification::Oxidation, 'M') => Some(147),
            (Modification::Phospho, 'S') => Some(167),
            (Modification::Phospho, 'T') => Some(181),
            (Modification::Phospho, 'Y') => Some(243),
            _ => None,
        }
    }
}

impl Display for Modification {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Modification::Carbamidomethyl => write!(f, "Carbamidomethyl"),
            Modification::Oxidation => write!(f, "Oxidation"),
            Modification::Phospho => write!(f, "Phospho"),
        }
    }
}

/// Returns true if the symbol is one of the 20 standard amino acids.
pub fn is_standard_residue(symbol: char) -> bool {
    matches!(
        symbol,
        'A' | 'R' | 'N' | 'D' | 'C' | 'E' | 'Q' | 'G' | 'H' | 'I' | 'L' | 'K' | 'M' | 'F' | 'P'
            | 'S' | 'T' | 'W' | 'Y' | 'V'
    )
}

/// Immutable residue mass configuration passed into the fragment model.
///
/// Holds one mass per one-letter residue symbol, either monoisotopic or
/// isotope-averaged. Built once and shared read-only between workers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResidueTable {
    masses: HashMap<char, f64>,
}

impl ResidueTable {
    /// Monoisotopic residue masses.
    ///
    /// # Example
    ///
    /// ```
    /// use srmcore::chemistry::residues::ResidueTable;
    ///
    /// let table = ResidueTable::monoisotopic();
    /// assert_eq!(table.mass('K'), Some(128.094963));
    /// ```
    pub fn monoisotopic() -> Self {
        let mut map = HashMap::new();
        map.insert('A', 71.037114);
        map.insert('R', 156.101111);
        map.insert('N', 114.042927);
        map.insert('D', 115.026943);
        map.insert('C', 103.009185);
        map.insert('E', 129.042593);
        map.insert('Q', 128.058578);
        map.insert('G', 57.021464);
        map.insert('H', 137.058912);
        map.insert('I', 113.084064);
        map.insert('L', 113.084064);
        map.insert('K', 128.094963);
        map.insert('M', 131.040485);
        map.insert('F', 147.068414);
        map.insert('P', 97.052764);
        map.insert('S', 87.032028);
        map.insert('T', 101.047679);
        map.insert('W', 186.079313);
        map.insert('Y', 163.063329);
        map.insert('V', 99.068414);
        ResidueTable { masses: map }
    }

    /// Isotope-averaged residue masses.
    pub fn average() -> Self {
        let mut map = HashMap::new();
        map.insert('A', 71.0788);
        map.insert('R', 156.1875);
        map.insert('N', 114.1038);
        map.insert('D', 115.0886);
        map.insert('C', 103.1388);
        map.insert('E', 129.1155);
        map.insert('Q', 128.1307);
        map.insert('G', 57.0519);
        map.insert('H', 137.1411);
        map.insert('I', 113.1594);
        map.insert('L', 113.1594);
        map.insert('K', 128.1741);
        map.insert('M', 131.1926);
        map.insert('F', 147.1766);
        map.insert('P', 97.1167);
        map.insert('S', 87.0782);
        map.insert('T', 101.1051);
        map.insert('W', 186.2132);
        map.insert('Y', 163.1760);
        map.insert('V', 99.1326);
        ResidueTable { masses: map }
    }

    /// Mass of a bare residue, `None` for symbols outside the table.
    pub fn mass(&self, symbol: char) -> Option<f64> {
        self.masses.get(&symbol).copied()
    }

    /// Mass of a residue including an optional modification delta, failing
    /// fast on unknown symbols.
    pub fn modified_mass(
        &self,
        symbol: char,
        modification: Option<Modification>,
        sequence: &str,
    ) -> Result<f64, SrmError> {
        let base = self.mass(symbol).ok_or(SrmError::InvalidSequence {
            sequence: sequence.to_string(),
            symbol,
        })?;
        Ok(base + modification.map_or(0.0, |m| m.mass_delta()))
    }
}
