use std::fmt::Write as _;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::chemistry::constants::{MASS_PROTON, MASS_WATER};
use crate::chemistry::residues::{is_standard_residue, Modification, ResidueTable};
use crate::error::SrmError;

/// One sequence position: a residue symbol plus an optional modification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModifiedResidue {
    pub symbol: char,
    pub modification: Option<Modification>,
}

/// A target or background peptide at a fixed precursor charge state.
///
/// The sequence is stored as an explicit list of (residue, modification)
/// pairs, resolved once at construction time. The retention time value is an
/// opaque scalar supplied by the caller, it is never recomputed here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Peptide {
    pub id: i64,
    pub residues: Vec<ModifiedResidue>,
    pub charge: i32,
    pub ssrcalc: f64,
}

impl Peptide {
    /// Constructs a peptide from a plain sequence without modifications.
    ///
    /// # Arguments
    ///
    /// * `id` - peptide identifier, unique per modification state
    /// * `sequence` - sequence over the 20 standard one-letter symbols
    /// * `charge` - precursor charge state
    /// * `ssrcalc` - externally predicted retention time
    ///
    /// # Example
    ///
    /// ```
    /// use srmcore::data::peptide::Peptide;
    ///
    /// let peptide = Peptide::new(1, "AAAAEIAVK", 2, 12.3).unwrap();
    /// assert_eq!(peptide.len(), 9);
    /// ```
    pub fn new(id: i64, sequence: &str, charge: i32, ssrcalc: f64) -> Result<Self, SrmError> {
        let mut residues = Vec::with_capacity(sequence.len());
        for symbol in sequence.chars() {
            if !is_standard_residue(symbol) {
                return Err(SrmError::InvalidSequence {
                    sequence: sequence.to_string(),
                    symbol,
                });
            }
            residues.push(ModifiedResidue {
                symbol,
                modification: None,
            });
        }
        Ok(Peptide {
            id,
            residues,
            charge,
            ssrcalc,
        })
    }

    /// Constructs a peptide from the legacy bracket notation, resolving
    /// modification codes exactly once, e.g. `PEPC[160]TIDEM[147]K`.
    pub fn parse_bracket(
        id: i64,
        annotated: &str,
        charge: i32,
        ssrcalc: f64,
    ) -> Result<Self, SrmError> {
        let pattern = Regex::new(r"([A-Z])(?:\[(\d+)\])?").unwrap();
        let mut residues = Vec::new();
        let mut cursor = 0;

        for captures in pattern.captures_iter(annotated) {
            let whole = captures.get(0).unwrap();
            if whole.start() != cursor {
                let symbol = annotated[cursor..].chars().next().unwrap_or('?');
                return Err(SrmError::InvalidSequence {
                    sequence: annotated.to_string(),
                    symbol,
                });
            }
            cursor = whole.end();

            let symbol = captures
                .get(1)
                .unwrap()
                .as_str()
                .chars()
                .next()
                .unwrap();
            if !is_standard_residue(symbol) {
                return Err(SrmError::InvalidSequence {
                    sequence: annotated.to_string(),
                    symbol,
                });
            }

            let modification = match captures.get(2) {
                Some(code) => {
                    let code: u32 = code.as_str().parse().map_err(|_| {
                        SrmError::InvalidSequence {
                            sequence: annotated.to_string(),
                            symbol,
                        }
                    })?;
                    Some(Modification::from_bracket_code(symbol, code).ok_or(
                        SrmError::UnknownModificationCode {
                            residue: symbol,
                            code,
                        },
                    )?)
                }
                None => None,
            };
            residues.push(ModifiedResidue {
                symbol,
                modification,
            });
        }

        if cursor != annotated.len() {
            let symbol = annotated[cursor..].chars().next().unwrap_or('?');
            return Err(SrmError::InvalidSequence {
                sequence: annotated.to_string(),
                symbol,
            });
        }

        Ok(Peptide {
            id,
            residues,
            charge,
            ssrcalc,
        })
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Plain sequence with modifications stripped.
    pub fn sequence(&self) -> String {
        self.residues.iter().map(|r| r.symbol).collect()
    }

    /// Sequence in bracket notation, the inverse of `parse_bracket`.
    pub fn modified_sequence(&self) -> String {
        let mut out = String::with_capacity(self.residues.len());
        for residue in &self.residues {
            out.push(residue.symbol);
            if let Some(modification) = residue.modification {
                if let Some(code) = modification.bracket_code(residue.symbol) {
                    let _ = write!(out, "[{}]", code);
                }
            }
        }
        out
    }

    /// Applies a modification at a 0-based sequence position.
    ///
    /// A position carries at most one modification. Re-applying the same kind
    /// is a conflict, as is stacking a second kind on an occupied position.
    pub fn modify(
        &mut self,
        position: usize,
        modification: Modification,
    ) -> Result<(), SrmError> {
        let length = self.residues.len();
        let residue = self
            .residues
            .get_mut(position)
            .ok_or(SrmError::PositionOutOfRange { position, length })?;
        if let Some(existing) = residue.modification {
            return Err(SrmError::ModificationConflict {
                sequence: self.sequence(),
                position,
                existing,
            });
        }
        residue.modification = Some(modification);
        Ok(())
    }

    /// Alkylates every cysteine with CAM, failing if any cysteine is already
    /// modified.
    pub fn carbamidomethylate_cysteines(&mut self) -> Result<(), SrmError> {
        self.modify_all('C', Modification::Carbamidomethyl)
    }

    /// Oxidizes every methionine, failing if any methionine is already
    /// modified.
    pub fn oxidize_methionines(&mut self) -> Result<(), SrmError> {
        self.modify_all('M', Modification::Oxidation)
    }

    fn modify_all(&mut self, symbol: char, modification: Modification) -> Result<(), SrmError> {
        let positions: Vec<usize> = self
            .residues
            .iter()
            .enumerate()
            .filter(|(_, r)| r.symbol == symbol)
            .map(|(i, _)| i)
            .collect();
        for position in positions {
            self.modify(position, modification)?;
        }
        Ok(())
    }

    /// Counts tryptic missed cleavage sites: K or R not followed by P.
    pub fn missed_cleavages(&self) -> usize {
        let mut count = 0;
        for window in self.residues.windows(2) {
            if (window[0].symbol == 'K' || window[0].symbol == 'R') && window[1].symbol != 'P' {
                count += 1;
            }
        }
        count
    }

    /// Theoretical maximum charge: one protonation site per R, H or K plus
    /// the N-terminus.
    pub fn max_charge(&self) -> i32 {
        let sites = self
            .residues
            .iter()
            .filter(|r| matches!(r.symbol, 'R' | 'H' | 'K'))
            .count();
        sites as i32 + 1
    }

    /// Per-position residue masses including modification deltas.
    pub fn residue_masses(&self, table: &ResidueTable) -> Result<Vec<f64>, SrmError> {
        let sequence = self.sequence();
        self.residues
            .iter()
            .map(|r| table.modified_mass(r.symbol, r.modification, &sequence))
            .collect()
    }

    /// Neutral monoisotopic mass of the full peptide.
    pub fn monoisotopic_mass(&self, table: &ResidueTable) -> Result<f64, SrmError> {
        let sum: f64 = self.residue_masses(table)?.iter().sum();
        Ok(sum + MASS_WATER)
    }

    /// Precursor m/z at the peptide's charge state.
    pub fn precursor_mz(&self, table: &ResidueTable) -> Result<f64, SrmError> {
        if self.charge <= 0 {
            return Err(SrmError::InvalidCharge(self.charge));
        }
        let mass = self.monoisotopic_mass(table)?;
        Ok((mass + self.charge as f64 * MASS_PROTON) / self.charge as f64)
    }
}
