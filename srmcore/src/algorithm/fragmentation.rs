use rayon::prelude::*;

use crate::chemistry::constants::{
    MASS_CO, MASS_HYDROXYL, MASS_NH3, MASS_PROTON, MASS_WATER,
};
use crate::chemistry::residues::ResidueTable;
use crate::data::peptide::Peptide;
use crate::data::transition::{CorpusTransition, IonType, Transition};
use crate::error::SrmError;
use crate::params::SearchParams;

/// One ion series of a peptide at a fixed charge state. Positional series
/// hold N-1 masses ordered by fragment length (ordinal 1..N-1), precursor
/// losses hold exactly one mass.
#[derive(Debug, Clone)]
pub struct IonSeries {
    pub kind: IonType,
    pub charge: i32,
    pub masses: Vec<f64>,
}

/// The theoretical fragment masses of one peptide over the requested ion
/// types and charge states.
#[derive(Debug, Clone)]
pub struct FragmentSeries {
    pub peptide_id: i64,
    pub series: Vec<IonSeries>,
}

/// Computes the theoretical fragment series of a peptide.
///
/// Mass accumulation is a single prefix sum over the modified residue
/// masses. The b series is the prefix plus a proton, the y series is the
/// suffix plus two protons and a hydroxyl, and the remaining series are
/// fixed group offsets from those two. The full peptide and the bare termini
/// are excluded, they belong to the precursor, so every positional series
/// has exactly N-1 entries.
///
/// # Arguments
///
/// * `peptide` - the peptide with resolved modifications
/// * `ion_types` - which series to compute
/// * `charges` - fragment charge states, each must be >= 1
/// * `table` - residue mass configuration
///
/// # Example
///
/// ```
/// use srmcore::algorithm::fragmentation::fragment;
/// use srmcore::chemistry::residues::ResidueTable;
/// use srmcore::data::peptide::Peptide;
/// use srmcore::data::transition::IonType;
///
/// let table = ResidueTable::monoisotopic();
/// let peptide = Peptide::new(1, "AAAAEIAVK", 1, 0.0).unwrap();
/// let series = fragment(&peptide, &[IonType::Y], &[1], &table).unwrap();
/// assert_eq!(series.series[0].masses.len(), 8);
/// ```
pub fn fragment(
    peptide: &Peptide,
    ion_types: &[IonType],
    charges: &[i32],
    table: &ResidueTable,
) -> Result<FragmentSeries, SrmError> {
    for &charge in charges {
        if charge <= 0 {
            return Err(SrmError::InvalidCharge(charge));
        }
    }

    let residue_masses = peptide.residue_masses(table)?;
    let n = residue_masses.len();
    let total: f64 = residue_masses.iter().sum();

    // singly protonated base series, ordered by fragment length
    let mut b_base = Vec::with_capacity(n.saturating_sub(1));
    let mut running = 0.0;
    for &mass in &residue_masses[..n.saturating_sub(1)] {
        running += mass;
        b_base.push(running + MASS_PROTON);
    }
    let mut y_base = Vec::with_capacity(n.saturating_sub(1));
    let mut running = 0.0;
    for &mass in residue_masses.get(1..).unwrap_or(&[]).iter().rev() {
        running += mass;
        y_base.push(running + 2.0 * MASS_PROTON + MASS_HYDROXYL);
    }

    let mut series = Vec::with_capacity(ion_types.len() * charges.len());
    for &kind in ion_types {
        let singly = singly_charged_series(kind, &b_base, &y_base, total);
        for &charge in charges {
            let masses = singly
                .iter()
                .map(|&mass| (mass + (charge - 1) as f64 * MASS_PROTON) / charge as f64)
                .collect();
            series.push(IonSeries {
                kind,
                charge,
                masses,
            });
        }
    }

    Ok(FragmentSeries {
        peptide_id: peptide.id,
        series,
    })
}

fn singly_charged_series(kind: IonType, b_base: &[f64], y_base: &[f64], total: f64) -> Vec<f64> {
    match kind {
        IonType::B => b_base.to_vec(),
        IonType::Y => y_base.to_vec(),
        IonType::A => b_base.iter().map(|b| b - MASS_CO).collect(),
        IonType::C => b_base.iter().map(|b| b + MASS_NH3).collect(),
        IonType::X => y_base
            .iter()
            .map(|y| y + MASS_CO - 2.0 * MASS_PROTON)
            .collect(),
        IonType::Z => y_base.iter().map(|y| y - MASS_NH3).collect(),
        IonType::AMinusNH3 => b_base
            .iter()
            .map(|b| b - MASS_CO - MASS_NH3)
            .collect(),
        IonType::BMinusH2O => b_base.iter().map(|b| b - MASS_WATER).collect(),
        IonType::BMinusNH3 => b_base.iter().map(|b| b - MASS_NH3).collect(),
        IonType::BPlusH2O => b_base.iter().map(|b| b + MASS_WATER).collect(),
        IonType::YMinusH2O => y_base.iter().map(|y| y - MASS_WATER).collect(),
        IonType::YMinusNH3 => y_base.iter().map(|y| y - MASS_NH3).collect(),
        // computed from the total peptide mass, not from the per-position series
        IonType::PrecursorMinusH2O => vec![total],
        IonType::PrecursorMinusNH3 => vec![total + MASS_WATER - MASS_NH3],
    }
}

/// Derives the full transition list of a target peptide: Q1 from the
/// precursor charge, one Q3 per (ion type, ordinal, fragment charge). The
/// order is deterministic: ion types as configured, then charge, then
/// ordinal.
pub fn target_transitions(
    peptide: &Peptide,
    params: &SearchParams,
    table: &ResidueTable,
) -> Result<Vec<Transition>, SrmError> {
    let q1 = peptide.precursor_mz(table)?;
    let fragments = fragment(peptide, &params.ion_types, &params.fragment_charges, table)?;

    let mut transitions = Vec::new();
    for ion_series in &fragments.series {
        for (i, &q3) in ion_series.masses.iter().enumerate() {
            transitions.push(Transition {
                peptide_id: peptide.id,
                ion: ion_series.kind,
                ordinal: i + 1,
                charge: ion_series.charge,
                q1,
                q3,
            });
        }
    }
    Ok(transitions)
}

/// Fragments a whole peptide set into background corpus entries, one
/// `CorpusTransition` per target transition of each peptide. This is the
/// offline bulk path that feeds the index builder, parallelized per peptide.
pub fn corpus_from_peptides(
    peptides: &[Peptide],
    params: &SearchParams,
    table: &ResidueTable,
) -> Result<Vec<CorpusTransition>, SrmError> {
    let per_peptide: Result<Vec<Vec<CorpusTransition>>, SrmError> = peptides
        .par_iter()
        .map(|peptide| {
            let transitions = target_transitions(peptide, params, table)?;
            Ok(transitions
                .into_iter()
                .map(|t| CorpusTransition::new(t.peptide_id, peptide.charge, t.q1, t.q3, peptide.ssrcalc))
                .collect())
        })
        .collect();
    Ok(per_peptide?.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ResidueTable {
        ResidueTable::monoisotopic()
    }

    #[test]
    fn test_b_y_reference_masses_charge_one() {
        // spectral library regression values for AAAAEIAVK
        let peptide = Peptide::new(1, "AAAAEIAVK", 1, 0.0).unwrap();
        let fragments = fragment(&peptide, &[IonType::B, IonType::Y], &[1], &table()).unwrap();
        let b = &fragments.series[0].masses;
        let y = &fragments.series[1].masses;

        assert!((y[1] - 246.181).abs() < 1e-2);
        assert!((b[3] - 285.156).abs() < 1e-2);
        assert!((y[2] - 317.218).abs() < 1e-2);
        assert!((y[5] - 630.382).abs() < 1e-2);
        assert!((b[7] - 697.388).abs() < 1e-2);
    }

    #[test]
    fn test_b_y_reference_masses_charge_two() {
        let peptide = Peptide::new(1, "AAAAEIAVK", 2, 0.0).unwrap();
        let fragments = fragment(&peptide, &[IonType::B, IonType::Y], &[1, 2], &table()).unwrap();
        let b1 = &fragments.series[0].masses;
        let b2 = &fragments.series[1].masses;
        let y2 = &fragments.series[3].masses;

        assert!((b1[2] - 214.119).abs() < 1e-2);
        assert!((y2[2] - 159.113).abs() < 1e-2);
        assert!((y2[5] - 315.695).abs() < 1e-2);
        assert!((b2[7] - 349.198).abs() < 1e-2);
    }

    #[test]
    fn test_series_length_invariant() {
        let peptide = Peptide::new(1, "HYSHVDCPGHADYIK", 1, 0.0).unwrap();
        let kinds = [
            IonType::A,
            IonType::B,
            IonType::C,
            IonType::X,
            IonType::Y,
            IonType::Z,
            IonType::AMinusNH3,
            IonType::BMinusH2O,
            IonType::BMinusNH3,
            IonType::BPlusH2O,
            IonType::YMinusH2O,
            IonType::YMinusNH3,
        ];
        let fragments = fragment(&peptide, &kinds, &[1], &table()).unwrap();
        for series in &fragments.series {
            assert_eq!(series.masses.len(), peptide.len() - 1);
        }
    }

    #[test]
    fn test_series_offsets() {
        let peptide = Peptide::new(1, "AAAAEIAVK", 1, 0.0).unwrap();
        let fragments = fragment(
            &peptide,
            &[IonType::B, IonType::Y, IonType::A, IonType::C, IonType::X, IonType::Z],
            &[1],
            &table(),
        )
        .unwrap();
        let b = &fragments.series[0].masses;
        let y = &fragments.series[1].masses;
        let a = &fragments.series[2].masses;
        let c = &fragments.series[3].masses;
        let x = &fragments.series[4].masses;
        let z = &fragments.series[5].masses;

        for i in 0..b.len() {
            assert!((a[i] - (b[i] - MASS_CO)).abs() < 1e-9);
            assert!((c[i] - (b[i] + MASS_NH3)).abs() < 1e-9);
            assert!((x[i] - (y[i] + MASS_CO - 2.0 * MASS_PROTON)).abs() < 1e-9);
            assert!((z[i] - (y[i] - MASS_NH3)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_precursor_losses_from_total_mass() {
        let peptide = Peptide::new(1, "AAAAEIAVK", 1, 0.0).unwrap();
        let fragments = fragment(
            &peptide,
            &[IonType::PrecursorMinusH2O, IonType::PrecursorMinusNH3],
            &[1],
            &table(),
        )
        .unwrap();
        let water_loss = fragments.series[0].masses[0];
        let ammonia_loss = fragments.series[1].masses[0];
        let full = peptide.monoisotopic_mass(&table()).unwrap();

        assert_eq!(fragments.series[0].masses.len(), 1);
        assert!((water_loss - (full - MASS_WATER)).abs() < 1e-9);
        assert!((ammonia_loss - (full - MASS_NH3)).abs() < 1e-9);
    }

    #[test]
    fn test_nonpositive_charge_is_rejected() {
        let peptide = Peptide::new(1, "AAAAEIAVK", 1, 0.0).unwrap();
        let result = fragment(&peptide, &[IonType::B], &[1, 0], &table());
        assert_eq!(result.unwrap_err(), SrmError::InvalidCharge(0));
        let result = fragment(&peptide, &[IonType::B], &[-2], &table());
        assert_eq!(result.unwrap_err(), SrmError::InvalidCharge(-2));
    }

    #[test]
    fn test_target_transition_order_is_deterministic() {
        let peptide = Peptide::new(1, "AAAAEIAVK", 2, 0.0).unwrap();
        let params = SearchParams::default();
        let first = target_transitions(&peptide, &params, &table()).unwrap();
        let second = target_transitions(&peptide, &params, &table()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 16);
        assert_eq!(first[0].label(), "b1+1");
        assert_eq!(first[8].label(), "y1+1");
    }
}
