use serde::{Deserialize, Serialize};

use crate::data::transition::IonType;

/// A tolerance window, expressed either as an absolute width in Dalton or as
/// a relative width in parts per million. The value is the FULL window width,
/// queries extend half of it to each side of the center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Tolerance {
    Da(f64),
    Ppm(f64),
}

impl Tolerance {
    /// Half window width at the given center mass.
    ///
    /// # Example
    ///
    /// ```
    /// use srmcore::params::Tolerance;
    ///
    /// assert_eq!(Tolerance::Da(1.0).half_width(500.0), 0.5);
    /// assert_eq!(Tolerance::Ppm(10.0).half_width(500.0), 500.0 * 10.0 / 2e6);
    /// ```
    pub fn half_width(&self, center: f64) -> f64 {
        match self {
            Tolerance::Da(width) => width / 2.0,
            Tolerance::Ppm(width) => center * width / 2e6,
        }
    }

    /// Inclusive window bounds around the center mass.
    pub fn bounds(&self, center: f64) -> (f64, f64) {
        let half = self.half_width(center);
        (center - half, center + half)
    }

    /// Inclusive containment test against the window around `center`.
    pub fn contains(&self, center: f64, value: f64) -> bool {
        let (lo, hi) = self.bounds(center);
        value >= lo && value <= hi
    }
}

/// Tolerances and series selection for one interference search.
///
/// The defaults reproduce a typical triple-quadrupole setup: 0.7 Th Q1
/// isolation, 1.0 Th Q3 window, b and y series, interference considered from
/// 1+ and 2+ precursors, no retention time constraint and no isotope
/// widening.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// Full Q1 isolation window width.
    pub q1_window: Tolerance,
    /// Full Q3 resolution window width.
    pub q3_window: Tolerance,
    /// Full retention time window width, hard exclusion when set.
    pub ssrcalc_window: Option<f64>,
    /// Precursor charge states of background peptides considered interfering.
    /// Empty means no charge filtering.
    pub interferer_charges: Vec<i32>,
    /// Fragment charge states generated for target transitions.
    pub fragment_charges: Vec<i32>,
    /// Ion series generated for target transitions.
    pub ion_types: Vec<IonType>,
    /// Largest transition subset size the UIS search will consider.
    pub max_uis: usize,
    /// Number of C13 isotope peaks of an interferer precursor that may fall
    /// into the Q1 window. Zero reproduces the plain window.
    pub max_isotopes: usize,
    /// Drop hits of the target peptide itself.
    pub exclude_self: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            q1_window: Tolerance::Da(0.7),
            q3_window: Tolerance::Da(1.0),
            ssrcalc_window: None,
            interferer_charges: vec![1, 2],
            fragment_charges: vec![1],
            ion_types: vec![IonType::B, IonType::Y],
            max_uis: 5,
            max_isotopes: 0,
            exclude_self: true,
        }
    }
}
