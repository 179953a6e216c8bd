// Purpose: To store constants that are used in the program
pub const MASS_PROTON: f64 = 1.007276466621; // Unified atomic mass unit
pub const MASS_NEUTRON: f64 = 1.00866491595; // Unified atomic mass unit
pub const MASS_ELECTRON: f64 = 0.00054857990946; // Unified atomic mass unit
pub const MASS_WATER: f64 = 18.0105646863; // Unified atomic mass unit

// Group masses used by the fragment ion series
pub const MASS_HYDROXYL: f64 = MASS_WATER - MASS_PROTON;
pub const MASS_CO: f64 = 27.9949146221; // Unified atomic mass unit
pub const MASS_NH3: f64 = 17.0265491015; // Unified atomic mass unit

// Mass difference between the C13 and C12 isotopes, shifts Q1 of heavier
// isotopologues by MASS_DIFF_C13 / charge per C13 atom
pub const MASS_DIFF_C13: f64 = 1.0033548378;
