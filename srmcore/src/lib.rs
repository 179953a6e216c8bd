// chemistry module
pub mod chemistry {
    pub mod constants;
    pub mod residues;
}

// data module
pub mod data {
    pub mod peptide;
    pub mod transition;
}

// index module
pub mod index {
    pub mod range_index;
}

// algorithm module
pub mod algorithm {
    pub mod fragmentation;
    pub mod interference;
    pub mod partition;
    pub mod uis;
}

pub mod error;
pub mod params;
