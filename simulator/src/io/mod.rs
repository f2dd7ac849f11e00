//! Input/output for tabulated data

pub mod data;

pub use data::{DataDirectory, DataProvider, SpectralTable};
