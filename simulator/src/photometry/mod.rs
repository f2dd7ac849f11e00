//! Photometry models and utilities

pub mod filter;
pub mod reference;
pub mod sky;
pub mod spectrum;
pub mod stellar;

pub use filter::Filter;
pub use reference::ReferenceSpectrum;
pub use sky::{Airmass, SkyModel};
pub use spectrum::{SpectralCurve, CGS};
pub use stellar::{BlackBodyTarget, CatalogTarget, Target};
