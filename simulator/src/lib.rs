//! Telescope exposure simulation
//!
//! Converts a target's brightness, either a catalog magnitude or a physical
//! blackbody, into the photons, electrons and ADU counts a telescope and
//! detector record through a spectral filter, and renders the result as a
//! seeing-limited point-source image.
//!
//! The pipeline runs `Telescope::photon_count` → `Imager::counts` →
//! `Imager::image`, with filter curves, the Vega reference spectrum and sky
//! transmission tables supplied by an [`io::DataProvider`].

pub mod algo;
pub mod config;
pub mod error;
pub mod hardware;
pub mod image_proc;
pub mod io;
pub mod observation;
pub mod photometry;
pub mod units;

pub use config::{Simulation, SimulationConfig};
pub use error::SimError;
pub use hardware::{Imager, Telescope, DEFAULT_IMAGE_SIZE};
pub use io::{DataDirectory, DataProvider};
pub use observation::Observation;
pub use photometry::{
    Airmass, BlackBodyTarget, CatalogTarget, Filter, ReferenceSpectrum, SkyModel, SpectralCurve,
    Target,
};
