//! Hardware module for telescope and detector configurations

pub mod imager;
pub mod telescope;

pub use imager::{Imager, DEFAULT_IMAGE_SIZE};
pub use telescope::{flux_ratio, Telescope};
