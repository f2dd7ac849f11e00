//! Image processing module for exposure simulation
//!
//! Rendering of the seeing-limited point spread function and export of the
//! resulting count images.

pub mod image;
pub mod psf;

pub use image::save_png;
pub use psf::{gaussian_kernel, render_point_source};
