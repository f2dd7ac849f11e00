//! Numerical helpers used by the photometry pipeline

pub mod misc;

pub use misc::{interp, interp_or_zero, median, median_spacing, InterpError};
