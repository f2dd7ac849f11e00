//! Detector model: photon to count conversion and point-source rendering

use log::debug;
use ndarray::Array2;
use uom::si::f64::Angle;

use super::telescope::{truncate_count, Telescope};
use crate::error::SimError;
use crate::image_proc::psf::render_point_source;
use crate::observation::Observation;
use crate::photometry::ReferenceSpectrum;
use crate::units::{is_positive, AngleExt};

/// Default width and height of rendered images in pixels
pub const DEFAULT_IMAGE_SIZE: usize = 20;

/// Detector behind a telescope.
///
/// Quantum efficiency, binning and gain default to 1 and are set with the
/// `with_*` builder methods.
#[derive(Debug, Clone, PartialEq)]
pub struct Imager {
    /// On-sky angle subtended by one unbinned pixel
    plate_scale: Angle,
    /// Seeing disk, used as the standard deviation of the PSF
    seeing: Angle,
    /// Pixel binning factor (1 = unbinned)
    binning: u32,
    /// Fraction of photons converted to electrons (0.0-1.0]
    quantum_efficiency: f64,
    /// Electrons per output count (e⁻/ADU)
    gain: f64,
}

impl Imager {
    /// Create a new imager with unit quantum efficiency, binning and gain
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidConfiguration` if plate scale or seeing is
    /// not positive.
    pub fn new(plate_scale: Angle, seeing: Angle) -> Result<Self, SimError> {
        if !is_positive(plate_scale.as_arcseconds()) {
            return Err(SimError::invalid(format!(
                "Plate scale must be positive, got {} arcsec/pixel",
                plate_scale.as_arcseconds()
            )));
        }
        if !is_positive(seeing.as_arcseconds()) {
            return Err(SimError::invalid(format!(
                "Seeing must be positive, got {} arcsec",
                seeing.as_arcseconds()
            )));
        }

        Ok(Self {
            plate_scale,
            seeing,
            binning: 1,
            quantum_efficiency: 1.0,
            gain: 1.0,
        })
    }

    /// Set the pixel binning factor
    pub fn with_binning(mut self, binning: u32) -> Result<Self, SimError> {
        if binning == 0 {
            return Err(SimError::invalid("Binning must be at least 1"));
        }
        self.binning = binning;
        Ok(self)
    }

    /// Set the quantum efficiency, which must lie in (0, 1]
    pub fn with_quantum_efficiency(mut self, quantum_efficiency: f64) -> Result<Self, SimError> {
        if !is_positive(quantum_efficiency) || quantum_efficiency > 1.0 {
            return Err(SimError::invalid(format!(
                "Quantum efficiency must be within (0, 1], got {quantum_efficiency}"
            )));
        }
        self.quantum_efficiency = quantum_efficiency;
        Ok(self)
    }

    /// Set the gain in electrons per output count
    pub fn with_gain(mut self, gain: f64) -> Result<Self, SimError> {
        if !is_positive(gain) {
            return Err(SimError::invalid(format!(
                "Gain must be positive, got {gain} e-/ADU"
            )));
        }
        self.gain = gain;
        Ok(self)
    }

    pub fn plate_scale(&self) -> Angle {
        self.plate_scale
    }

    pub fn seeing(&self) -> Angle {
        self.seeing
    }

    pub fn binning(&self) -> u32 {
        self.binning
    }

    pub fn quantum_efficiency(&self) -> f64 {
        self.quantum_efficiency
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// Seeing disk expressed in binned detector pixels
    pub fn sigma_pixels(&self) -> f64 {
        self.seeing.as_arcseconds() / self.plate_scale.as_arcseconds() / f64::from(self.binning)
    }

    /// Convert a photon count to output counts (ADU), truncating
    ///
    /// A gain below one can push the count past `u64::MAX`, which is an
    /// `InvalidConfiguration` error rather than a saturated value.
    pub fn photons_to_counts(&self, photons: u64) -> Result<u64, SimError> {
        let electrons = photons as f64 * self.quantum_efficiency;
        truncate_count(electrons / self.gain)
    }

    /// Output counts recorded for an observation
    pub fn counts(
        &self,
        telescope: &Telescope,
        reference: &ReferenceSpectrum,
        observation: &Observation,
    ) -> Result<u64, SimError> {
        let photons = telescope.photon_count(reference, observation)?;
        let counts = self.photons_to_counts(photons)?;
        debug!(
            "Detector: {photons} photons -> {counts} counts (qe={}, gain={})",
            self.quantum_efficiency, self.gain
        );
        Ok(counts)
    }

    /// Noise-free `size` x `size` image of the observation as a centered
    /// point source.
    ///
    /// The image sums to [`counts`](Self::counts) less the per-pixel
    /// truncation loss, which is below one count per pixel.
    pub fn image(
        &self,
        telescope: &Telescope,
        reference: &ReferenceSpectrum,
        observation: &Observation,
        size: usize,
    ) -> Result<Array2<u64>, SimError> {
        if size == 0 {
            return Err(SimError::invalid("Image size must be at least 1 pixel"));
        }
        let counts = self.counts(telescope, reference, observation)?;
        let sigma = self.sigma_pixels();
        debug!("Rendering {counts} counts on {size}x{size} pixels, sigma={sigma:.3}px");
        render_point_source(counts, sigma, size)
    }
}
