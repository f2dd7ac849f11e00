//! Observation targets
//!
//! A target's brightness is described either by a catalog magnitude in a
//! specific filter (relative photometry against the reference star) or by a
//! physical blackbody (absolute photometry).

use std::f64::consts::PI;

use uom::si::f64::Length;

use super::filter::Filter;
use super::spectrum::CGS;
use crate::algo::misc::median_spacing;
use crate::error::SimError;
use crate::units::{is_positive, LengthExt, Temperature, TemperatureExt};

/// Source whose brightness is known as a magnitude in one filter.
///
/// The magnitude only has meaning together with `filter`.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogTarget {
    magnitude: f64,
    filter: Filter,
}

impl CatalogTarget {
    /// Create a catalog target
    pub fn new(magnitude: f64, filter: Filter) -> Result<Self, SimError> {
        if !magnitude.is_finite() {
            return Err(SimError::invalid(format!(
                "Magnitude must be finite, got {magnitude}"
            )));
        }
        Ok(Self { magnitude, filter })
    }

    /// Catalog magnitude
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// Filter the magnitude was measured in
    pub fn filter(&self) -> &Filter {
        &self.filter
    }
}

/// Spherical blackbody emitter at a distance
#[derive(Debug, Clone, PartialEq)]
pub struct BlackBodyTarget {
    effective_temperature: Temperature,
    radius: Length,
    distance: Length,
}

impl BlackBodyTarget {
    /// Create a blackbody target
    ///
    /// # Arguments
    ///
    /// * `effective_temperature` - Effective temperature of the blackbody
    /// * `radius` - Radius of the emitting sphere
    /// * `distance` - Distance to the observer
    pub fn new(
        effective_temperature: Temperature,
        radius: Length,
        distance: Length,
    ) -> Result<Self, SimError> {
        if !is_positive(effective_temperature.as_kelvin()) {
            return Err(SimError::invalid(format!(
                "Effective temperature must be positive, got {} K",
                effective_temperature.as_kelvin()
            )));
        }
        if !is_positive(radius.as_meters()) || !is_positive(distance.as_meters()) {
            return Err(SimError::invalid(format!(
                "Radius and distance must be positive, got {} m and {} m",
                radius.as_meters(),
                distance.as_meters()
            )));
        }

        Ok(Self {
            effective_temperature,
            radius,
            distance,
        })
    }

    pub fn effective_temperature(&self) -> Temperature {
        self.effective_temperature
    }

    pub fn radius(&self) -> Length {
        self.radius
    }

    pub fn distance(&self) -> Length {
        self.distance
    }

    /// Spectral radiance from Planck's law, B_λ(T)
    ///
    /// # Arguments
    ///
    /// * `wavelength` - Wavelength of the emitted light
    ///
    /// # Returns
    ///
    /// Spectral radiance in erg s⁻¹ cm⁻² cm⁻¹ sr⁻¹ (0.0 for non-positive
    /// wavelengths)
    pub fn irradiance(&self, wavelength: Length) -> f64 {
        self.irradiance_nm(wavelength.as_nanometers())
    }

    /// [`irradiance`](Self::irradiance) on a raw nanometer wavelength, for
    /// loops over a curve's sample grid
    pub(crate) fn irradiance_nm(&self, wavelength_nm: f64) -> f64 {
        if wavelength_nm <= 0.0 {
            return 0.0;
        }

        let wavelength_cm = wavelength_nm * CGS::CM_PER_NM;
        let numerator = 2.0 * CGS::PLANCK_CONSTANT * CGS::SPEED_OF_LIGHT * CGS::SPEED_OF_LIGHT;
        let exponent = (CGS::PLANCK_CONSTANT * CGS::SPEED_OF_LIGHT)
            / (wavelength_cm * CGS::BOLTZMANN_CONSTANT * self.effective_temperature.as_kelvin());

        numerator / (wavelength_cm.powi(5) * exponent.exp_m1())
    }

    /// [`irradiance`](Self::irradiance) evaluated over a wavelength grid
    pub fn irradiance_grid(&self, wavelengths: &[Length]) -> Vec<f64> {
        wavelengths.iter().map(|&w| self.irradiance(w)).collect()
    }

    /// Solid-angle factor turning surface radiance into observed flux,
    /// π sr · (R/d)²
    pub fn dilution(&self) -> f64 {
        let ratio = self.radius.as_meters() / self.distance.as_meters();
        PI * ratio * ratio
    }

    /// Observed spectral flux density in erg s⁻¹ cm⁻² cm⁻¹
    pub fn flux_density(&self, wavelength: Length) -> f64 {
        self.irradiance(wavelength) * self.dilution()
    }

    /// Total irradiative energy rate received over a wavelength grid.
    ///
    /// Every sample is weighted by the median grid spacing.
    ///
    /// # Returns
    ///
    /// Energy rate in erg s⁻¹ cm⁻²
    pub fn energy_rate(&self, wavelengths: &[Length]) -> Result<f64, SimError> {
        let wavelengths_nm: Vec<f64> = wavelengths.iter().map(|w| w.as_nanometers()).collect();
        let delta_nm = median_spacing(&wavelengths_nm).ok_or_else(|| {
            SimError::invalid("Energy rate needs a wavelength grid of at least 2 samples")
        })?;
        let delta_cm = delta_nm * CGS::CM_PER_NM;
        let dilution = self.dilution();

        Ok(wavelengths_nm
            .iter()
            .map(|&w| self.irradiance_nm(w) * dilution * delta_cm)
            .sum())
    }
}

/// Observation target: exactly one brightness representation
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Relative photometry against the reference spectrum
    Catalog(CatalogTarget),
    /// Absolute photometry from a Planck spectrum
    BlackBody(BlackBodyTarget),
}

impl From<CatalogTarget> for Target {
    fn from(target: CatalogTarget) -> Self {
        Target::Catalog(target)
    }
}

impl From<BlackBodyTarget> for Target {
    fn from(target: BlackBodyTarget) -> Self {
        Target::BlackBody(target)
    }
}
