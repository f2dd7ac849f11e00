//! Filter transmissivity curves

use log::warn;
use uom::si::f64::Length;

use super::spectrum::SpectralCurve;
use crate::error::SimError;
use crate::io::DataProvider;

/// Transmissivity curve for a named filter.
///
/// The name doubles as the key into the reference magnitude table, so a
/// filter used with a catalog magnitude must carry the name the magnitude
/// table knows it by.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    name: String,
    curve: SpectralCurve,
}

impl Filter {
    /// Create a filter from an explicit transmissivity curve
    ///
    /// # Arguments
    ///
    /// * `name` - Filter name, e.g. `"SDSS_z"`
    /// * `wavelengths` - Wavelength samples, strictly ascending
    /// * `transmissivity` - Transmissivity (0.0 to 1.0) at each wavelength
    pub fn new(
        name: impl Into<String>,
        wavelengths: &[Length],
        transmissivity: Vec<f64>,
    ) -> Result<Self, SimError> {
        Self::from_curve(name, SpectralCurve::new(wavelengths, transmissivity)?)
    }

    /// Create a filter from an existing curve
    pub fn from_curve(name: impl Into<String>, curve: SpectralCurve) -> Result<Self, SimError> {
        let name = name.into();

        // Expected but not enforced; never clamped
        if curve.values().iter().any(|t| !(0.0..=1.0).contains(t)) {
            warn!("Filter {name} has transmissivity outside [0, 1]");
        }

        Ok(Self { name, curve })
    }

    /// Load a built-in filter by name from a data provider
    ///
    /// The provider table is in angstroms. Returns `SimError::NotFound` if
    /// the provider has no filter called `name`.
    pub fn from_name(provider: &dyn DataProvider, name: &str) -> Result<Self, SimError> {
        let table = provider.filter_table(name)?;
        let curve = SpectralCurve::from_angstroms(table.wavelengths, table.values)?;
        Self::from_curve(name, curve)
    }

    /// Names of the filters a data provider can load
    pub fn available_filters(provider: &dyn DataProvider) -> Result<Vec<String>, SimError> {
        provider.filter_names()
    }

    /// Filter name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Underlying transmissivity curve (wavelengths in nm)
    pub fn curve(&self) -> &SpectralCurve {
        &self.curve
    }

    /// Transmissivity-weighted mean wavelength of the filter
    pub fn effective_wavelength(&self) -> Result<Length, SimError> {
        self.curve.effective_wavelength()
    }

    /// Transmissivity at a wavelength, linearly interpolated and zero
    /// outside the curve
    pub fn transmissivity_at(&self, wavelength_nm: f64) -> f64 {
        self.curve.at(wavelength_nm)
    }
}
