//! Flux-calibrated reference star (Vega) used for relative photometry
//!
//! [`ReferenceSpectrum`] is the explicit context object for catalog-magnitude
//! targets: it supplies the filter-integrated reference flux and the
//! reference magnitude per filter. It is constructed once and passed by
//! reference into the telescope; nothing here is global.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::debug;
use once_cell::sync::OnceCell;

use super::filter::Filter;
use super::spectrum::{SpectralCurve, CGS};
use crate::error::SimError;
use crate::io::DataProvider;

/// Reference spectrum plus its magnitude table
pub struct ReferenceSpectrum {
    /// Flux density in erg s⁻¹ cm⁻² Å⁻¹ on a nanometer grid
    curve: SpectralCurve,

    /// Filter name → reference magnitude, populated at most once
    magnitudes: OnceCell<HashMap<String, f64>>,

    /// Source of the magnitude table when loaded lazily
    provider: Option<Arc<dyn DataProvider>>,
}

impl fmt::Debug for ReferenceSpectrum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceSpectrum")
            .field("samples", &self.curve.len())
            .field("magnitudes_loaded", &self.magnitudes.get().is_some())
            .finish()
    }
}

impl ReferenceSpectrum {
    /// Create a reference spectrum with an eagerly supplied magnitude table
    ///
    /// # Arguments
    ///
    /// * `curve` - Flux density in erg s⁻¹ cm⁻² Å⁻¹
    /// * `magnitudes` - Reference magnitude keyed by filter name
    pub fn new(curve: SpectralCurve, magnitudes: HashMap<String, f64>) -> Self {
        Self {
            curve,
            magnitudes: OnceCell::with_value(magnitudes),
            provider: None,
        }
    }

    /// Load the reference spectrum from a provider.
    ///
    /// The spectrum is read immediately; the magnitude table is read on the
    /// first magnitude lookup and cached for the lifetime of this object.
    pub fn from_provider(provider: Arc<dyn DataProvider>) -> Result<Self, SimError> {
        let table = provider.reference_table()?;
        let curve = SpectralCurve::from_angstroms(table.wavelengths, table.values)?;
        Ok(Self {
            curve,
            magnitudes: OnceCell::new(),
            provider: Some(provider),
        })
    }

    /// Flux density curve (wavelengths in nm, erg s⁻¹ cm⁻² Å⁻¹)
    pub fn curve(&self) -> &SpectralCurve {
        &self.curve
    }

    /// Reference flux seen through `filter`.
    ///
    /// On the reference spectrum's own grid, each flux density sample is
    /// multiplied by the filter transmissivity (linearly interpolated, zero
    /// outside the filter) and by the wavelength in angstroms, then summed.
    ///
    /// # Returns
    ///
    /// The summed flux in erg s⁻¹ cm⁻²
    pub fn integrated_flux(&self, filter: &Filter) -> f64 {
        let flux: f64 = self
            .curve
            .wavelengths_nm()
            .iter()
            .zip(self.curve.values())
            .map(|(&wavelength_nm, &flam)| {
                let wavelength_a = wavelength_nm * CGS::ANGSTROM_PER_NM;
                flam * wavelength_a * filter.transmissivity_at(wavelength_nm)
            })
            .sum();

        debug!(
            "Reference flux through {}: {:.6e} erg/s/cm^2",
            filter.name(),
            flux
        );
        flux
    }

    /// Full magnitude table, loading it on first use
    pub fn magnitudes(&self) -> Result<&HashMap<String, f64>, SimError> {
        self.magnitudes.get_or_try_init(|| match &self.provider {
            Some(provider) => provider.reference_magnitudes(),
            None => Err(SimError::not_found("reference magnitude table")),
        })
    }

    /// Reference magnitude in filter `filter_name`
    ///
    /// Returns `SimError::NotFound` if the table has no such filter.
    pub fn magnitude(&self, filter_name: &str) -> Result<f64, SimError> {
        self.magnitudes()?
            .get(filter_name)
            .copied()
            .ok_or_else(|| {
                SimError::not_found(format!("reference magnitude for filter \"{filter_name}\""))
            })
    }
}
