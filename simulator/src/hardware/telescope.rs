//! Telescope light collection: the radiometric core of the simulator.
//!
//! A [`Telescope`] turns a target's brightness into the number of photons
//! delivered to the detector during an exposure. The algorithm depends on how
//! the target's brightness is described:
//!
//! - **Catalog magnitude** (relative flux): the reference star's flux through
//!   the target's filter is scaled by `10^(0.4·(m_ref − m))` and converted to
//!   photons at the filter's effective wavelength.
//! - **Blackbody** (absolute flux): the Planck spectrum is integrated sample
//!   by sample over the filter's wavelength grid, optionally attenuated by
//!   atmospheric transmission, and each sample is converted to photons at its
//!   own wavelength.
//!
//! All arithmetic is carried out in CGS units (erg, cm, s). Photon counts are
//! truncated toward zero, never rounded.

use std::f64::consts::PI;
use std::time::Duration;

use log::debug;
use uom::si::f64::Length;

use crate::error::SimError;
use crate::observation::Observation;
use crate::photometry::spectrum::wavelength_to_ergs;
use crate::photometry::{
    BlackBodyTarget, CatalogTarget, Filter, ReferenceSpectrum, SkyModel, Target, CGS,
};
use crate::units::{is_positive, LengthExt};

/// Flux ratio between a source of magnitude `magnitude` and a reference of
/// magnitude `reference_magnitude`.
///
/// A source fainter than the reference (`magnitude > reference_magnitude`)
/// gives a ratio below one.
pub fn flux_ratio(magnitude: f64, reference_magnitude: f64) -> f64 {
    10f64.powf(0.4 * (reference_magnitude - magnitude))
}

// Truncate a non-negative photon total to a count. Totals beyond the u64
// range are rejected, never saturated.
pub(crate) fn truncate_count(photons: f64) -> Result<u64, SimError> {
    if !photons.is_finite() || photons < 0.0 {
        return Err(SimError::invalid(format!(
            "Photon total must be finite and non-negative, got {photons}"
        )));
    }
    if photons >= u64::MAX as f64 {
        return Err(SimError::invalid(format!(
            "Photon total {photons:.6e} exceeds the representable count range, shorten the exposure"
        )));
    }
    Ok(photons.floor() as u64)
}

/// Telescope aperture and optical throughput
#[derive(Debug, Clone, PartialEq)]
pub struct Telescope {
    /// Clear aperture diameter
    aperture_diameter: Length,
    /// Total optical efficiency (0.0-1.0)
    throughput: f64,
}

impl Telescope {
    /// Create a new telescope
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidConfiguration` if the aperture is not
    /// positive or the throughput is outside [0, 1].
    pub fn new(aperture_diameter: Length, throughput: f64) -> Result<Self, SimError> {
        if !is_positive(aperture_diameter.as_meters()) {
            return Err(SimError::invalid(format!(
                "Aperture diameter must be positive, got {} m",
                aperture_diameter.as_meters()
            )));
        }
        if !(0.0..=1.0).contains(&throughput) {
            return Err(SimError::invalid(format!(
                "Throughput must be within [0, 1], got {throughput}"
            )));
        }

        Ok(Self {
            aperture_diameter,
            throughput,
        })
    }

    /// Telescope whose circular aperture has an area of exactly 1 m²
    pub fn with_unit_area(throughput: f64) -> Result<Self, SimError> {
        Self::new(Length::from_meters(2.0 * (1.0 / PI).sqrt()), throughput)
    }

    pub fn aperture_diameter(&self) -> Length {
        self.aperture_diameter
    }

    pub fn throughput(&self) -> f64 {
        self.throughput
    }

    /// Collecting area π(D/2)² in cm²
    pub fn aperture_area_cm2(&self) -> f64 {
        let radius_cm = self.aperture_diameter.as_centimeters() / 2.0;
        PI * radius_cm * radius_cm
    }

    /// Number of photons collected during an observation.
    ///
    /// Dispatches on the target kind; see the module documentation.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the catalog filter has no reference magnitude, or the
    ///   sky table does not cover the filter
    /// - `InvalidConfiguration` if a blackbody target has no filter, a
    ///   catalog target is given a sky model or a filter other than its own
    pub fn photon_count(
        &self,
        reference: &ReferenceSpectrum,
        observation: &Observation,
    ) -> Result<u64, SimError> {
        match observation.target() {
            Target::Catalog(target) => {
                if observation.sky().is_some() {
                    return Err(SimError::invalid(
                        "Sky transmission is not applied to catalog magnitudes",
                    ));
                }
                if let Some(filter) = observation.filter() {
                    if filter.name() != target.filter().name() {
                        return Err(SimError::invalid(format!(
                            "Catalog magnitude is in {}, cannot observe through {}",
                            target.filter().name(),
                            filter.name()
                        )));
                    }
                }
                self.relative_photon_count(reference, target, observation.exposure())
            }
            Target::BlackBody(target) => {
                let filter = observation.filter().ok_or_else(|| {
                    SimError::invalid("A blackbody target needs a filter to observe through")
                })?;
                self.absolute_photon_count(target, filter, observation.sky(), observation.exposure())
            }
        }
    }

    /// Photons from a catalog-magnitude target, relative to the reference star
    pub fn relative_photon_count(
        &self,
        reference: &ReferenceSpectrum,
        target: &CatalogTarget,
        exposure: Duration,
    ) -> Result<u64, SimError> {
        let filter = target.filter();
        let reference_magnitude = reference.magnitude(filter.name())?;
        let ratio = flux_ratio(target.magnitude(), reference_magnitude);

        // erg s⁻¹ cm⁻²
        let reference_flux = reference.integrated_flux(filter);

        // erg
        let detected_energy = ratio
            * reference_flux
            * self.aperture_area_cm2()
            * self.throughput
            * exposure.as_secs_f64();

        // E = h ν, ν = c / λ_eff
        let wavelength_nm = filter.effective_wavelength()?.as_nanometers();
        let photon_energy = wavelength_to_ergs(wavelength_nm);

        debug!(
            "Relative flux: m={} m_ref={} ratio={:.6e} λ_eff={:.2}nm energy={:.6e}erg",
            target.magnitude(),
            reference_magnitude,
            ratio,
            wavelength_nm,
            detected_energy
        );

        truncate_count(detected_energy / photon_energy)
    }

    /// Photons from a blackbody, integrated over the filter's wavelength grid.
    ///
    /// Every filter sample is weighted by the median filter spacing Δλ rather
    /// than its own spacing.
    pub fn absolute_photon_count(
        &self,
        target: &BlackBodyTarget,
        filter: &Filter,
        sky: Option<&SkyModel>,
        exposure: Duration,
    ) -> Result<u64, SimError> {
        let wavelengths_nm = filter.curve().wavelengths_nm();
        let transmissivity = filter.curve().values();
        let delta_cm = filter.curve().median_spacing_nm() * CGS::CM_PER_NM;

        let sky_transmittance = match sky {
            Some(sky) => sky.resample(filter)?,
            None => vec![1.0; wavelengths_nm.len()],
        };

        // Wavelength independent part of the energy rate: π sr (R/d)² A Δλ
        let geometry = target.dilution() * self.aperture_area_cm2() * delta_cm;
        let seconds = exposure.as_secs_f64();

        let filtered_photons: f64 = wavelengths_nm
            .iter()
            .zip(transmissivity)
            .zip(&sky_transmittance)
            .map(|((&wavelength_nm, &tau), &sky_t)| {
                let energy_rate = target.irradiance_nm(wavelength_nm) * sky_t * geometry;
                let energy = energy_rate * seconds;
                tau * energy / wavelength_to_ergs(wavelength_nm)
            })
            .sum();

        debug!(
            "Absolute flux through {}: Δλ={:.4}nm photons before throughput={:.6e}",
            filter.name(),
            delta_cm / CGS::CM_PER_NM,
            filtered_photons
        );

        truncate_count(self.throughput * filtered_photons)
    }
}
