//! Sampled spectral curves for astronomical photometry
//!
//! This module provides the physical constants used throughout the
//! radiometric pipeline and [`SpectralCurve`], the immutable
//! wavelength/value table backing filters, sky models and the reference
//! spectrum.

use uom::si::f64::Length;

use crate::algo::misc::{interp_or_zero, median_spacing, validate_table};
use crate::error::SimError;
use crate::units::LengthExt;

/// Constants in CGS units
pub struct CGS {}

impl CGS {
    /// Planck's constant
    /// Units: 6.62607015e-27 erg⋅s (erg-seconds in CGS)
    pub const PLANCK_CONSTANT: f64 = 6.62607015e-27;

    /// Speed of light in vacuum
    /// Units: 2.99792458e10 cm/s (centimeters per second in CGS)
    pub const SPEED_OF_LIGHT: f64 = 2.99792458e10;

    /// Boltzmann constant
    /// Units: 1.380649e-16 erg/K
    pub const BOLTZMANN_CONSTANT: f64 = 1.380649e-16;

    /// Centimeters per nanometer
    pub const CM_PER_NM: f64 = 1e-7;

    /// Angstroms per nanometer
    pub const ANGSTROM_PER_NM: f64 = 10.0;

    /// 1 erg s⁻¹ cm⁻² expressed in W m⁻²
    pub const ERG_S_CM2_IN_W_M2: f64 = 1e-3;
}

/// Energy of a single photon at the given wavelength
///
/// E = h * c / λ
///
/// # Arguments
///
/// * `wavelength_nm` - Wavelength in nanometers, must be positive
///
/// # Returns
///
/// Photon energy in erg
pub fn wavelength_to_ergs(wavelength_nm: f64) -> f64 {
    debug_assert!(
        wavelength_nm > 0.0,
        "Wavelength must be positive, got: {wavelength_nm}"
    );
    let wavelength_cm = wavelength_nm * CGS::CM_PER_NM;
    CGS::PLANCK_CONSTANT * CGS::SPEED_OF_LIGHT / wavelength_cm
}

/// Immutable wavelength/value table.
///
/// Wavelengths are stored in nanometers and are strictly increasing; there
/// are always at least two samples and exactly one value per wavelength.
/// Values are dimensionless fractions (transmissivity, transmittance) or a
/// flux density, depending on the owner.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralCurve {
    /// Wavelengths in nanometers (nm)
    wavelengths_nm: Vec<f64>,

    /// Value at each wavelength
    values: Vec<f64>,
}

impl SpectralCurve {
    /// Create a curve from typed wavelengths and matching values
    pub fn new(wavelengths: &[Length], values: Vec<f64>) -> Result<Self, SimError> {
        let wavelengths_nm = wavelengths.iter().map(|w| w.as_nanometers()).collect();
        Self::from_nm(wavelengths_nm, values)
    }

    /// Create a curve from wavelengths in nanometers
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidConfiguration` if:
    /// - The vectors have different lengths or fewer than two samples
    /// - Wavelengths are not finite and strictly ascending
    /// - Any wavelength is not positive
    pub fn from_nm(wavelengths_nm: Vec<f64>, values: Vec<f64>) -> Result<Self, SimError> {
        validate_table(&wavelengths_nm, &values)?;

        if wavelengths_nm[0] <= 0.0 {
            return Err(SimError::invalid(format!(
                "Wavelengths must be positive, got {} nm",
                wavelengths_nm[0]
            )));
        }

        if values.iter().any(|v| !v.is_finite()) {
            return Err(SimError::invalid("Curve values must be finite"));
        }

        Ok(Self {
            wavelengths_nm,
            values,
        })
    }

    /// Create a curve from wavelengths in angstroms (filter and reference tables)
    pub fn from_angstroms(wavelengths_a: Vec<f64>, values: Vec<f64>) -> Result<Self, SimError> {
        let wavelengths_nm = wavelengths_a
            .into_iter()
            .map(|a| a / CGS::ANGSTROM_PER_NM)
            .collect();
        Self::from_nm(wavelengths_nm, values)
    }

    /// Wavelength samples in nanometers
    pub fn wavelengths_nm(&self) -> &[f64] {
        &self.wavelengths_nm
    }

    /// Values at each wavelength sample
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of samples (always at least two)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; a curve holds at least two samples
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Shortest and longest wavelength in nanometers
    pub fn range_nm(&self) -> (f64, f64) {
        (self.wavelengths_nm[0], self.wavelengths_nm[self.len() - 1])
    }

    /// Value-weighted mean wavelength, Σ(λ·v) / Σ(v)
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidConfiguration` when the values sum to zero,
    /// in which case no weighted mean exists.
    pub fn effective_wavelength(&self) -> Result<Length, SimError> {
        let weight: f64 = self.values.iter().sum();
        if weight == 0.0 {
            return Err(SimError::invalid(
                "Effective wavelength undefined for a curve whose values sum to zero",
            ));
        }

        let weighted: f64 = self
            .wavelengths_nm
            .iter()
            .zip(&self.values)
            .map(|(w, v)| w * v)
            .sum();

        Ok(Length::from_nanometers(weighted / weight))
    }

    /// Linearly interpolated value; zero outside the sampled range
    pub fn at(&self, wavelength_nm: f64) -> f64 {
        interp_or_zero(wavelength_nm, &self.wavelengths_nm, &self.values)
    }

    /// Median spacing between consecutive wavelength samples in nanometers
    pub fn median_spacing_nm(&self) -> f64 {
        // At least two samples are guaranteed by construction
        median_spacing(&self.wavelengths_nm).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_effective_wavelength_symmetric() {
        let curve =
            SpectralCurve::from_nm(vec![400.0, 500.0, 600.0], vec![0.5, 1.0, 0.5]).unwrap();
        assert_relative_eq!(
            curve.effective_wavelength().unwrap().as_nanometers(),
            500.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_effective_wavelength_weighted() {
        // (400 * 1 + 600 * 3) / 4 = 550
        let curve = SpectralCurve::from_nm(vec![400.0, 600.0], vec![1.0, 3.0]).unwrap();
        assert_relative_eq!(
            curve.effective_wavelength().unwrap().as_nanometers(),
            550.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_effective_wavelength_zero_weight() {
        let curve = SpectralCurve::from_nm(vec![400.0, 600.0], vec![0.0, 0.0]).unwrap();
        assert!(matches!(
            curve.effective_wavelength(),
            Err(SimError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_typed_and_angstrom_constructors_agree() {
        let typed = SpectralCurve::new(
            &[Length::from_nanometers(400.0), Length::from_nanometers(500.0)],
            vec![0.2, 0.8],
        )
        .unwrap();
        let angstrom = SpectralCurve::from_angstroms(vec![4000.0, 5000.0], vec![0.2, 0.8]).unwrap();

        for (a, b) in typed.wavelengths_nm().iter().zip(angstrom.wavelengths_nm()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_invalid_curves() {
        assert!(matches!(
            SpectralCurve::from_nm(vec![400.0, 500.0], vec![1.0]),
            Err(SimError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            SpectralCurve::from_nm(vec![400.0], vec![1.0]),
            Err(SimError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            SpectralCurve::from_nm(vec![500.0, 400.0], vec![1.0, 1.0]),
            Err(SimError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            SpectralCurve::from_nm(vec![-1.0, 400.0], vec![1.0, 1.0]),
            Err(SimError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            SpectralCurve::from_nm(vec![400.0, 500.0], vec![1.0, f64::NAN]),
            Err(SimError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_at_and_spacing() {
        let curve =
            SpectralCurve::from_nm(vec![400.0, 410.0, 420.0, 450.0], vec![0.0, 1.0, 1.0, 0.0])
                .unwrap();
        assert_relative_eq!(curve.at(405.0), 0.5);
        assert_eq!(curve.at(399.0), 0.0);
        assert_eq!(curve.at(451.0), 0.0);
        assert_relative_eq!(curve.median_spacing_nm(), 10.0);
        assert_eq!(curve.range_nm(), (400.0, 450.0));
    }

    #[test]
    fn test_photon_energy() {
        // h * c / 500nm ≈ 3.973e-12 erg
        assert_relative_eq!(wavelength_to_ergs(500.0), 3.9728917e-12, max_relative = 1e-6);
        assert_relative_eq!(
            wavelength_to_ergs(250.0),
            2.0 * wavelength_to_ergs(500.0),
            max_relative = 1e-12
        );
    }
}
