//! Type-safe physical units for exposure simulations
//!
//! This module provides strongly-typed units using the `uom` crate to prevent
//! unit confusion errors at compile time, plus parsers that turn strings such
//! as `"3.5 m"` or `"0.114 arcsec"` into typed quantities for configuration
//! files. Exposure durations use `std::time::Duration`.

use std::time::Duration;

use uom::si::angle::{degree, minute as arcminute, radian, second as arcsecond};
use uom::si::f64::{Angle, Length, ThermodynamicTemperature};
use uom::si::length::{
    angstrom, centimeter, kilometer, meter, micrometer, millimeter, nanometer, parsec,
};
use uom::si::thermodynamic_temperature::{degree_celsius, kelvin};

use crate::error::SimError;

/// Type alias for temperature with convenient methods
pub type Temperature = ThermodynamicTemperature;

/// Nominal solar radius in meters (IAU 2015 Resolution B3)
pub const SOLAR_RADIUS_M: f64 = 6.957e8;

/// Astronomical unit in meters (IAU 2012 Resolution B2)
pub const AU_M: f64 = 1.495978707e11;

/// True for finite values strictly greater than zero
pub(crate) fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Extension trait for temperature conversions
pub trait TemperatureExt {
    /// Create temperature from Kelvin
    fn from_kelvin(kelvin: f64) -> Self;

    /// Get temperature in Kelvin
    fn as_kelvin(&self) -> f64;

    /// Create temperature from degrees Celsius
    fn from_celsius(celsius: f64) -> Self;
}

/// Extension trait for length conversions used for wavelengths and optics
pub trait LengthExt {
    /// Create length from angstroms (filter and reference tables)
    fn from_angstroms(a: f64) -> Self;

    /// Get length in angstroms
    fn as_angstroms(&self) -> f64;

    /// Create length from nanometers (wavelengths)
    fn from_nanometers(nm: f64) -> Self;

    /// Get length in nanometers
    fn as_nanometers(&self) -> f64;

    /// Get length in centimeters
    fn as_centimeters(&self) -> f64;

    /// Create length from meters
    fn from_meters(m: f64) -> Self;

    /// Get length in meters
    fn as_meters(&self) -> f64;

    /// Create length from astronomical units
    fn from_au(au: f64) -> Self;

    /// Create length from nominal solar radii
    fn from_solar_radii(r: f64) -> Self;
}

/// Extension trait for on-sky angles (plate scale, seeing)
pub trait AngleExt {
    /// Create angle from arcseconds
    fn from_arcseconds(arcsec: f64) -> Self;

    /// Get angle in arcseconds
    fn as_arcseconds(&self) -> f64;
}

impl TemperatureExt for Temperature {
    fn from_kelvin(k: f64) -> Self {
        Temperature::new::<kelvin>(k)
    }

    fn as_kelvin(&self) -> f64 {
        self.get::<kelvin>()
    }

    fn from_celsius(celsius: f64) -> Self {
        Temperature::new::<degree_celsius>(celsius)
    }
}

impl LengthExt for Length {
    fn from_angstroms(a: f64) -> Self {
        Length::new::<angstrom>(a)
    }

    fn as_angstroms(&self) -> f64 {
        self.get::<angstrom>()
    }

    fn from_nanometers(nm: f64) -> Self {
        Length::new::<nanometer>(nm)
    }

    fn as_nanometers(&self) -> f64 {
        self.get::<nanometer>()
    }

    fn as_centimeters(&self) -> f64 {
        self.get::<centimeter>()
    }

    fn from_meters(m: f64) -> Self {
        Length::new::<meter>(m)
    }

    fn as_meters(&self) -> f64 {
        self.get::<meter>()
    }

    fn from_au(au: f64) -> Self {
        Length::new::<meter>(au * AU_M)
    }

    fn from_solar_radii(r: f64) -> Self {
        Length::new::<meter>(r * SOLAR_RADIUS_M)
    }
}

impl AngleExt for Angle {
    fn from_arcseconds(arcsec: f64) -> Self {
        Angle::new::<arcsecond>(arcsec)
    }

    fn as_arcseconds(&self) -> f64 {
        self.get::<arcsecond>()
    }
}

/// Physical dimension of a unit symbol accepted by the parsers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dimension {
    Length,
    Angle,
    Time,
    Temperature,
}

impl Dimension {
    fn name(&self) -> &'static str {
        match self {
            Dimension::Length => "length",
            Dimension::Angle => "angle",
            Dimension::Time => "time",
            Dimension::Temperature => "temperature",
        }
    }
}

fn dimension_of(unit: &str) -> Option<Dimension> {
    match unit {
        "A" | "Angstrom" | "angstrom" | "Å" | "nm" | "um" | "µm" | "mm" | "cm" | "m" | "km"
        | "AU" | "au" | "pc" | "R_sun" | "Rsun" => Some(Dimension::Length),
        "arcsec" | "\"" | "arcmin" | "'" | "deg" | "rad" => Some(Dimension::Angle),
        "us" | "ms" | "s" | "min" | "h" => Some(Dimension::Time),
        "K" | "C" => Some(Dimension::Temperature),
        _ => None,
    }
}

/// Split a quantity string into its numeric value and unit symbol.
///
/// Accepts both `"3.5 m"` and `"3.5m"`. A bare number has an empty unit.
pub fn split_quantity(s: &str) -> Result<(f64, String), SimError> {
    let s = s.trim();

    // Longest prefix that parses as a float is the value
    let mut split_at = None;
    for (idx, _) in s.char_indices().chain(std::iter::once((s.len(), ' '))).rev() {
        if idx > 0 && s[..idx].trim().parse::<f64>().is_ok() {
            split_at = Some(idx);
            break;
        }
    }

    let idx = split_at.ok_or_else(|| SimError::Parse(format!("No numeric value in '{s}'")))?;
    let value: f64 = s[..idx]
        .trim()
        .parse()
        .map_err(|_| SimError::Parse(format!("Invalid numeric value in '{s}'")))?;
    Ok((value, s[idx..].trim().to_string()))
}

fn expect_dimension(s: &str, expected: Dimension) -> Result<(f64, String), SimError> {
    let (value, unit) = split_quantity(s)?;
    match dimension_of(&unit) {
        Some(dim) if dim == expected => Ok((value, unit)),
        _ => Err(SimError::UnitMismatch {
            expected: expected.name().to_string(),
            found: unit,
        }),
    }
}

/// Parse a length such as `"3.5 m"`, `"6563 A"` or `"1 AU"`
pub fn parse_length(s: &str) -> Result<Length, SimError> {
    let (value, unit) = expect_dimension(s, Dimension::Length)?;
    let length = match unit.as_str() {
        "A" | "Angstrom" | "angstrom" | "Å" => Length::new::<angstrom>(value),
        "nm" => Length::new::<nanometer>(value),
        "um" | "µm" => Length::new::<micrometer>(value),
        "mm" => Length::new::<millimeter>(value),
        "cm" => Length::new::<centimeter>(value),
        "m" => Length::new::<meter>(value),
        "km" => Length::new::<kilometer>(value),
        "AU" | "au" => Length::from_au(value),
        "pc" => Length::new::<parsec>(value),
        _ => Length::from_solar_radii(value),
    };
    Ok(length)
}

/// Parse an on-sky angle such as `"0.114 arcsec"` or `"1 deg"`
pub fn parse_angle(s: &str) -> Result<Angle, SimError> {
    let (value, unit) = expect_dimension(s, Dimension::Angle)?;
    let angle = match unit.as_str() {
        "arcsec" | "\"" => Angle::new::<arcsecond>(value),
        "arcmin" | "'" => Angle::new::<arcminute>(value),
        "deg" => Angle::new::<degree>(value),
        _ => Angle::new::<radian>(value),
    };
    Ok(angle)
}

/// Parse a temperature such as `"5777 K"`
pub fn parse_temperature(s: &str) -> Result<Temperature, SimError> {
    let (value, unit) = expect_dimension(s, Dimension::Temperature)?;
    match unit.as_str() {
        "C" => Ok(Temperature::from_celsius(value)),
        _ => Ok(Temperature::from_kelvin(value)),
    }
}

/// Parse an exposure duration such as `"45 s"`, `"150ms"` or `"2 min"`
pub fn parse_duration(s: &str) -> Result<Duration, SimError> {
    let (value, unit) = expect_dimension(s, Dimension::Time)?;

    if !value.is_finite() || value < 0.0 {
        return Err(SimError::invalid(format!(
            "Duration must be finite and non-negative, got {s}"
        )));
    }

    let seconds = match unit.as_str() {
        "us" => value * 1e-6,
        "ms" => value * 1e-3,
        "min" => value * 60.0,
        "h" => value * 3600.0,
        _ => value,
    };
    Ok(Duration::from_secs_f64(seconds))
}
