//! JSON simulation configuration
//!
//! Physical quantities are written as strings with units so a configuration
//! reads the way an observer would describe the setup:
//!
//! ```json
//! {
//!   "telescope": { "aperture": "3.5 m", "throughput": 0.9 },
//!   "imager": { "plate_scale": "0.114 arcsec", "seeing": "0.6 arcsec", "gain": 2.0 },
//!   "target": { "kind": "catalog", "magnitude": 21.42 },
//!   "filter": "SDSS_z",
//!   "exposure": "45 s"
//! }
//! ```
//!
//! Blackbody targets use `{"kind": "blackbody", "temperature": "5777 K",
//! "radius": "1 R_sun", "distance": "1 AU"}` and may add `"airmass": 1.5`
//! for Cerro Paranal sky transmission.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::hardware::{Imager, Telescope, DEFAULT_IMAGE_SIZE};
use crate::io::DataProvider;
use crate::observation::Observation;
use crate::photometry::{Airmass, BlackBodyTarget, CatalogTarget, Filter, SkyModel, Target};
use crate::units::{parse_angle, parse_duration, parse_length, parse_temperature};

fn default_one() -> f64 {
    1.0
}

fn default_binning() -> u32 {
    1
}

fn default_size() -> usize {
    DEFAULT_IMAGE_SIZE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelescopeConfig {
    /// Aperture diameter, e.g. `"3.5 m"`
    pub aperture: String,
    pub throughput: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImagerConfig {
    /// Angle per unbinned pixel, e.g. `"0.114 arcsec"`
    pub plate_scale: String,
    /// Seeing disk, e.g. `"0.6 arcsec"`
    pub seeing: String,
    #[serde(default = "default_binning")]
    pub binning: u32,
    #[serde(default = "default_one")]
    pub quantum_efficiency: f64,
    #[serde(default = "default_one")]
    pub gain: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TargetConfig {
    /// Magnitude in the configured filter
    Catalog { magnitude: f64 },
    BlackBody {
        temperature: String,
        radius: String,
        distance: String,
    },
}

/// Complete description of one simulated exposure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    pub telescope: TelescopeConfig,
    pub imager: ImagerConfig,
    pub target: TargetConfig,
    /// Filter name as served by the data provider, e.g. `"SDSS_z"`
    pub filter: String,
    /// Tabulated sky airmass (1.0 or 1.5); no sky transmission when absent
    #[serde(default)]
    pub airmass: Option<f64>,
    /// Exposure duration, e.g. `"45 s"`
    pub exposure: String,
    /// Image width and height in pixels
    #[serde(default = "default_size")]
    pub size: usize,
}

/// Ready-to-run simulation objects built from a [`SimulationConfig`]
#[derive(Debug, Clone)]
pub struct Simulation {
    pub telescope: Telescope,
    pub imager: Imager,
    pub target: Target,
    pub filter: Filter,
    pub sky: Option<SkyModel>,
    pub exposure: Duration,
    pub size: usize,
}

impl Simulation {
    /// Observation described by this simulation
    pub fn observation(&self) -> Observation<'_> {
        let observation =
            Observation::new(&self.target, self.exposure).with_filter(&self.filter);
        match &self.sky {
            Some(sky) => observation.with_sky(sky),
            None => observation,
        }
    }
}

impl SimulationConfig {
    /// Parse a configuration from JSON text
    pub fn from_json(text: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a configuration from a JSON file
    pub fn from_path(path: &Path) -> Result<Self, SimError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse every quantity and load the filter and sky data it references
    pub fn build(&self, provider: &dyn DataProvider) -> Result<Simulation, SimError> {
        let telescope = Telescope::new(
            parse_length(&self.telescope.aperture)?,
            self.telescope.throughput,
        )?;

        let imager = Imager::new(
            parse_angle(&self.imager.plate_scale)?,
            parse_angle(&self.imager.seeing)?,
        )?
        .with_binning(self.imager.binning)?
        .with_quantum_efficiency(self.imager.quantum_efficiency)?
        .with_gain(self.imager.gain)?;

        let filter = Filter::from_name(provider, &self.filter)?;

        let target = match &self.target {
            TargetConfig::Catalog { magnitude } => {
                CatalogTarget::new(*magnitude, filter.clone())?.into()
            }
            TargetConfig::BlackBody {
                temperature,
                radius,
                distance,
            } => BlackBodyTarget::new(
                parse_temperature(temperature)?,
                parse_length(radius)?,
                parse_length(distance)?,
            )?
            .into(),
        };

        let sky = self
            .airmass
            .map(|airmass| SkyModel::from_cerro_paranal(provider, Airmass::try_from(airmass)?))
            .transpose()?;

        if self.size == 0 {
            return Err(SimError::invalid("Image size must be at least 1 pixel"));
        }

        Ok(Simulation {
            telescope,
            imager,
            target,
            filter,
            sky,
            exposure: parse_duration(&self.exposure)?,
            size: self.size,
        })
    }
}
