//! Data providers for filter curves, the reference spectrum and sky tables.
//!
//! The radiometric core never touches the filesystem directly; it asks a
//! [`DataProvider`] for raw two-column tables. [`DataDirectory`] serves them
//! from a directory laid out as:
//!
//! ```text
//! filters/<prefix>_<Name with '_' as '.'>.txt   e.g. filters/SLOAN_SDSS.z.txt
//! reference/alpha_lyr.txt                       Å, erg s⁻¹ cm⁻² Å⁻¹
//! mags/vega.json                                {"SDSS_z": 0.52, ...}
//! sky/CerroParanalAdvancedSkyModel_X1.0.txt     nm, transmittance
//! sky/CerroParanalAdvancedSkyModel_X1.5.txt
//! ```
//!
//! Tables are whitespace separated; blank lines and `#` comments are skipped.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::SimError;
use crate::photometry::sky::Airmass;

/// Raw two-column numeric table as read from a data source
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralTable {
    /// First column (wavelength, unit depends on the table)
    pub wavelengths: Vec<f64>,
    /// Second column
    pub values: Vec<f64>,
}

/// Source of the tabulated data the exposure pipeline consumes
pub trait DataProvider: Send + Sync {
    /// Filter transmissivity curve: wavelength in Å, transmissivity in [0, 1]
    ///
    /// Returns `SimError::NotFound` when no filter matches `name`.
    fn filter_table(&self, name: &str) -> Result<SpectralTable, SimError>;

    /// Names of every filter this provider can serve
    fn filter_names(&self) -> Result<Vec<String>, SimError>;

    /// Reference spectrum: wavelength in Å, flux density in erg s⁻¹ cm⁻² Å⁻¹
    fn reference_table(&self) -> Result<SpectralTable, SimError>;

    /// Reference magnitude of the reference star per filter name
    fn reference_magnitudes(&self) -> Result<HashMap<String, f64>, SimError>;

    /// Atmospheric transmittance: wavelength in nm, fraction in [0, 1]
    fn sky_table(&self, airmass: Airmass) -> Result<SpectralTable, SimError>;
}

/// Parse a whitespace separated two-column table
///
/// # Arguments
///
/// * `text` - Table contents
/// * `source` - Name of the table, used in error messages
pub fn parse_table(text: &str, source: &str) -> Result<SpectralTable, SimError> {
    let mut wavelengths = Vec::new();
    let mut values = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let columns: Vec<&str> = line.split_whitespace().collect();
        if columns.len() != 2 {
            return Err(SimError::Parse(format!(
                "{source}:{}: expected 2 columns, found {}",
                line_no + 1,
                columns.len()
            )));
        }

        let parse = |s: &str| {
            s.parse::<f64>().map_err(|_| {
                SimError::Parse(format!("{source}:{}: invalid number '{s}'", line_no + 1))
            })
        };
        wavelengths.push(parse(columns[0])?);
        values.push(parse(columns[1])?);
    }

    Ok(SpectralTable {
        wavelengths,
        values,
    })
}

/// Filter name encoded in a filter file name, e.g. `SLOAN_SDSS.z.txt` → `SDSS_z`
fn filter_name_from_file(file_name: &str) -> Option<String> {
    let stem = file_name.strip_suffix(".txt")?;
    let (_, encoded) = stem.split_once('_')?;
    Some(encoded.replace('.', "_"))
}

/// Directory-backed [`DataProvider`]
#[derive(Debug, Clone)]
pub struct DataDirectory {
    root: PathBuf,
}

impl DataDirectory {
    pub const FILTERS_DIR: &'static str = "filters";
    pub const REFERENCE_SPECTRUM: &'static str = "reference/alpha_lyr.txt";
    pub const REFERENCE_MAGNITUDES: &'static str = "mags/vega.json";

    /// Create a provider rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the data tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Relative path of the sky table for an airmass
    pub fn sky_path(airmass: Airmass) -> String {
        format!(
            "sky/CerroParanalAdvancedSkyModel_X{:.1}.txt",
            airmass.value()
        )
    }

    fn read_table(&self, path: &Path) -> Result<SpectralTable, SimError> {
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                SimError::not_found(format!("data table {}", path.display()))
            }
            _ => SimError::Io(e),
        })?;
        let table = parse_table(&text, &path.display().to_string())?;
        debug!("Read {} rows from {}", table.values.len(), path.display());
        Ok(table)
    }

    /// Filter files as (name, path) pairs, sorted by file name
    fn filter_files(&self) -> Result<Vec<(String, PathBuf)>, SimError> {
        let dir = self.root.join(Self::FILTERS_DIR);
        let entries = fs::read_dir(&dir).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                SimError::not_found(format!("filter directory {}", dir.display()))
            }
            _ => SimError::Io(e),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(filter_name_from_file);
            if let Some(name) = name {
                files.push((name, path));
            }
        }
        files.sort_by(|a, b| a.1.cmp(&b.1));
        Ok(files)
    }
}

impl DataProvider for DataDirectory {
    fn filter_table(&self, name: &str) -> Result<SpectralTable, SimError> {
        let (_, path) = self
            .filter_files()?
            .into_iter()
            .find(|(candidate, _)| candidate == name)
            .ok_or_else(|| SimError::not_found(format!("No filter found matching name \"{name}\"")))?;

        info!("Loading filter {} from {}", name, path.display());
        self.read_table(&path)
    }

    fn filter_names(&self) -> Result<Vec<String>, SimError> {
        Ok(self
            .filter_files()?
            .into_iter()
            .map(|(name, _)| name)
            .collect())
    }

    fn reference_table(&self) -> Result<SpectralTable, SimError> {
        info!("Loading reference spectrum");
        self.read_table(&self.root.join(Self::REFERENCE_SPECTRUM))
    }

    fn reference_magnitudes(&self) -> Result<HashMap<String, f64>, SimError> {
        let path = self.root.join(Self::REFERENCE_MAGNITUDES);
        info!("Loading reference magnitudes from {}", path.display());
        let text = fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                SimError::not_found(format!("magnitude table {}", path.display()))
            }
            _ => SimError::Io(e),
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    fn sky_table(&self, airmass: Airmass) -> Result<SpectralTable, SimError> {
        info!("Loading sky transmission for airmass {}", airmass.value());
        self.read_table(&self.root.join(Self::sky_path(airmass)))
    }
}
