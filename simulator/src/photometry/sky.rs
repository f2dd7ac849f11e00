//! Atmospheric sky transmission
//!
//! Transmittance tables come from the ESO SkyCalc Cerro Paranal Advanced Sky
//! Model (Noll et al. 2012, Jones et al. 2013) and are only available for a
//! discrete set of airmasses.

use log::debug;
use uom::si::f64::Length;

use super::filter::Filter;
use super::spectrum::SpectralCurve;
use crate::algo::misc::interp;
use crate::error::SimError;
use crate::io::DataProvider;

/// Airmass selector for tabulated sky models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Airmass {
    /// Zenith, X = 1.0
    X1_0,
    /// X = 1.5
    X1_5,
}

impl Airmass {
    /// Numeric airmass
    pub fn value(&self) -> f64 {
        match self {
            Airmass::X1_0 => 1.0,
            Airmass::X1_5 => 1.5,
        }
    }
}

impl TryFrom<f64> for Airmass {
    type Error = SimError;

    fn try_from(airmass: f64) -> Result<Self, Self::Error> {
        if airmass == 1.0 {
            Ok(Airmass::X1_0)
        } else if airmass == 1.5 {
            Ok(Airmass::X1_5)
        } else {
            Err(SimError::not_found(format!(
                "sky model for airmass {airmass} (available: 1.0, 1.5)"
            )))
        }
    }
}

/// Per-wavelength atmospheric transmittance
#[derive(Debug, Clone, PartialEq)]
pub struct SkyModel {
    airmass: Option<Airmass>,
    /// Transmittance fraction on a nanometer grid
    curve: SpectralCurve,
}

impl SkyModel {
    /// Create a sky model from an explicit transmittance curve
    pub fn new(wavelengths: &[Length], transmittance: Vec<f64>) -> Result<Self, SimError> {
        Ok(Self::from_curve(SpectralCurve::new(wavelengths, transmittance)?))
    }

    /// Create a sky model from an existing curve (wavelengths in nm)
    pub fn from_curve(curve: SpectralCurve) -> Self {
        Self {
            airmass: None,
            curve,
        }
    }

    /// Cerro Paranal transmittance at the given airmass
    ///
    /// Moehler et al. (2014, A&A 568, A9)
    pub fn from_cerro_paranal(
        provider: &dyn DataProvider,
        airmass: Airmass,
    ) -> Result<Self, SimError> {
        let table = provider.sky_table(airmass)?;
        let curve = SpectralCurve::from_nm(table.wavelengths, table.values)?;
        Ok(Self {
            airmass: Some(airmass),
            curve,
        })
    }

    /// Airmass of a tabulated model, `None` for custom curves
    pub fn airmass(&self) -> Option<Airmass> {
        self.airmass
    }

    /// Transmittance curve (wavelengths in nm)
    pub fn curve(&self) -> &SpectralCurve {
        &self.curve
    }

    /// Resample the transmittance onto the wavelength bins of `filter`.
    ///
    /// Each filter wavelength λᵢ owns the half-open bin
    /// `[λᵢ - Δλ/2, λᵢ + Δλ/2)`, with Δλ the median filter spacing. The
    /// result is the mean of the sky samples falling in each bin. A bin
    /// narrower than the sky sampling holds no samples and takes the sky
    /// curve linearly interpolated at λᵢ instead.
    ///
    /// A filter sample outside the sky table where the filter is opaque
    /// (τ = 0) takes the nearest tabulated transmittance.
    ///
    /// # Errors
    ///
    /// Returns `SimError::NotFound` if a transmitting filter wavelength
    /// (τ > 0) lies outside the sky table.
    pub fn resample(&self, filter: &Filter) -> Result<Vec<f64>, SimError> {
        let sky_wavelengths = self.curve.wavelengths_nm();
        let sky_values = self.curve.values();
        let (sky_min, sky_max) = self.curve.range_nm();
        let half_width = filter.curve().median_spacing_nm() / 2.0;

        let resampled = filter
            .curve()
            .wavelengths_nm()
            .iter()
            .zip(filter.curve().values())
            .map(|(&center, &tau)| {
                if !(sky_min..=sky_max).contains(&center) {
                    if tau == 0.0 {
                        let edge = if center < sky_min {
                            sky_values[0]
                        } else {
                            sky_values[sky_values.len() - 1]
                        };
                        return Ok(edge);
                    }
                    return Err(SimError::not_found(format!(
                        "sky transmittance at {center:.2} nm (table covers {sky_min}..{sky_max} nm)"
                    )));
                }

                let start = sky_wavelengths.partition_point(|&w| w < center - half_width);
                let end = sky_wavelengths.partition_point(|&w| w < center + half_width);

                if end > start {
                    let bin = &sky_values[start..end];
                    Ok(bin.iter().sum::<f64>() / bin.len() as f64)
                } else {
                    Ok(interp(center, sky_wavelengths, sky_values)?)
                }
            })
            .collect::<Result<Vec<f64>, SimError>>()?;

        debug!(
            "Resampled sky transmittance onto {} filter bins of {}",
            resampled.len(),
            filter.name()
        );
        Ok(resampled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn filter_nm(wavelengths: Vec<f64>) -> Filter {
        let values = vec![1.0; wavelengths.len()];
        Filter::from_curve("test", SpectralCurve::from_nm(wavelengths, values).unwrap()).unwrap()
    }

    #[test]
    fn test_airmass_selector() {
        assert_eq!(Airmass::try_from(1.0).unwrap(), Airmass::X1_0);
        assert_eq!(Airmass::try_from(1.5).unwrap(), Airmass::X1_5);
        assert!(matches!(
            Airmass::try_from(2.0),
            Err(SimError::NotFound(_))
        ));
        assert_eq!(Airmass::X1_5.value(), 1.5);
    }

    #[test]
    fn test_resample_bin_average() {
        // Sky sampled every 1nm, filter every 4nm
        let sky_nm: Vec<f64> = (390..=420).map(f64::from).collect();
        let sky_values: Vec<f64> = sky_nm.iter().map(|w| w / 1000.0).collect();
        let sky = SkyModel::from_curve(SpectralCurve::from_nm(sky_nm, sky_values).unwrap());

        let filter = filter_nm(vec![400.0, 404.0, 408.0]);
        let resampled = sky.resample(&filter).unwrap();

        // Bin around 400 is [398, 402): samples 398..=401, mean 399.5
        assert_relative_eq!(resampled[0], 0.3995, epsilon = 1e-12);
        assert_relative_eq!(resampled[1], 0.4035, epsilon = 1e-12);
        assert_relative_eq!(resampled[2], 0.4075, epsilon = 1e-12);
    }

    #[test]
    fn test_resample_sparse_sky_interpolates() {
        let sky = SkyModel::from_curve(
            SpectralCurve::from_nm(vec![300.0, 500.0], vec![0.2, 0.6]).unwrap(),
        );
        let filter = filter_nm(vec![399.5, 400.0, 400.5]);
        let resampled = sky.resample(&filter).unwrap();
        assert_relative_eq!(resampled[1], 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_resample_unit_sky() {
        let sky = SkyModel::from_curve(
            SpectralCurve::from_nm(vec![300.0, 350.0, 900.0, 1000.0], vec![1.0; 4]).unwrap(),
        );
        let filter = filter_nm(vec![400.0, 500.0, 600.0]);
        for t in sky.resample(&filter).unwrap() {
            assert_relative_eq!(t, 1.0);
        }
    }

    #[test]
    fn test_resample_outside_coverage() {
        let sky = SkyModel::from_curve(
            SpectralCurve::from_nm(vec![300.0, 500.0], vec![0.5, 0.5]).unwrap(),
        );
        let filter = filter_nm(vec![450.0, 550.0]);
        assert!(matches!(
            sky.resample(&filter),
            Err(SimError::NotFound(_))
        ));
        assert_eq!(sky.airmass(), None);
    }

    #[test]
    fn test_resample_opaque_tails_outside_coverage() {
        let sky = SkyModel::from_curve(
            SpectralCurve::from_nm(vec![300.0, 400.0, 500.0], vec![0.4, 0.6, 0.8]).unwrap(),
        );

        // Zero-transmission tails start just outside the sky table
        let filter = Filter::from_curve(
            "tails",
            SpectralCurve::from_nm(
                vec![298.0, 350.0, 400.0, 450.0, 502.0],
                vec![0.0, 0.5, 1.0, 0.5, 0.0],
            )
            .unwrap(),
        )
        .unwrap();
        let resampled = sky.resample(&filter).unwrap();
        assert_eq!(resampled.len(), 5);
        assert_relative_eq!(resampled[0], 0.4);
        assert_relative_eq!(resampled[4], 0.8);

        // A transmitting sample outside the table is still an error
        let filter = Filter::from_curve(
            "leaky",
            SpectralCurve::from_nm(vec![298.0, 400.0, 500.0], vec![0.1, 1.0, 0.5]).unwrap(),
        )
        .unwrap();
        assert!(matches!(
            sky.resample(&filter),
            Err(SimError::NotFound(_))
        ));
    }
}
