//! End-to-end exposure simulations against a data directory on disk

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use approx::assert_relative_eq;
use exposure_sim::photometry::CGS;
use exposure_sim::units::{AngleExt, LengthExt, Temperature, TemperatureExt};
use exposure_sim::{
    Airmass, BlackBodyTarget, CatalogTarget, DataDirectory, Filter, Imager, Observation,
    ReferenceSpectrum, SimError, SimulationConfig, SkyModel, Target, Telescope,
    DEFAULT_IMAGE_SIZE,
};
use tempfile::TempDir;
use uom::si::f64::{Angle, Length};

/// Filter curve in angstroms: a smooth bump over [start, end]
fn filter_table(start: f64, end: f64) -> String {
    let mut text = String::from("# wavelength[A] transmissivity\n");
    let steps = 40;
    for i in 0..=steps {
        let w = start + (end - start) * i as f64 / steps as f64;
        let x = (w - start) / (end - start);
        let t = (std::f64::consts::PI * x).sin().powi(2) * 0.9;
        text.push_str(&format!("{w:.3} {t:.6}\n"));
    }
    text
}

/// Builds a data directory with two filters, a flat reference spectrum and
/// both sky tables
fn data_directory() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    for sub in ["filters", "reference", "mags", "sky"] {
        fs::create_dir_all(root.join(sub)).unwrap();
    }

    fs::write(
        root.join("filters/SLOAN_SDSS.z.txt"),
        filter_table(8000.0, 10500.0),
    )
    .unwrap();
    fs::write(
        root.join("filters/Generic_Bessell.V.txt"),
        filter_table(4800.0, 6500.0),
    )
    .unwrap();

    let mut reference = String::new();
    for i in 0..=800 {
        let w = 3000.0 + i as f64 * 10.0;
        reference.push_str(&format!("{w} 3.5e-10\n"));
    }
    fs::write(root.join("reference/alpha_lyr.txt"), reference).unwrap();
    fs::write(
        root.join("mags/vega.json"),
        r#"{"SDSS_z": 0.52, "Bessell_V": 0.03}"#,
    )
    .unwrap();

    for (airmass, transmittance) in [(Airmass::X1_0, 0.9), (Airmass::X1_5, 0.8)] {
        let mut sky = String::new();
        for i in 0..=9000 {
            let w = 300.0 + i as f64 * 0.1;
            sky.push_str(&format!("{w:.1} {transmittance}\n"));
        }
        fs::write(root.join(DataDirectory::sky_path(airmass)), sky).unwrap();
    }

    dir
}

fn telescope() -> Telescope {
    Telescope::new(Length::from_meters(3.5), 0.9).unwrap()
}

fn imager() -> Imager {
    Imager::new(Angle::from_arcseconds(0.114), Angle::from_arcseconds(0.6))
        .unwrap()
        .with_binning(2)
        .unwrap()
}

fn sun() -> Target {
    BlackBodyTarget::new(
        Temperature::from_kelvin(5777.0),
        Length::from_solar_radii(1.0),
        Length::from_au(1.0),
    )
    .unwrap()
    .into()
}

#[test]
fn test_available_filters() {
    let dir = data_directory();
    let data = DataDirectory::new(dir.path());
    let mut names = Filter::available_filters(&data).unwrap();
    names.sort();
    assert_eq!(names, vec!["Bessell_V", "SDSS_z"]);
}

#[test]
fn test_reference_magnitude_gives_unscaled_count() {
    let dir = data_directory();
    let data = Arc::new(DataDirectory::new(dir.path()));
    let reference = ReferenceSpectrum::from_provider(data.clone()).unwrap();
    let filter = Filter::from_name(data.as_ref(), "SDSS_z").unwrap();
    let scope = telescope();

    let target: Target = CatalogTarget::new(0.52, filter.clone()).unwrap().into();
    let count = scope
        .photon_count(&reference, &Observation::new(&target, Duration::from_secs(1)))
        .unwrap();

    let energy = reference.integrated_flux(&filter) * scope.aperture_area_cm2() * 0.9;
    let wavelength_cm = filter.effective_wavelength().unwrap().as_centimeters();
    let photon_energy = CGS::PLANCK_CONSTANT * CGS::SPEED_OF_LIGHT / wavelength_cm;
    assert_relative_eq!(count as f64, (energy / photon_energy).floor(), max_relative = 1e-9);
}

#[test]
fn test_faint_catalog_star_pipeline() {
    let dir = data_directory();
    let data = Arc::new(DataDirectory::new(dir.path()));
    let reference = ReferenceSpectrum::from_provider(data.clone()).unwrap();
    let filter = Filter::from_name(data.as_ref(), "SDSS_z").unwrap();
    let scope = telescope();
    let imager = imager();

    let exposure = Duration::from_secs(45);
    let mut last = u64::MAX;
    for magnitude in [10.0, 14.0, 18.0, 21.42] {
        let target: Target = CatalogTarget::new(magnitude, filter.clone()).unwrap().into();
        let observation = Observation::new(&target, exposure);
        let counts = imager.counts(&scope, &reference, &observation).unwrap();
        assert!(counts < last);
        last = counts;

        let image = imager
            .image(&scope, &reference, &observation, DEFAULT_IMAGE_SIZE)
            .unwrap();
        let sum = image.sum();
        assert!(sum <= counts);
        assert!(counts - sum <= (DEFAULT_IMAGE_SIZE * DEFAULT_IMAGE_SIZE) as u64);
    }
    assert!(last > 0);
}

#[test]
fn test_exposure_monotonic() {
    let dir = data_directory();
    let data = Arc::new(DataDirectory::new(dir.path()));
    let reference = ReferenceSpectrum::from_provider(data.clone()).unwrap();
    let filter = Filter::from_name(data.as_ref(), "Bessell_V").unwrap();
    let target = sun();

    let base = Observation::new(&target, Duration::ZERO).with_filter(&filter);
    let mut last = 0;
    for micros in [0, 1, 10, 100, 1000] {
        let observation = base.with_exposure(Duration::from_micros(micros));
        let count = telescope().photon_count(&reference, &observation).unwrap();
        assert!(count >= last);
        last = count;
    }
    assert_eq!(
        telescope().photon_count(&reference, &base).unwrap(),
        0
    );
}

#[test]
fn test_named_filter_matches_raw_arrays() {
    let dir = data_directory();
    let data = DataDirectory::new(dir.path());
    let named = Filter::from_name(&data, "SDSS_z").unwrap();

    let wavelengths: Vec<Length> = named
        .curve()
        .wavelengths_nm()
        .iter()
        .map(|&nm| Length::from_nanometers(nm))
        .collect();
    let raw = Filter::new("SDSS_z", &wavelengths, named.curve().values().to_vec()).unwrap();

    assert_relative_eq!(
        named.effective_wavelength().unwrap().as_nanometers(),
        raw.effective_wavelength().unwrap().as_nanometers(),
        max_relative = 1e-12
    );
    // Symmetric bump centred on 925 nm
    assert_relative_eq!(
        named.effective_wavelength().unwrap().as_nanometers(),
        925.0,
        max_relative = 1e-6
    );
}

#[test]
fn test_sky_transmission() {
    let dir = data_directory();
    let data = Arc::new(DataDirectory::new(dir.path()));
    let reference = ReferenceSpectrum::from_provider(data.clone()).unwrap();
    let filter = Filter::from_name(data.as_ref(), "Bessell_V").unwrap();
    let target = sun();
    let exposure = Duration::from_micros(10);
    let scope = telescope();

    let clear = Observation::new(&target, exposure).with_filter(&filter);
    let clear_count = scope.photon_count(&reference, &clear).unwrap() as f64;

    let unit_sky = SkyModel::from_curve(
        exposure_sim::SpectralCurve::from_nm(vec![300.0, 1200.0], vec![1.0, 1.0]).unwrap(),
    );
    let unit_count = scope
        .photon_count(&reference, &clear.with_sky(&unit_sky))
        .unwrap() as f64;
    assert_relative_eq!(unit_count, clear_count, max_relative = 1e-12);

    let paranal = SkyModel::from_cerro_paranal(data.as_ref(), Airmass::X1_5).unwrap();
    let hazy_count = scope
        .photon_count(&reference, &clear.with_sky(&paranal))
        .unwrap() as f64;
    assert_relative_eq!(hazy_count / clear_count, 0.8, max_relative = 1e-6);
}

#[test]
fn test_blackbody_image_symmetry() {
    let dir = data_directory();
    let data = Arc::new(DataDirectory::new(dir.path()));
    let reference = ReferenceSpectrum::from_provider(data.clone()).unwrap();
    let filter = Filter::from_name(data.as_ref(), "SDSS_z").unwrap();
    let target = sun();
    let observation = Observation::new(&target, Duration::from_nanos(1)).with_filter(&filter);

    for size in [DEFAULT_IMAGE_SIZE, 21] {
        let image = imager()
            .image(&telescope(), &reference, &observation, size)
            .unwrap();
        for y in 0..size {
            for x in 0..size {
                assert_eq!(image[[y, x]], image[[size - 1 - y, size - 1 - x]]);
            }
        }
    }
}

#[test]
fn test_missing_resources() {
    let dir = data_directory();
    let data = Arc::new(DataDirectory::new(dir.path()));

    assert!(matches!(
        Filter::from_name(data.as_ref(), "Johnson_U"),
        Err(SimError::NotFound(_))
    ));
    assert!(matches!(
        Airmass::try_from(2.0),
        Err(SimError::NotFound(_))
    ));

    // Filter present on disk but absent from the magnitude table
    fs::write(
        dir.path().join("filters/Generic_Bessell.R.txt"),
        filter_table(5500.0, 8000.0),
    )
    .unwrap();
    let reference = ReferenceSpectrum::from_provider(data.clone()).unwrap();
    let filter = Filter::from_name(data.as_ref(), "Bessell_R").unwrap();
    let target: Target = CatalogTarget::new(12.0, filter).unwrap().into();
    assert!(matches!(
        telescope().photon_count(&reference, &Observation::new(&target, Duration::from_secs(1))),
        Err(SimError::NotFound(_))
    ));
}

#[test]
fn test_config_file_end_to_end() {
    let dir = data_directory();
    let data = Arc::new(DataDirectory::new(dir.path()));
    let config_path = dir.path().join("sun.json");
    fs::write(
        &config_path,
        r#"{
            "telescope": { "aperture": "1 m", "throughput": 0.5 },
            "imager": { "plate_scale": "1 arcsec", "seeing": "3 arcsec", "gain": 4.0 },
            "target": { "kind": "blackbody", "temperature": "5777 K", "radius": "1 R_sun", "distance": "1 AU" },
            "filter": "Bessell_V",
            "airmass": 1.0,
            "exposure": "1 us",
            "size": 16
        }"#,
    )
    .unwrap();

    let simulation = SimulationConfig::from_path(&config_path)
        .unwrap()
        .build(data.as_ref())
        .unwrap();
    let reference = ReferenceSpectrum::from_provider(data).unwrap();
    let observation = simulation.observation();

    let photons = simulation
        .telescope
        .photon_count(&reference, &observation)
        .unwrap();
    let counts = simulation
        .imager
        .counts(&simulation.telescope, &reference, &observation)
        .unwrap();
    assert_eq!(counts, (photons as f64 / 4.0).floor() as u64);

    let image = simulation
        .imager
        .image(&simulation.telescope, &reference, &observation, simulation.size)
        .unwrap();
    assert_eq!(image.dim(), (16, 16));
    assert!(counts - image.sum() <= 256);

    let png = dir.path().join("sun.png");
    exposure_sim::image_proc::save_png(&image, &png).unwrap();
    assert!(Path::new(&png).exists());
}
