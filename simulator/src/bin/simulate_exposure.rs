//! Exposure simulator
//!
//! Runs one configured observation through the telescope and detector models
//! and reports the photon count, detector counts and rendered image totals.
//!
//! Usage:
//! ```text
//! cargo run --release --bin simulate_exposure -- --data-dir data --config sun.json --output sun.png
//! cargo run --release --bin simulate_exposure -- --data-dir data --list-filters
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use exposure_sim::image_proc::save_png;
use exposure_sim::{DataDirectory, Filter, ReferenceSpectrum, SimulationConfig};
use log::{info, LevelFilter};

#[derive(Parser, Debug)]
#[command(
    name = "Exposure Simulator",
    about = "Simulates photon counts and a point-source image for a telescope exposure",
    long_about = None
)]
struct Args {
    /// Directory holding filters/, reference/, mags/ and sky/ tables
    #[arg(long)]
    data_dir: PathBuf,

    /// JSON simulation configuration
    #[arg(long, required_unless_present = "list_filters")]
    config: Option<PathBuf>,

    /// List the available filters and exit
    #[arg(long)]
    list_filters: bool,

    /// Override the image size from the configuration (pixels)
    #[arg(long)]
    size: Option<usize>,

    /// Save the rendered image as a 16-bit PNG
    #[arg(long)]
    output: Option<PathBuf>,

    /// Log intermediate radiometric quantities
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    let data = Arc::new(DataDirectory::new(args.data_dir.clone()));

    if args.list_filters {
        for name in Filter::available_filters(data.as_ref())? {
            println!("{name}");
        }
        return Ok(());
    }

    let config_path = args
        .config
        .ok_or("--config is required unless --list-filters is given")?;
    let config = SimulationConfig::from_path(&config_path)?;
    let mut simulation = config.build(data.as_ref())?;
    if let Some(size) = args.size {
        simulation.size = size;
    }

    let reference = ReferenceSpectrum::from_provider(data)?;
    let observation = simulation.observation();
    info!(
        "Simulating {:?} exposure through {}",
        simulation.exposure,
        simulation.filter.name()
    );

    let photons = simulation
        .telescope
        .photon_count(&reference, &observation)?;
    let counts = simulation
        .imager
        .counts(&simulation.telescope, &reference, &observation)?;
    let image = simulation.imager.image(
        &simulation.telescope,
        &reference,
        &observation,
        simulation.size,
    )?;

    println!("Photon count: {photons}");
    println!("Counts:       {counts}");
    println!("Image sum:    {}", image.sum());
    println!(
        "Image max:    {}",
        image.iter().copied().max().unwrap_or(0)
    );

    if let Some(output) = args.output {
        save_png(&image, &output)?;
        println!("Saved image to {}", output.display());
    }

    Ok(())
}
