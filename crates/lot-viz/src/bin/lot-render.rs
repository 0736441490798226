//! Headless lot partitioning: reads TOML settings, runs the engine and
//! writes the resulting layout as a PNG.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use lot_bsp::partition::{FnObserver, PartitionEngine};
use lot_viz::raster::{self, Palette};
use lot_viz::report::{partition_summary, settings_summary};
use lot_viz::Settings;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Subdivides a quadrilateral into lots and renders the result.
#[derive(Parser, Debug)]
#[command(name = "lot-render")]
#[command(about = "Partitions a quadrilateral into lots and renders them to PNG")]
struct Args {
    /// Path to the settings TOML file.
    #[arg(short, long, default_value = "lots.toml")]
    config: PathBuf,

    /// Write a default settings file to --config and exit.
    #[arg(long)]
    create_config: bool,

    /// Output image path.
    #[arg(short, long, default_value = "lots.png")]
    output: PathBuf,

    /// Also write an image after every round that added lots.
    #[arg(long)]
    save_progress: bool,

    /// Override the seed from the settings file.
    #[arg(long, allow_negative_numbers = true)]
    seed: Option<i64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if args.create_config {
        Settings::write_default(&args.config)?;
        println!("Created default settings: {}", args.config.display());
        return Ok(());
    }

    println!("Loading settings from: {}", args.config.display());
    let mut settings = Settings::load(&args.config)
        .with_context(|| format!("Run with --create-config to write a default {}", args.config.display()))?;
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    println!("{}\n", settings_summary(&settings));

    let initial = settings.quad_lot();
    let palette = Palette::default();
    let engine = PartitionEngine::new(initial, settings.partition_config())?;

    let mut progress_error = None;
    let partition = if args.save_progress {
        let mut observer = FnObserver::new(|round, lots: &[lot_bsp::Lot]| {
            if progress_error.is_some() {
                return;
            }
            let path = progress_path(&args.output, lots.len());
            let img = raster::render(lots, &initial, settings.image_width, settings.image_height, &palette);
            match raster::save_png(&img, &path) {
                Ok(()) => info!(round, path = %path.display(), "saved progress image"),
                Err(error) => progress_error = Some(error),
            }
        });
        engine.run_with_observer(&mut observer)
    } else {
        engine.run()
    };
    if let Some(error) = progress_error {
        return Err(error);
    }

    println!("{}\n", partition_summary(&partition));

    let img = raster::render(&partition.lots, &initial, settings.image_width, settings.image_height, &palette);
    raster::save_png(&img, &args.output)?;
    println!("Saved: {}", args.output.display());

    Ok(())
}

/// `progress_<lots>_lots.png` next to the output image.
fn progress_path(output: &Path, lots: usize) -> PathBuf {
    let name = format!("progress_{lots:03}_lots.png");
    match output.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}
