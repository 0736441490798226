use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use lot_bsp::partition::{CollectingObserver, Partition, PartitionEngine};
use lot_bsp::Lot;
use lot_viz::report::{partition_summary, settings_summary};
use lot_viz::{RoundNavigator, Settings, ViewTransform};
use macroquad::prelude::*;
use tracing_subscriber::EnvFilter;

/// Interactive viewer stepping through the rounds of a partitioning run.
#[derive(Parser, Debug)]
#[command(name = "lot-viz")]
struct Args {
    /// Settings TOML file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the seed from the settings.
    #[arg(long, allow_negative_numbers = true)]
    seed: Option<i64>,
}

/// Runs the engine, recording every round that added lots.
fn record(args: &Args) -> Result<(Lot, RoundNavigator, Partition)> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    println!("{}", settings_summary(&settings));

    let initial = settings.quad_lot();
    let engine = PartitionEngine::new(initial, settings.partition_config())?;
    let mut observer = CollectingObserver::new();
    let partition = engine.run_with_observer(&mut observer);
    println!("{}", partition_summary(&partition));

    let navigator = RoundNavigator::new(initial, observer.into_snapshots());
    Ok((initial, navigator, partition))
}

fn fit_view(initial: &Lot) -> ViewTransform {
    let (min, max) = initial.bounding_box();
    ViewTransform::fit(min, max, f64::from(screen_width()), f64::from(screen_height()), 40.0)
}

#[macroquad::main("Lot Partitioning")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let (initial, mut navigator, partition) = match record(&args) {
        Ok(recorded) => recorded,
        Err(error) => {
            eprintln!("Error: {error:#}");
            return;
        }
    };

    let mut view = fit_view(&initial);
    let mut last_mouse = None;

    loop {
        view.update(&mut last_mouse);
        navigator.update();
        if is_key_pressed(KeyCode::R) {
            view = fit_view(&initial);
        }

        clear_background(Color::from_rgba(20, 20, 30, 255));
        navigator.render(&view);

        draw_text("Lot Partitioning", 10.0, 24.0, 26.0, WHITE);
        draw_text(
            &format!(
                "Seed {} | {:?} with {} lots after {} rounds",
                partition.seed,
                partition.termination,
                partition.lots.len(),
                partition.rounds
            ),
            10.0,
            46.0,
            18.0,
            LIGHTGRAY,
        );
        navigator.draw_ui(70.0);
        draw_text("[R]eset view", 10.0, 130.0, 16.0, GRAY);

        next_frame().await
    }
}
