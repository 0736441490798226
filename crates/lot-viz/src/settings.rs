//! TOML settings shared by the viewer and the renderer.

use std::path::Path;

use anyhow::{Context, Result};
use lot_bsp::partition::{PartitionConfig, SplitCountPolicy, SplitRange};
use lot_bsp::{Lot, Point};
use serde::Deserialize;

/// Root settings for a partitioning run and its image.
///
/// Every key is optional; missing keys take the default value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Output image size in pixels. The quad must fit inside.
    pub image_width: u32,
    pub image_height: u32,
    pub min_splits_x: u32,
    pub min_splits_y: u32,
    pub max_splits_x: u32,
    pub max_splits_y: u32,
    /// Target lot count; not always reachable.
    pub min_amount_of_lots: usize,
    pub min_lot_width: f64,
    pub min_lot_height: f64,
    pub max_lot_width: f64,
    pub max_lot_height: f64,
    /// Corners of the initial lot: top-left, top-right, bottom-right,
    /// bottom-left.
    pub quad: [[f64; 2]; 4],
    pub seed: i64,
    pub split_policy: SplitCountPolicy,
    /// Spatial index cell size.
    pub cell_size: f64,
    /// Round ceiling; defaults to twenty rounds per target lot.
    pub max_rounds: Option<usize>,
    pub stagnation_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            image_width: 1300,
            image_height: 1300,
            min_splits_x: 1,
            min_splits_y: 1,
            max_splits_x: 5,
            max_splits_y: 5,
            min_amount_of_lots: 45,
            min_lot_width: 125.0,
            min_lot_height: 155.0,
            max_lot_width: 1000.0,
            max_lot_height: 1000.0,
            quad: [[100.0, 200.0], [600.0, 200.0], [650.0, 1200.0], [150.0, 1100.0]],
            seed: 333,
            split_policy: SplitCountPolicy::Geometric,
            cell_size: 100.0,
            max_rounds: None,
            stagnation_limit: 15,
        }
    }
}

const DEFAULT_FILE: &str = r#"# Lot partitioning settings

# Size of the generated image; every quad corner must lie inside it
image_width = 1300
image_height = 1300

# Children per split along each axis
min_splits_x = 1
min_splits_y = 1
max_splits_x = 5
max_splits_y = 5

# Target lot count (not always reachable, depends on the sizes below)
min_amount_of_lots = 45

# Lot size bounds
min_lot_width = 125.0
min_lot_height = 155.0
max_lot_width = 1000.0
max_lot_height = 1000.0

# Initial quad: top-left, top-right, bottom-right, bottom-left
quad = [[100.0, 200.0], [600.0, 200.0], [650.0, 1200.0], [150.0, 1100.0]]

# Change the seed to get a different layout
seed = 333

# "geometric" derives the child count from the lot size, "random" draws it
split_policy = "geometric"

cell_size = 100.0
stagnation_limit = 15
# max_rounds = 900
"#;

impl Settings {
    /// Load settings from a TOML file and validate them.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        let settings = Self::parse(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from TOML text without validating them.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse settings TOML")
    }

    /// Write a commented settings file holding the defaults.
    pub fn write_default(path: &Path) -> Result<()> {
        std::fs::write(path, DEFAULT_FILE)
            .with_context(|| format!("Failed to write settings file: {}", path.display()))
    }

    /// Lists every problem with the settings.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.image_width == 0 || self.image_height == 0 {
            problems.push("image dimensions must be positive".to_string());
        }
        if let Err(error) = self.partition_config().validate() {
            problems.extend(error.issues().iter().map(ToString::to_string));
        }

        const CORNERS: [&str; 4] = ["top-left", "top-right", "bottom-right", "bottom-left"];
        for (name, [x, y]) in CORNERS.iter().zip(self.quad) {
            if !(0.0..=f64::from(self.image_width)).contains(&x) {
                problems.push(format!("{name} corner x={x} lies outside the image (0-{})", self.image_width));
            }
            if !(0.0..=f64::from(self.image_height)).contains(&y) {
                problems.push(format!("{name} corner y={y} lies outside the image (0-{})", self.image_height));
            }
        }
        if self.quad_lot().area() <= 0.0 {
            problems.push("initial quad has no area".to_string());
        }

        problems
    }

    /// Fails with every problem listed if the settings are unusable.
    pub fn validate(&self) -> Result<()> {
        let problems = self.problems();
        if !problems.is_empty() {
            anyhow::bail!("Invalid settings:\n  - {}", problems.join("\n  - "));
        }
        Ok(())
    }

    /// Engine configuration described by these settings.
    pub fn partition_config(&self) -> PartitionConfig {
        let mut config = PartitionConfig::default()
            .with_target(self.min_amount_of_lots)
            .with_min_size(self.min_lot_width, self.min_lot_height)
            .with_max_size(self.max_lot_width, self.max_lot_height)
            .with_splits(
                SplitRange::new(self.min_splits_x, self.max_splits_x),
                SplitRange::new(self.min_splits_y, self.max_splits_y),
            )
            .with_policy(self.split_policy)
            .with_seed(Some(self.seed))
            .with_cell_size(self.cell_size)
            .with_stagnation_limit(self.stagnation_limit);
        if let Some(max_rounds) = self.max_rounds {
            config = config.with_max_rounds(max_rounds);
        }
        config
    }

    /// The initial lot described by `quad`.
    pub fn quad_lot(&self) -> Lot {
        let [tl, tr, br, bl] = self.quad.map(Point::from);
        Lot::new(tl, tr, br, bl)
    }
}
