//! Configuration for a partitioning run.

use crate::error::{ConfigError, ConfigIssue};
use crate::lot::SPREAD;

/// Upper bound for split counts, so a count always fits the random source's
/// `i32` bound.
pub const MAX_SPLIT_LIMIT: u32 = 1 << 16;

/// How many children a split produces.
///
/// With the `serde` feature it reads and writes as `"geometric"` or
/// `"random"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum SplitCountPolicy {
    /// As many children as fit the minimum lot size along the split axis,
    /// clamped to `1..=max_split`. Consumes no random draw.
    #[default]
    Geometric,
    /// Uniform draw in `min_split..=max_split`.
    Random,
}

/// Inclusive range of children a single split may produce on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitRange {
    /// Fewest children per split.
    pub min: u32,
    /// Most children per split.
    pub max: u32,
}

impl SplitRange {
    /// Creates the range `min..=max`.
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

impl Default for SplitRange {
    fn default() -> Self {
        Self::new(1, 5)
    }
}

/// Resolved parameters of one partitioning run.
///
/// Defaults follow the reference layout: 45 lots of at least 125×155 units,
/// at most 1000×1000, one to five children per split, seed 333.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionConfig {
    /// The run converges once this many lots exist.
    pub target_lot_count: usize,
    pub min_lot_width: f64,
    pub min_lot_height: f64,
    /// Lots at least this wide are always eligible for splitting.
    pub max_lot_width: f64,
    /// Lots at least this tall are always eligible for splitting.
    pub max_lot_height: f64,
    /// Children per split when dividing along the width.
    pub split_x: SplitRange,
    /// Children per split when dividing along the height.
    pub split_y: SplitRange,
    pub split_policy: SplitCountPolicy,
    /// `None` draws a fresh seed; the run is then not reproducible.
    pub seed: Option<i64>,
    /// Side of the spatial index cells. Should be at least [`SPREAD`].
    pub cell_size: f64,
    /// Maximum number of rounds before giving up.
    pub max_rounds: usize,
    /// Consecutive rounds without a change in lot count before giving up.
    pub stagnation_limit: usize,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        let target_lot_count = 45;
        Self {
            target_lot_count,
            min_lot_width: 125.0,
            min_lot_height: 155.0,
            max_lot_width: 1000.0,
            max_lot_height: 1000.0,
            split_x: SplitRange::default(),
            split_y: SplitRange::default(),
            split_policy: SplitCountPolicy::default(),
            seed: Some(333),
            cell_size: 100.0,
            max_rounds: target_lot_count * 20,
            stagnation_limit: 15,
        }
    }
}

impl PartitionConfig {
    /// Sets the target lot count and scales the round ceiling with it.
    pub fn with_target(mut self, target_lot_count: usize) -> Self {
        self.target_lot_count = target_lot_count;
        self.max_rounds = target_lot_count.saturating_mul(20).max(1);
        self
    }

    /// Sets the smallest width and height a child may have.
    pub fn with_min_size(mut self, width: f64, height: f64) -> Self {
        self.min_lot_width = width;
        self.min_lot_height = height;
        self
    }

    /// Sets the size at which a lot is always eligible for splitting.
    pub fn with_max_size(mut self, width: f64, height: f64) -> Self {
        self.max_lot_width = width;
        self.max_lot_height = height;
        self
    }

    /// Sets the child count ranges for width and height splits.
    pub fn with_splits(mut self, split_x: SplitRange, split_y: SplitRange) -> Self {
        self.split_x = split_x;
        self.split_y = split_y;
        self
    }

    /// Sets how the child count of a split is chosen.
    pub fn with_policy(mut self, policy: SplitCountPolicy) -> Self {
        self.split_policy = policy;
        self
    }

    /// Sets the seed; `None` draws a fresh one per run.
    pub fn with_seed(mut self, seed: Option<i64>) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the spatial index cell size.
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Sets the round ceiling.
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Sets how many unchanged rounds end a run.
    pub fn with_stagnation_limit(mut self, stagnation_limit: usize) -> Self {
        self.stagnation_limit = stagnation_limit;
        self
    }

    /// Checks every constraint and reports all that fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut issues = Vec::new();

        if self.target_lot_count == 0 {
            issues.push(ConfigIssue::ZeroTarget);
        }

        for (name, value) in [
            ("min_lot_width", self.min_lot_width),
            ("min_lot_height", self.min_lot_height),
            ("max_lot_width", self.max_lot_width),
            ("max_lot_height", self.max_lot_height),
            ("cell_size", self.cell_size),
        ] {
            if !(value.is_finite() && value > 0.0) {
                issues.push(ConfigIssue::NotPositive { name, value });
            }
        }

        for (axis, min, max) in [
            ("width", self.min_lot_width, self.max_lot_width),
            ("height", self.min_lot_height, self.max_lot_height),
        ] {
            if min > max {
                issues.push(ConfigIssue::SizeBounds { axis, min, max });
            }
        }

        for (axis, range) in [("x", self.split_x), ("y", self.split_y)] {
            if range.min == 0 {
                issues.push(ConfigIssue::ZeroSplit {
                    axis,
                    min: range.min,
                });
            }
            if range.min > range.max {
                issues.push(ConfigIssue::SplitBounds {
                    axis,
                    min: range.min,
                    max: range.max,
                });
            }
            if range.max > MAX_SPLIT_LIMIT {
                issues.push(ConfigIssue::SplitTooLarge {
                    axis,
                    max: range.max,
                    limit: MAX_SPLIT_LIMIT,
                });
            }
        }

        if self.max_rounds == 0 {
            issues.push(ConfigIssue::ZeroRounds);
        }
        if self.stagnation_limit == 0 {
            issues.push(ConfigIssue::ZeroStagnation);
        }

        if issues.is_empty() {
            if self.cell_size < SPREAD {
                tracing::warn!(
                    cell_size = self.cell_size,
                    spread = SPREAD,
                    "cell size below probe spread; neighbor queries may miss lots"
                );
            }
            Ok(())
        } else {
            Err(ConfigError::new(issues))
        }
    }
}
