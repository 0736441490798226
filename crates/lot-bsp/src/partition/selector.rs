//! Eligibility policies deciding which lots a round tries to split.
//!
//! Every round starts by taking an ordered snapshot of the lots to attempt.
//! The policy affects how evenly the area gets subdivided; termination is
//! guaranteed by the engine's stagnation and round limits regardless.

use crate::{Layout, Lot, LotId};

use super::config::PartitionConfig;

/// Strategy for choosing the lots a round attempts to split.
pub trait SplitSelector {
    /// Returns the ids to attempt, in the order they will be attempted.
    ///
    /// The returned ids must belong to `layout`.
    fn select(&self, layout: &Layout, config: &PartitionConfig) -> Vec<LotId>;
}

/// Selects the lots with the lowest priority.
///
/// Subdivides breadth-first: every lot of depth `d` is attempted before any
/// lot of depth `d + 1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OldestOnly;

impl SplitSelector for OldestOnly {
    fn select(&self, layout: &Layout, _config: &PartitionConfig) -> Vec<LotId> {
        let Some(min_priority) = layout.iter().map(|(_, lot)| lot.priority()).min() else {
            return Vec::new();
        };
        layout
            .iter()
            .filter(|(_, lot)| lot.priority() <= min_priority)
            .map(|(id, _)| id)
            .collect()
    }
}

/// Selects the oldest lots plus any lot that is too large.
///
/// A lot is too large when it reaches the configured maximum width or height,
/// or when its area exceeds [`OldestOrOversized::area_factor`] times the mean
/// lot area.
#[derive(Debug, Clone, Copy)]
pub struct OldestOrOversized {
    pub area_factor: f64,
}

impl Default for OldestOrOversized {
    fn default() -> Self {
        Self { area_factor: 3.0 }
    }
}

impl OldestOrOversized {
    fn is_eligible(&self, lot: &Lot, min_priority: u32, area_threshold: f64, config: &PartitionConfig) -> bool {
        lot.priority() <= min_priority
            || lot.width() >= config.max_lot_width
            || lot.height() >= config.max_lot_height
            || lot.area() > area_threshold
    }
}

impl SplitSelector for OldestOrOversized {
    fn select(&self, layout: &Layout, config: &PartitionConfig) -> Vec<LotId> {
        let Some(min_priority) = layout.iter().map(|(_, lot)| lot.priority()).min() else {
            return Vec::new();
        };
        let mean_area = layout.iter().map(|(_, lot)| lot.area()).sum::<f64>() / layout.len() as f64;
        let area_threshold = mean_area * self.area_factor;

        layout
            .iter()
            .filter(|(_, lot)| self.is_eligible(lot, min_priority, area_threshold, config))
            .map(|(id, _)| id)
            .collect()
    }
}
