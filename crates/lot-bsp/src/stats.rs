//! Summary statistics over a set of lots.

use crate::Lot;

/// Minimum, maximum and mean of one measure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl DimStats {
    fn from_values(values: impl Iterator<Item = f64>) -> Option<Self> {
        let mut count = 0usize;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for value in values {
            count += 1;
            min = min.min(value);
            max = max.max(value);
            sum += value;
        }
        (count > 0).then(|| Self {
            min,
            max,
            mean: sum / count as f64,
        })
    }
}

/// Width, height and area statistics of a layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutStats {
    /// Number of lots.
    pub count: usize,
    pub width: DimStats,
    pub height: DimStats,
    pub area: DimStats,
    /// Sum of all lot areas.
    pub total_area: f64,
}

impl LayoutStats {
    /// Computes statistics over `lots`; `None` if there are none.
    pub fn from_lots(lots: &[Lot]) -> Option<Self> {
        let width = DimStats::from_values(lots.iter().map(Lot::width))?;
        let height = DimStats::from_values(lots.iter().map(Lot::height))?;
        let area = DimStats::from_values(lots.iter().map(Lot::area))?;
        Some(Self {
            count: lots.len(),
            width,
            height,
            area,
            total_area: lots.iter().map(Lot::area).sum(),
        })
    }
}
