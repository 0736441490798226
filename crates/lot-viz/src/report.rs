//! Plain-text summaries printed by the front ends.

use lot_bsp::{LayoutStats, Partition};

use crate::Settings;

/// Describes the settings of a run.
pub fn settings_summary(settings: &Settings) -> String {
    let corners = settings
        .quad
        .iter()
        .map(|[x, y]| format!("({x}, {y})"))
        .collect::<Vec<_>>()
        .join(" ");

    [
        format!("Image: {}x{}", settings.image_width, settings.image_height),
        format!(
            "Splits: x {}..={}, y {}..={} ({:?})",
            settings.min_splits_x,
            settings.max_splits_x,
            settings.min_splits_y,
            settings.max_splits_y,
            settings.split_policy
        ),
        format!("Target lots: {}", settings.min_amount_of_lots),
        format!(
            "Lot size: min {}x{}, max {}x{}",
            settings.min_lot_width, settings.min_lot_height, settings.max_lot_width, settings.max_lot_height
        ),
        format!("Quad: {corners}"),
        format!("Seed: {}", settings.seed),
    ]
    .join("\n")
}

/// Describes how a run ended and the shape of its lots.
pub fn partition_summary(partition: &Partition) -> String {
    let mut lines = vec![format!(
        "{} lots after {} rounds ({} splits), {:?}",
        partition.lots.len(),
        partition.rounds,
        partition.splits,
        partition.termination
    )];

    if let Some(stats) = LayoutStats::from_lots(&partition.lots) {
        for (name, dim, unit) in [
            ("Height", stats.height, "px"),
            ("Width", stats.width, "px"),
            ("Area", stats.area, "px²"),
        ] {
            lines.push(format!(
                "  {name}: min {:.1}{unit}, max {:.1}{unit}, mean {:.1}{unit}",
                dim.min, dim.max, dim.mean
            ));
        }
        lines.push(format!("  Total area: {:.1}px²", stats.total_area));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lot_bsp::{Lot, Termination};

    #[test]
    fn settings_summary_lists_quad() {
        let text = settings_summary(&Settings::default());
        assert!(text.contains("Image: 1300x1300"));
        assert!(text.contains("Quad: (100, 200) (600, 200) (650, 1200) (150, 1100)"));
        assert!(text.ends_with("Seed: 333"));
    }

    #[test]
    fn partition_summary_has_stats() {
        let partition = Partition {
            lots: Lot::rectangle(0.0, 0.0, 20.0, 10.0).split(lot_bsp::SplitAxis::Width, 2),
            termination: Termination::Converged,
            rounds: 1,
            splits: 1,
            seed: 333,
        };
        let text = partition_summary(&partition);
        assert!(text.starts_with("2 lots after 1 rounds (1 splits), Converged"));
        assert!(text.contains("Width: min 10.0px, max 10.0px, mean 10.0px"));
        assert!(text.contains("Total area: 200.0px²"));
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn empty_partition_has_only_headline() {
        let partition = Partition {
            lots: Vec::new(),
            termination: Termination::Stagnant,
            rounds: 3,
            splits: 0,
            seed: -1,
        };
        assert_eq!(partition_summary(&partition), "0 lots after 3 rounds (0 splits), Stagnant");
    }

    #[test]
    fn settings_summary_has_one_line_per_field() {
        let text = settings_summary(&Settings::default());
        assert_eq!(text.lines().count(), 6);
        assert!(text.starts_with("Image: "));
    }
}
