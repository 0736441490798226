//! Grid-bucket spatial index for neighborhood queries over lots.
//!
//! The exterior-exit check probes sixteen points per candidate lot and asks
//! which lots contain each of them. Scanning every live lot for every probe is
//! quadratic over a run, so lots are bucketed into a uniform grid of square
//! cells and a probe only looks at the 3×3 block of cells around it.

use std::collections::HashMap;

use indexmap::IndexSet;

use crate::{Lot, Point};

/// Stable identifier of a lot within one partitioning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LotId(u64);

impl LotId {
    /// Wraps a raw identifier.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Integer coordinates of a grid cell.
pub type CellKey = (i64, i64);

/// Source of candidate lots around a point.
///
/// Implementations may return a superset of the lots that contain `point`;
/// callers filter with [`Lot::is_inside`].
pub trait NeighborQuery {
    /// Returns the lots that could contain `point`, with their identifiers.
    fn lots_near(&self, point: Point) -> Vec<(LotId, &Lot)>;
}

/// Unaccelerated lookup over a plain slice. Identifiers are slice indices.
impl NeighborQuery for [Lot] {
    fn lots_near(&self, _point: Point) -> Vec<(LotId, &Lot)> {
        self.iter()
            .enumerate()
            .map(|(i, lot)| (LotId::new(i as u64), lot))
            .collect()
    }
}

/// Uniform grid mapping cells to the lots overlapping them.
///
/// The index stores identifiers only; the owner of the lots resolves them.
/// Cell buckets keep insertion order so query results are deterministic.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    cell_size: f64,
    cells: HashMap<CellKey, IndexSet<LotId>>,
    lot_cells: HashMap<LotId, Vec<CellKey>>,
}

impl SpatialIndex {
    /// Creates an empty index with square cells of side `cell_size`.
    ///
    /// # Panics
    /// Panics if `cell_size` is not a positive finite number.
    pub fn new(cell_size: f64) -> Self {
        assert!(
            cell_size.is_finite() && cell_size > 0.0,
            "Cell size must be positive and finite"
        );
        Self {
            cell_size,
            cells: HashMap::new(),
            lot_cells: HashMap::new(),
        }
    }

    /// Side length of a grid cell.
    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of indexed lots.
    #[inline]
    pub fn len(&self) -> usize {
        self.lot_cells.len()
    }

    /// Returns `true` if no lot is indexed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lot_cells.is_empty()
    }

    /// Number of non-empty cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the lot is indexed.
    #[inline]
    pub fn contains(&self, id: LotId) -> bool {
        self.lot_cells.contains_key(&id)
    }

    /// Cells recorded for a lot, if it is indexed.
    pub fn cells_of(&self, id: LotId) -> Option<&[CellKey]> {
        self.lot_cells.get(&id).map(Vec::as_slice)
    }

    /// Cell containing a point.
    pub fn cell_of(&self, point: Point) -> CellKey {
        (
            (point.x() / self.cell_size).floor() as i64,
            (point.y() / self.cell_size).floor() as i64,
        )
    }

    /// Registers a lot in every cell its bounding box touches, plus a
    /// one-cell margin. Re-adding an indexed id replaces its old cells.
    pub fn add(&mut self, id: LotId, lot: &Lot) {
        if self.contains(id) {
            self.remove(id);
        }

        let (min, max) = lot.bounding_box();
        let (min_x, min_y) = self.cell_of(min);
        let (max_x, max_y) = self.cell_of(max);

        let mut keys = Vec::new();
        for cx in (min_x - 1)..=(max_x + 1) {
            for cy in (min_y - 1)..=(max_y + 1) {
                self.cells.entry((cx, cy)).or_default().insert(id);
                keys.push((cx, cy));
            }
        }
        self.lot_cells.insert(id, keys);
    }

    /// Removes a lot from every cell recorded for it. Empty cells are pruned.
    ///
    /// Returns `false` if the lot was not indexed.
    pub fn remove(&mut self, id: LotId) -> bool {
        let Some(keys) = self.lot_cells.remove(&id) else {
            return false;
        };

        for key in keys {
            if let Some(bucket) = self.cells.get_mut(&key) {
                bucket.shift_remove(&id);
                if bucket.is_empty() {
                    self.cells.remove(&key);
                }
            }
        }
        true
    }

    /// Lots registered in the point's cell and its eight neighbors.
    ///
    /// The result is free of duplicates and sorted by id. It covers every lot
    /// that can contain a point within one cell size of `point`.
    pub fn nearby(&self, point: Point) -> Vec<LotId> {
        let (cx, cy) = self.cell_of(point);
        self.collect_block(cx - 1, cy - 1, cx + 1, cy + 1)
    }

    /// Lots registered in any cell overlapping the rectangle `min..=max`.
    pub fn lots_in_area(&self, min: Point, max: Point) -> Vec<LotId> {
        let (min_x, min_y) = self.cell_of(min);
        let (max_x, max_y) = self.cell_of(max);
        self.collect_block(min_x, min_y, max_x, max_y)
    }

    /// Removes every lot and cell.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.lot_cells.clear();
    }

    /// Identifiers of all indexed lots, sorted.
    pub fn ids(&self) -> Vec<LotId> {
        let mut ids: Vec<LotId> = self.lot_cells.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn collect_block(&self, min_x: i64, min_y: i64, max_x: i64, max_y: i64) -> Vec<LotId> {
        let mut found = IndexSet::new();
        for cx in min_x..=max_x {
            for cy in min_y..=max_y {
                if let Some(bucket) = self.cells.get(&(cx, cy)) {
                    found.extend(bucket.iter().copied());
                }
            }
        }
        let mut ids: Vec<LotId> = found.into_iter().collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> LotId {
        LotId::new(raw)
    }

    #[test]
    fn add_registers_cells_with_margin() {
        let mut index = SpatialIndex::new(50.0);
        let lot = Lot::rectangle(0.0, 0.0, 100.0, 50.0);
        index.add(id(1), &lot);

        assert_eq!(index.len(), 1);
        assert!(index.contains(id(1)));
        // Bounding box spans cells x 0..=2, y 0..=1; the margin widens it by one.
        let cells = index.cells_of(id(1)).unwrap();
        assert_eq!(cells.len(), 5 * 4);
        assert!(cells.contains(&(-1, -1)));
        assert!(cells.contains(&(3, 2)));
    }

    #[test]
    fn nearby_finds_overlapping_lots() {
        let mut index = SpatialIndex::new(50.0);
        index.add(id(1), &Lot::rectangle(0.0, 0.0, 100.0, 50.0));
        index.add(id(2), &Lot::rectangle(50.0, 0.0, 100.0, 50.0));
        index.add(id(3), &Lot::rectangle(200.0, 200.0, 100.0, 50.0));

        let near = index.nearby(Point::new(75.0, 25.0));
        assert_eq!(near, vec![id(1), id(2)]);

        let far = index.nearby(Point::new(250.0, 225.0));
        assert_eq!(far, vec![id(3)]);
    }

    #[test]
    fn nearby_covers_probe_distance() {
        let mut index = SpatialIndex::new(8.0);
        let lot = Lot::rectangle(0.0, 0.0, 8.0, 8.0);
        index.add(id(7), &lot);

        for probe in lot.probe_points() {
            assert!(index.nearby(probe).contains(&id(7)));
        }
    }

    #[test]
    fn negative_coordinates_use_floor() {
        let index = SpatialIndex::new(100.0);
        assert_eq!(index.cell_of(Point::new(-0.5, 99.9)), (-1, 0));
        assert_eq!(index.cell_of(Point::new(-100.0, -100.5)), (-1, -2));
    }

    #[test]
    fn remove_prunes_everything() {
        let mut index = SpatialIndex::new(50.0);
        index.add(id(1), &Lot::rectangle(0.0, 0.0, 100.0, 50.0));
        index.add(id(2), &Lot::rectangle(500.0, 500.0, 10.0, 10.0));
        let cells_before = index.cell_count();

        assert!(index.remove(id(1)));
        assert!(!index.remove(id(1)));
        assert_eq!(index.len(), 1);
        assert!(index.cell_count() < cells_before);
        assert!(index.nearby(Point::new(25.0, 25.0)).is_empty());

        assert!(index.remove(id(2)));
        assert!(index.is_empty());
        assert_eq!(index.cell_count(), 0);
    }

    #[test]
    fn re_adding_moves_the_lot() {
        let mut index = SpatialIndex::new(50.0);
        index.add(id(1), &Lot::rectangle(0.0, 0.0, 10.0, 10.0));
        index.add(id(1), &Lot::rectangle(1000.0, 1000.0, 10.0, 10.0));

        assert_eq!(index.len(), 1);
        assert!(index.nearby(Point::new(5.0, 5.0)).is_empty());
        assert_eq!(index.nearby(Point::new(1005.0, 1005.0)), vec![id(1)]);
    }

    #[test]
    fn area_query() {
        let mut index = SpatialIndex::new(100.0);
        index.add(id(1), &Lot::rectangle(0.0, 0.0, 50.0, 50.0));
        index.add(id(2), &Lot::rectangle(900.0, 900.0, 50.0, 50.0));

        let hits = index.lots_in_area(Point::new(0.0, 0.0), Point::new(200.0, 200.0));
        assert_eq!(hits, vec![id(1)]);

        let all = index.lots_in_area(Point::new(-500.0, -500.0), Point::new(2000.0, 2000.0));
        assert_eq!(all, vec![id(1), id(2)]);
        assert_eq!(index.ids(), all);
    }

    #[test]
    fn clear_empties_index() {
        let mut index = SpatialIndex::new(10.0);
        index.add(id(1), &Lot::rectangle(0.0, 0.0, 50.0, 50.0));
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.cell_count(), 0);
    }

    #[test]
    #[should_panic(expected = "Cell size must be positive")]
    fn zero_cell_size_panics() {
        let _ = SpatialIndex::new(0.0);
    }
}
