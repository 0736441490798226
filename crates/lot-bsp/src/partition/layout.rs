//! Live lot collection kept in lockstep with its spatial index.

use indexmap::IndexMap;

use crate::{Lot, LotId, NeighborQuery, Point, SpatialIndex};

/// The live lots of a run together with the [`SpatialIndex`] over them.
///
/// Both structures are only mutated through [`Layout::commit_split`], which
/// replaces a parent with its children in one step, so a lot is never present
/// in one and absent from the other. Iteration follows insertion order:
/// children take the place at the end of the collection.
#[derive(Debug, Clone)]
pub struct Layout {
    lots: IndexMap<LotId, Lot>,
    index: SpatialIndex,
    next_id: u64,
}

impl Layout {
    /// Creates a layout holding only the root lot.
    pub fn new(root: Lot, cell_size: f64) -> Self {
        let mut layout = Self {
            lots: IndexMap::new(),
            index: SpatialIndex::new(cell_size),
            next_id: 0,
        };
        layout.insert(root);
        layout
    }

    /// Number of live lots.
    #[inline]
    pub fn len(&self) -> usize {
        self.lots.len()
    }

    /// Always `false` for a layout built with [`Layout::new`]; splits replace
    /// one lot with at least one child.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }

    /// The live lot with this id.
    #[inline]
    pub fn get(&self, id: LotId) -> Option<&Lot> {
        self.lots.get(&id)
    }

    /// Returns `true` if `id` names a live lot.
    #[inline]
    pub fn contains(&self, id: LotId) -> bool {
        self.lots.contains_key(&id)
    }

    /// Live lots with their ids, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (LotId, &Lot)> {
        self.lots.iter().map(|(id, lot)| (*id, lot))
    }

    /// Read-only copy of the live lots, in insertion order.
    pub fn snapshot(&self) -> Vec<Lot> {
        self.lots.values().copied().collect()
    }

    /// The spatial index over the live lots.
    #[inline]
    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    /// Replaces `parent` with `children` in both the collection and the index.
    ///
    /// Returns the ids assigned to the children, or `None` (and changes
    /// nothing) if `parent` is not live.
    pub fn commit_split(&mut self, parent: LotId, children: Vec<Lot>) -> Option<Vec<LotId>> {
        self.lots.shift_remove(&parent)?;
        let removed = self.index.remove(parent);
        debug_assert!(removed, "live lot {parent:?} was missing from the spatial index");

        let ids = children.into_iter().map(|child| self.insert(child)).collect();
        debug_assert!(self.is_consistent(), "layout and spatial index diverged");
        Some(ids)
    }

    /// Consumes the layout, returning the live lots in insertion order.
    pub fn into_lots(self) -> Vec<Lot> {
        self.lots.into_values().collect()
    }

    /// Checks that the index holds exactly the live lots.
    pub fn is_consistent(&self) -> bool {
        self.index.len() == self.lots.len() && self.lots.keys().all(|id| self.index.contains(*id))
    }

    fn insert(&mut self, lot: Lot) -> LotId {
        let id = LotId::new(self.next_id);
        self.next_id += 1;
        self.index.add(id, &lot);
        self.lots.insert(id, lot);
        id
    }
}

impl NeighborQuery for Layout {
    fn lots_near(&self, point: Point) -> Vec<(LotId, &Lot)> {
        self.index
            .nearby(point)
            .into_iter()
            .filter_map(|id| self.lots.get(&id).map(|lot| (id, lot)))
            .collect()
    }
}
