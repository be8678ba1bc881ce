//! Sparse cell index for occupant lookups

use ahash::AHashMap;

use crate::core::types::ObjectId;
use crate::spatial::grid::GridPos;

/// Sparse map from cell to the objects occupying it
#[derive(Debug, Clone, Default)]
pub struct CellIndex {
    cells: AHashMap<GridPos, Vec<ObjectId>>,
}

impl CellIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn insert(&mut self, id: ObjectId, pos: GridPos) {
        let occupants = self.cells.entry(pos).or_default();
        if !occupants.contains(&id) {
            occupants.push(id);
        }
    }

    pub fn remove(&mut self, id: ObjectId, pos: GridPos) {
        if let Some(occupants) = self.cells.get_mut(&pos) {
            occupants.retain(|&o| o != id);
            if occupants.is_empty() {
                self.cells.remove(&pos);
            }
        }
    }

    /// Occupants of one cell, in insertion order
    pub fn at(&self, pos: GridPos) -> &[ObjectId] {
        self.cells.get(&pos).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Occupants of the 3x3 neighbourhood around a cell
    pub fn query_neighbors(&self, pos: GridPos) -> impl Iterator<Item = ObjectId> + '_ {
        (-1..=1).flat_map(move |dy| {
            (-1..=1).flat_map(move |dx| self.at(pos.offset(dx, dy)).iter().copied())
        })
    }

    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
