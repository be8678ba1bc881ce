//! Tactical map: per-cell environment plus the objects standing on it

use ahash::AHashMap;
use ordered_float::OrderedFloat;

use crate::core::types::{MapId, ObjectId};
use crate::spatial::grid::{Grid, GridPos};
use crate::spatial::sparse_hash::CellIndex;
use crate::world::objects::{ObjectKind, WorldObject};
use crate::world::weather::Weather;

/// Environmental state of a single cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellState {
    /// Light level in `[0, 1]`
    pub glow: f32,
    pub roofed: bool,
    /// Accuracy penalty from obscuring gas (smoke) in this cell
    pub gas_density: f32,
}

impl Default for CellState {
    fn default() -> Self {
        Self {
            glow: 1.0,
            roofed: false,
            gas_density: 0.0,
        }
    }
}

/// The grid snapshot every targeting query reads from
#[derive(Debug, Clone)]
pub struct TacticalMap {
    pub id: MapId,
    pub weather: Weather,
    cells: Grid<CellState>,
    objects: AHashMap<ObjectId, WorldObject>,
    occupancy: CellIndex,
}

impl TacticalMap {
    pub fn new(id: MapId, width: i32, height: i32) -> Self {
        Self {
            id,
            weather: Weather::Clear,
            cells: Grid::new(width, height),
            objects: AHashMap::new(),
            occupancy: CellIndex::new(),
        }
    }

    pub fn with_weather(mut self, weather: Weather) -> Self {
        self.weather = weather;
        self
    }

    pub fn width(&self) -> i32 {
        self.cells.width
    }

    pub fn height(&self) -> i32 {
        self.cells.height
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        self.cells.in_bounds(pos)
    }

    // === OBJECTS ===

    /// Place an object on this map and return its id
    pub fn spawn(&mut self, mut object: WorldObject) -> ObjectId {
        object.map = self.id;
        let id = object.id;
        for cell in object.occupied_cells() {
            self.occupancy.insert(id, cell);
        }
        self.objects.insert(id, object);
        id
    }

    pub fn despawn(&mut self, id: ObjectId) -> Option<WorldObject> {
        let object = self.objects.remove(&id)?;
        for cell in object.occupied_cells() {
            self.occupancy.remove(id, cell);
        }
        Some(object)
    }

    /// Move an object to a new anchor cell, keeping the occupancy index in step
    pub fn relocate(&mut self, id: ObjectId, position: GridPos) -> bool {
        let Some(object) = self.objects.get_mut(&id) else {
            return false;
        };
        for cell in object.occupied_cells() {
            self.occupancy.remove(id, cell);
        }
        object.position = position;
        for cell in object.occupied_cells() {
            self.occupancy.insert(id, cell);
        }
        true
    }

    pub fn get(&self, id: ObjectId) -> Option<&WorldObject> {
        self.objects.get(&id)
    }

    /// Mutable access for state that does not move the object
    /// (posture, lean, velocity, fill); use [`Self::relocate`] to move it
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut WorldObject> {
        self.objects.get_mut(&id)
    }

    pub fn objects(&self) -> impl Iterator<Item = &WorldObject> {
        self.objects.values()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Objects occupying a cell, in spawn order
    pub fn objects_at(&self, pos: GridPos) -> impl Iterator<Item = &WorldObject> {
        self.occupancy
            .at(pos)
            .iter()
            .filter_map(|id| self.objects.get(id))
    }

    pub fn first_creature_at(&self, pos: GridPos) -> Option<&WorldObject> {
        self.objects_at(pos).find(|o| o.is_creature())
    }

    /// The cell's designated cover: the highest-fill non-creature object
    ///
    /// Ties keep the first-spawned object.
    pub fn cover_at(&self, pos: GridPos) -> Option<&WorldObject> {
        self.objects_at(pos)
            .filter(|o| o.is_cover())
            .reduce(|best, o| {
                if OrderedFloat(o.fill()) > OrderedFloat(best.fill()) {
                    o
                } else {
                    best
                }
            })
    }

    /// In bounds and free of full-fill structures
    pub fn is_standable(&self, pos: GridPos) -> bool {
        self.in_bounds(pos) && !self.blocks_sight(pos)
    }

    /// A full-fill structure (wall) stands in the cell
    pub fn blocks_sight(&self, pos: GridPos) -> bool {
        self.objects_at(pos)
            .any(|o| matches!(o.kind, ObjectKind::Structure { .. }) && o.is_full_fill())
    }

    /// Cell-based line of sight: no intermediate cell holds a wall
    pub fn has_line_of_sight(&self, from: GridPos, to: GridPos) -> bool {
        let line = from.line_to(&to);
        line.iter()
            .skip(1)
            .take(line.len().saturating_sub(2))
            .all(|cell| !self.blocks_sight(*cell))
    }

    // === ENVIRONMENT ===

    /// Environment of a cell; out-of-bounds cells read as open, lit ground
    pub fn cell(&self, pos: GridPos) -> CellState {
        *self.cells.get_or_default(pos)
    }

    pub fn set_cell(&mut self, pos: GridPos, state: CellState) {
        self.cells.set(pos, state);
    }

    pub fn set_glow(&mut self, pos: GridPos, glow: f32) {
        if let Some(cell) = self.cells.get_mut(pos) {
            cell.glow = glow.clamp(0.0, 1.0);
        }
    }

    pub fn set_roofed(&mut self, pos: GridPos, roofed: bool) {
        if let Some(cell) = self.cells.get_mut(pos) {
            cell.roofed = roofed;
        }
    }

    pub fn set_gas(&mut self, pos: GridPos, density: f32) {
        if let Some(cell) = self.cells.get_mut(pos) {
            cell.gas_density = density.max(0.0);
        }
    }
}
