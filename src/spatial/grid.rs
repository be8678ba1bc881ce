//! Integer cell coordinates and a dense per-cell grid

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Integer cell coordinate on a tactical map
///
/// Cells are unit squares; the continuous position of a cell is its centre
/// at `(x + 0.5, y + 0.5)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The 8 neighbouring offsets, cardinals first (E, N, W, S, then diagonals)
    pub const NEIGHBOR_OFFSETS: [GridPos; 8] = [
        GridPos::new(1, 0),
        GridPos::new(0, 1),
        GridPos::new(-1, 0),
        GridPos::new(0, -1),
        GridPos::new(1, 1),
        GridPos::new(-1, 1),
        GridPos::new(-1, -1),
        GridPos::new(1, -1),
    ];

    /// Cell containing a continuous point
    pub fn from_point(point: Vec2) -> Self {
        Self::new(point.x.floor() as i32, point.y.floor() as i32)
    }

    /// Continuous centre of this cell
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x as f32 + 0.5, self.y as f32 + 0.5)
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Squared Euclidean distance in cells
    pub fn distance_squared(&self, other: &Self) -> i32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Self) -> f32 {
        (self.distance_squared(other) as f32).sqrt()
    }

    /// True for the same cell or any of its 8 neighbours
    pub fn is_adjacent_8way_or_inside(&self, other: &Self) -> bool {
        (self.x - other.x).abs() <= 1 && (self.y - other.y).abs() <= 1
    }

    /// All 8 neighbouring cells, in [`Self::NEIGHBOR_OFFSETS`] order
    pub fn neighbors(&self) -> [GridPos; 8] {
        Self::NEIGHBOR_OFFSETS.map(|d| self.offset(d.x, d.y))
    }

    /// Cells on the discretized line from self to other (inclusive, Bresenham)
    pub fn line_to(&self, other: &Self) -> Vec<GridPos> {
        let dx = (other.x - self.x).abs();
        let dy = -(other.y - self.y).abs();
        let sx = if self.x < other.x { 1 } else { -1 };
        let sy = if self.y < other.y { 1 } else { -1 };

        let mut cells = Vec::with_capacity((dx.max(-dy) + 1) as usize);
        let mut err = dx + dy;
        let (mut x, mut y) = (self.x, self.y);

        loop {
            cells.push(GridPos::new(x, y));
            if x == other.x && y == other.y {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }

        cells
    }

    /// Cells within `radius` of self (inclusive), nearest first
    ///
    /// Ties are ordered by row then column so the scan order is deterministic.
    pub fn cells_in_radius(&self, radius: f32) -> Vec<GridPos> {
        let reach = radius.max(0.0).floor() as i32;
        let radius_sq = radius * radius;
        let mut cells = Vec::new();
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                if (dx * dx + dy * dy) as f32 <= radius_sq {
                    cells.push(self.offset(dx, dy));
                }
            }
        }
        cells.sort_by_key(|c| (c.distance_squared(self), c.y, c.x));
        cells
    }

    /// Unit step from self toward a target, each axis rounded to -1, 0 or 1
    pub fn step_toward(&self, target: &Self) -> GridPos {
        let dir = Vec2::new((target.x - self.x) as f32, (target.y - self.y) as f32)
            .normalize_or_zero();
        GridPos::new(dir.x.round() as i32, dir.y.round() as i32)
    }
}

impl std::ops::Add for GridPos {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for GridPos {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Dense 2D grid of per-cell data
#[derive(Debug, Clone)]
pub struct Grid<T: Clone + Default> {
    pub width: i32,
    pub height: i32,
    data: Vec<T>,
    fallback: T,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            data: vec![T::default(); (width * height) as usize],
            fallback: T::default(),
        }
    }

    #[inline]
    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    #[inline]
    fn index(&self, pos: GridPos) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| (pos.y * self.width + pos.x) as usize)
    }

    #[inline]
    pub fn get(&self, pos: GridPos) -> Option<&T> {
        self.index(pos).map(|i| &self.data[i])
    }

    /// Cell data, or the default value outside the grid
    #[inline]
    pub fn get_or_default(&self, pos: GridPos) -> &T {
        self.get(pos).unwrap_or(&self.fallback)
    }

    #[inline]
    pub fn get_mut(&mut self, pos: GridPos) -> Option<&mut T> {
        self.index(pos).map(move |i| &mut self.data[i])
    }

    #[inline]
    pub fn set(&mut self, pos: GridPos, value: T) {
        if let Some(cell) = self.get_mut(pos) {
            *cell = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_and_from_point() {
        let pos = GridPos::new(3, -2);
        assert_eq!(pos.center(), Vec2::new(3.5, -1.5));
        assert_eq!(GridPos::from_point(pos.center()), pos);
    }

    #[test]
    fn test_adjacency() {
        let pos = GridPos::new(5, 5);
        assert!(pos.is_adjacent_8way_or_inside(&pos));
        assert!(pos.is_adjacent_8way_or_inside(&GridPos::new(6, 6)));
        assert!(!pos.is_adjacent_8way_or_inside(&GridPos::new(7, 5)));
    }

    #[test]
    fn test_line_straight() {
        let line = GridPos::new(0, 0).line_to(&GridPos::new(4, 0));
        assert_eq!(line.len(), 5);
        assert_eq!(line[0], GridPos::new(0, 0));
        assert_eq!(line[4], GridPos::new(4, 0));
        assert!(line.iter().all(|c| c.y == 0));
    }

    #[test]
    fn test_line_shallow_slope() {
        let line = GridPos::new(0, 1).line_to(&GridPos::new(10, 3));
        assert_eq!(line.first(), Some(&GridPos::new(0, 1)));
        assert_eq!(line.last(), Some(&GridPos::new(10, 3)));
        assert!(!line.contains(&GridPos::new(1, 0)));
        assert!(line.contains(&GridPos::new(1, 1)));
    }

    #[test]
    fn test_line_single_cell() {
        let pos = GridPos::new(2, 2);
        assert_eq!(pos.line_to(&pos), vec![pos]);
    }

    #[test]
    fn test_line_is_connected() {
        let line = GridPos::new(-3, 7).line_to(&GridPos::new(6, -2));
        for pair in line.windows(2) {
            assert!(pair[0].is_adjacent_8way_or_inside(&pair[1]));
        }
    }

    #[test]
    fn test_cells_in_radius_nearest_first() {
        let origin = GridPos::new(0, 0);
        let cells = origin.cells_in_radius(2.0);
        assert_eq!(cells[0], origin);
        assert!(cells.contains(&GridPos::new(2, 0)));
        assert!(!cells.contains(&GridPos::new(2, 1)));
        for pair in cells.windows(2) {
            assert!(pair[0].distance_squared(&origin) <= pair[1].distance_squared(&origin));
        }
    }

    #[test]
    fn test_step_toward() {
        let origin = GridPos::new(0, 0);
        assert_eq!(origin.step_toward(&GridPos::new(10, 0)), GridPos::new(1, 0));
        assert_eq!(origin.step_toward(&GridPos::new(-5, -5)), GridPos::new(-1, -1));
        assert_eq!(origin.step_toward(&origin), GridPos::new(0, 0));
    }

    #[test]
    fn test_grid_bounds() {
        let mut grid: Grid<f32> = Grid::new(4, 3);
        grid.set(GridPos::new(3, 2), 1.5);
        assert_eq!(grid.get(GridPos::new(3, 2)), Some(&1.5));
        assert_eq!(grid.get(GridPos::new(4, 0)), None);
        assert_eq!(grid.get(GridPos::new(-1, 0)), None);
        assert_eq!(*grid.get_or_default(GridPos::new(9, 9)), 0.0);
    }

    #[test]
    fn test_grid_set_out_of_bounds_is_ignored() {
        let mut grid: Grid<u8> = Grid::new(2, 2);
        grid.set(GridPos::new(5, 5), 7);
        assert!(grid.get(GridPos::new(5, 5)).is_none());
    }
}
