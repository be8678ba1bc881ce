//! Grid coordinates, cell storage and map-space geometry

pub mod geometry;
pub mod grid;
pub mod sparse_hash;

pub use geometry::{Aabb, Ray3};
pub use grid::{Grid, GridPos};
pub use sparse_hash::CellIndex;
