//! Tactical maps and the objects on them

pub mod loader;
pub mod map;
pub mod objects;
pub mod weather;

pub use loader::{Engagement, Scenario, ScenarioLoader};
pub use map::{CellState, TacticalMap};
pub use objects::{CreatureBody, FillCategory, Footprint, ObjectKind, Posture, WorldObject};
pub use weather::Weather;
