//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for anything placed on a tactical map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub Uuid);

impl ObjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Per-object tick offset so that two shooters never sway in lockstep
    pub fn sway_phase(&self) -> u64 {
        (self.0.as_u128() % 10_000) as u64
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

/// Simulation tick counter
pub type Tick = u64;

/// Identifier of a tactical map (an "area")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MapId(pub u32);

impl MapId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Faction membership; creatures of different factions are hostile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactionId(pub u32);

impl FactionId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}
