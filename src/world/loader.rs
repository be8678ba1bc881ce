//! Load tactical scenarios from TOML files
//!
//! `ScenarioLoader` builds a [`TacticalMap`] from a scenario file in
//! `data/scenarios/`, together with a table of named objects and an optional
//! engagement (who fires at whom, with what).

use std::path::Path;

use ahash::AHashMap;
use glam::Vec2;
use serde::Deserialize;

use crate::combat::weapons::AimMode;
use crate::core::error::{Result, SightlineError};
use crate::core::types::{FactionId, MapId, ObjectId};
use crate::spatial::grid::GridPos;
use crate::targeting::planner::ShooterStats;
use crate::world::map::TacticalMap;
use crate::world::objects::{CreatureBody, Posture, WorldObject};
use crate::world::weather::Weather;

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    map: MapSpec,
    #[serde(default)]
    cells: Vec<CellSpec>,
    #[serde(default)]
    objects: Vec<ObjectSpec>,
    engagement: Option<Engagement>,
}

#[derive(Debug, Deserialize)]
struct MapSpec {
    width: i32,
    height: i32,
    #[serde(default)]
    weather: Weather,
}

#[derive(Debug, Deserialize)]
struct CellSpec {
    x: i32,
    y: i32,
    glow: Option<f32>,
    roofed: Option<bool>,
    gas: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ObjectSpecKind {
    Creature,
    Structure,
    Plant,
    Tree,
    Cosmetic,
}

#[derive(Debug, Deserialize)]
struct ObjectSpec {
    name: Option<String>,
    kind: ObjectSpecKind,
    x: i32,
    y: i32,
    #[serde(default)]
    fill: f32,
    #[serde(default = "default_body_size")]
    body_size: f32,
    #[serde(default)]
    posture: Posture,
    faction: Option<u32>,
    #[serde(default)]
    velocity: [f32; 2],
    #[serde(default)]
    lean: [f32; 2],
    #[serde(default = "default_extent")]
    width: u8,
    #[serde(default = "default_extent")]
    height: u8,
}

fn default_body_size() -> f32 {
    1.0
}

fn default_extent() -> u8 {
    1
}

/// Who fires at whom in a scenario
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Engagement {
    pub shooter: String,
    pub target: String,
    pub weapon: String,
    #[serde(default)]
    pub aim_mode: AimMode,
    #[serde(default = "default_accuracy")]
    pub shooting_accuracy: f32,
    #[serde(default = "default_accuracy")]
    pub aiming_accuracy: f32,
    #[serde(default = "default_lean_candidates")]
    pub max_lean_candidates: usize,
}

fn default_accuracy() -> f32 {
    1.0
}

fn default_lean_candidates() -> usize {
    4
}

impl Engagement {
    pub fn stats(&self) -> ShooterStats {
        ShooterStats {
            shooting_accuracy: self.shooting_accuracy,
            aiming_accuracy: self.aiming_accuracy,
        }
    }
}

/// A loaded scenario
#[derive(Debug, Clone)]
pub struct Scenario {
    pub map: TacticalMap,
    pub names: AHashMap<String, ObjectId>,
    pub engagement: Option<Engagement>,
}

impl Scenario {
    /// Look up a named object
    pub fn object(&self, name: &str) -> Result<&WorldObject> {
        self.names
            .get(name)
            .and_then(|id| self.map.get(*id))
            .ok_or_else(|| SightlineError::UnknownObject(name.to_string()))
    }
}

/// Loader that turns scenario TOML into a [`Scenario`]
pub struct ScenarioLoader {
    map_id: MapId,
}

impl ScenarioLoader {
    pub fn new(map_id: MapId) -> Self {
        Self { map_id }
    }

    pub fn load_from_toml(&self, contents: &str) -> Result<Scenario> {
        let file: ScenarioFile = toml::from_str(contents)?;
        self.build(file)
    }

    pub fn load_from_file(&self, path: &Path) -> Result<Scenario> {
        let contents = std::fs::read_to_string(path)?;
        self.load_from_toml(&contents)
    }

    fn build(&self, file: ScenarioFile) -> Result<Scenario> {
        if file.map.width <= 0 || file.map.height <= 0 {
            return Err(SightlineError::InvalidConfig(format!(
                "map size {}x{} must be positive",
                file.map.width, file.map.height
            )));
        }

        let mut map = TacticalMap::new(self.map_id, file.map.width, file.map.height)
            .with_weather(file.map.weather);

        for cell in &file.cells {
            let pos = GridPos::new(cell.x, cell.y);
            if !map.in_bounds(pos) {
                return Err(SightlineError::InvalidConfig(format!(
                    "cell ({}, {}) is outside the map",
                    cell.x, cell.y
                )));
            }
            if let Some(glow) = cell.glow {
                map.set_glow(pos, glow);
            }
            if let Some(roofed) = cell.roofed {
                map.set_roofed(pos, roofed);
            }
            if let Some(gas) = cell.gas {
                map.set_gas(pos, gas);
            }
        }

        let mut names = AHashMap::new();
        for entry in file.objects {
            let position = GridPos::new(entry.x, entry.y);
            if !map.in_bounds(position) {
                return Err(SightlineError::InvalidConfig(format!(
                    "object {} at ({}, {}) is outside the map",
                    entry.name.as_deref().unwrap_or("<unnamed>"),
                    entry.x,
                    entry.y
                )));
            }

            let object = match entry.kind {
                ObjectSpecKind::Creature => {
                    let mut body = CreatureBody::humanlike(entry.body_size)
                        .with_posture(entry.posture)
                        .with_velocity(Vec2::from(entry.velocity));
                    body.lean = Vec2::from(entry.lean);
                    if let Some(faction) = entry.faction {
                        body = body.with_faction(FactionId(faction));
                    }
                    WorldObject::creature(position, body)
                }
                ObjectSpecKind::Structure => WorldObject::structure(position, entry.fill),
                ObjectSpecKind::Plant => WorldObject::plant(position, entry.fill),
                ObjectSpecKind::Tree => WorldObject::tree(position, entry.fill),
                ObjectSpecKind::Cosmetic => WorldObject::cosmetic(position),
            }
            .with_footprint(entry.width, entry.height);

            let id = map.spawn(object);
            if let Some(name) = entry.name {
                if names.insert(name.clone(), id).is_some() {
                    return Err(SightlineError::InvalidConfig(format!(
                        "duplicate object name: {}",
                        name
                    )));
                }
            }
        }

        if let Some(engagement) = &file.engagement {
            for name in [&engagement.shooter, &engagement.target] {
                if !names.contains_key(name) {
                    return Err(SightlineError::UnknownObject(name.clone()));
                }
            }
        }

        Ok(Scenario {
            map,
            names,
            engagement: file.engagement,
        })
    }
}
