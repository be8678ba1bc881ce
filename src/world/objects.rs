//! Objects occupying the tactical grid
//!
//! Creatures, structures, plants and cosmetic clutter share one tagged type.
//! Category-specific state lives in [`ObjectKind`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::types::{FactionId, MapId, ObjectId};
use crate::spatial::grid::GridPos;
use crate::targeting::constants::{
    FULL_FILL_THRESHOLD, HUMANLIKE_HEIGHT_FACTOR, HUMANLIKE_WIDTH_FACTOR,
};

/// Body posture of a creature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Posture {
    #[default]
    Standing,
    /// Ducked behind adjacent cover, still able to fire over it
    Crouching,
    /// Downed or prone
    Lying,
}

/// How much of a cell's vertical cross-section an object fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillCategory {
    None,
    Partial,
    Full,
}

impl FillCategory {
    pub fn from_fill(fill: f32) -> Self {
        if fill <= 0.0 {
            FillCategory::None
        } else if fill >= FULL_FILL_THRESHOLD {
            FillCategory::Full
        } else {
            FillCategory::Partial
        }
    }
}

/// Body of a creature
#[derive(Debug, Clone, PartialEq)]
pub struct CreatureBody {
    pub body_size: f32,
    /// Standing height per unit of body size
    pub height_factor: f32,
    /// Collision width per unit of body size
    pub width_factor: f32,
    pub posture: Posture,
    pub faction: Option<FactionId>,
    /// Current lean displacement (cells), zero when not leaning
    pub lean: Vec2,
    /// Movement in cells per second
    pub velocity: Vec2,
}

impl CreatureBody {
    /// Human-proportioned body
    pub fn humanlike(body_size: f32) -> Self {
        Self {
            body_size,
            height_factor: HUMANLIKE_HEIGHT_FACTOR,
            width_factor: HUMANLIKE_WIDTH_FACTOR,
            posture: Posture::Standing,
            faction: None,
            lean: Vec2::ZERO,
            velocity: Vec2::ZERO,
        }
    }

    pub fn with_posture(mut self, posture: Posture) -> Self {
        self.posture = posture;
        self
    }

    pub fn with_faction(mut self, faction: FactionId) -> Self {
        self.faction = Some(faction);
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Upright collision height before posture is applied
    pub fn standing_height(&self) -> f32 {
        self.body_size * self.height_factor
    }

    pub fn collision_width(&self) -> f32 {
        (self.body_size * self.width_factor).min(1.0)
    }

    pub fn is_hostile_to(&self, other: &CreatureBody) -> bool {
        matches!((self.faction, other.faction), (Some(a), Some(b)) if a != b)
    }
}

/// Category tag plus category-specific fields
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Creature(CreatureBody),
    Structure { fill: f32 },
    Plant { fill: f32, tree: bool },
    /// Projectile casings, filth and other clutter with no collision
    Cosmetic,
}

/// Size of an object in cells, anchored at its position (lower-left)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    pub width: u8,
    pub height: u8,
}

impl Default for Footprint {
    fn default() -> Self {
        Self { width: 1, height: 1 }
    }
}

/// Anything occupying the tactical grid
#[derive(Debug, Clone, PartialEq)]
pub struct WorldObject {
    pub id: ObjectId,
    pub map: MapId,
    pub position: GridPos,
    pub footprint: Footprint,
    pub kind: ObjectKind,
}

impl WorldObject {
    pub fn new(position: GridPos, kind: ObjectKind) -> Self {
        Self {
            id: ObjectId::new(),
            map: MapId::default(),
            position,
            footprint: Footprint::default(),
            kind,
        }
    }

    pub fn creature(position: GridPos, body: CreatureBody) -> Self {
        Self::new(position, ObjectKind::Creature(body))
    }

    pub fn structure(position: GridPos, fill: f32) -> Self {
        Self::new(position, ObjectKind::Structure { fill: fill.clamp(0.0, 1.0) })
    }

    pub fn plant(position: GridPos, fill: f32) -> Self {
        Self::new(
            position,
            ObjectKind::Plant {
                fill: fill.clamp(0.0, 1.0),
                tree: false,
            },
        )
    }

    pub fn tree(position: GridPos, fill: f32) -> Self {
        Self::new(
            position,
            ObjectKind::Plant {
                fill: fill.clamp(0.0, 1.0),
                tree: true,
            },
        )
    }

    pub fn cosmetic(position: GridPos) -> Self {
        Self::new(position, ObjectKind::Cosmetic)
    }

    pub fn with_footprint(mut self, width: u8, height: u8) -> Self {
        self.footprint = Footprint {
            width: width.max(1),
            height: height.max(1),
        };
        self
    }

    /// Fill ratio in `[0, 1]`; creatures report none
    pub fn fill(&self) -> f32 {
        match &self.kind {
            ObjectKind::Structure { fill } | ObjectKind::Plant { fill, .. } => *fill,
            ObjectKind::Creature(_) | ObjectKind::Cosmetic => 0.0,
        }
    }

    /// Creatures block partially regardless of their (zero) fill ratio
    pub fn fill_category(&self) -> FillCategory {
        match &self.kind {
            ObjectKind::Creature(_) => FillCategory::Partial,
            _ => FillCategory::from_fill(self.fill()),
        }
    }

    pub fn is_full_fill(&self) -> bool {
        self.fill_category() == FillCategory::Full
    }

    pub fn creature_body(&self) -> Option<&CreatureBody> {
        match &self.kind {
            ObjectKind::Creature(body) => Some(body),
            _ => None,
        }
    }

    pub fn creature_body_mut(&mut self) -> Option<&mut CreatureBody> {
        match &mut self.kind {
            ObjectKind::Creature(body) => Some(body),
            _ => None,
        }
    }

    pub fn is_creature(&self) -> bool {
        matches!(self.kind, ObjectKind::Creature(_))
    }

    pub fn is_plant(&self) -> bool {
        matches!(self.kind, ObjectKind::Plant { .. })
    }

    pub fn is_tree(&self) -> bool {
        matches!(self.kind, ObjectKind::Plant { tree: true, .. })
    }

    /// Non-creature with any fill; eligible as a cell's designated cover
    pub fn is_cover(&self) -> bool {
        match self.kind {
            ObjectKind::Structure { fill } | ObjectKind::Plant { fill, .. } => fill > 0.0,
            ObjectKind::Creature(_) | ObjectKind::Cosmetic => false,
        }
    }

    /// Structure-only partial cover (no plants, no trees, no walls)
    pub fn is_partial_structure(&self) -> bool {
        matches!(self.kind, ObjectKind::Structure { .. })
            && self.fill_category() == FillCategory::Partial
    }

    pub fn is_hostile_to(&self, other: &WorldObject) -> bool {
        match (self.creature_body(), other.creature_body()) {
            (Some(a), Some(b)) => a.is_hostile_to(b),
            _ => false,
        }
    }

    /// Every cell covered by the footprint, anchor first
    pub fn occupied_cells(&self) -> Vec<GridPos> {
        let mut cells =
            Vec::with_capacity(self.footprint.width as usize * self.footprint.height as usize);
        for dy in 0..self.footprint.height as i32 {
            for dx in 0..self.footprint.width as i32 {
                cells.push(self.position.offset(dx, dy));
            }
        }
        cells
    }

    /// Continuous centre of the footprint
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.position.x as f32 + self.footprint.width as f32 * 0.5,
            self.position.y as f32 + self.footprint.height as f32 * 0.5,
        )
    }

    /// Lower-left and upper-right corners of the footprint
    pub fn footprint_bounds(&self) -> (Vec2, Vec2) {
        let min = Vec2::new(self.position.x as f32, self.position.y as f32);
        let max = min + Vec2::new(self.footprint.width as f32, self.footprint.height as f32);
        (min, max)
    }

    /// Squared distance from a cell to the nearest occupied cell
    pub fn closest_distance_squared(&self, from: GridPos) -> i32 {
        let (w, h) = (self.footprint.width as i32, self.footprint.height as i32);
        let nearest = GridPos::new(
            from.x.clamp(self.position.x, self.position.x + w - 1),
            from.y.clamp(self.position.y, self.position.y + h - 1),
        );
        nearest.distance_squared(&from)
    }
}
