//! Vertical envelopes: the height band an object occupies over its cell
//!
//! Every envelope is recomputed on demand from the object's current state.
//! Posture and the cover around a creature change from tick to tick, so
//! nothing here is cached.

use serde::Serialize;

use crate::targeting::constants::{
    BODY_HOLD_FRACTION, BODY_REGION_BOTTOM, BODY_REGION_MIDDLE, CROUCH_COVER_EPSILON,
    DOWNED_LARGE_REDUCTION, DOWNED_SMALL_FRACTION, MAX_COVER_STACK_DEPTH, TREE_HEIGHT,
    WALL_HEIGHT,
};
use crate::world::map::TacticalMap;
use crate::world::objects::{CreatureBody, FillCategory, ObjectKind, Posture, WorldObject};

/// Occupied height band plus the height a weapon is fired from
///
/// `shot_height` is not guaranteed to lie inside `[min, max]`: a downed
/// creature keeps the hold offset of its upright body and so reports a shot
/// height below its band.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct VerticalEnvelope {
    pub min: f32,
    pub max: f32,
    pub shot_height: f32,
}

impl VerticalEnvelope {
    pub const EMPTY: VerticalEnvelope = VerticalEnvelope {
        min: 0.0,
        max: 0.0,
        shot_height: 0.0,
    };

    pub fn height(&self) -> f32 {
        self.max - self.min
    }

    pub fn is_degenerate(&self) -> bool {
        self.max <= self.min
    }
}

/// Part of a body struck by a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ImpactRegion {
    Bottom,
    Middle,
    Top,
}

/// Band of one object before anything beneath it is accounted for
struct OwnBand {
    min: f32,
    max: f32,
    shot_offset: f32,
}

/// Compute the envelope of an object (or of nothing)
pub fn compute_envelope(map: &TacticalMap, object: Option<&WorldObject>) -> VerticalEnvelope {
    let Some(object) = object else {
        return VerticalEnvelope::EMPTY;
    };

    // Trees stand on bare ground and are never stacked on
    if object.is_tree() {
        return VerticalEnvelope {
            min: 0.0,
            max: TREE_HEIGHT,
            shot_height: TREE_HEIGHT,
        };
    }

    let own = own_band(map, object);
    let base = if object.is_plant() {
        0.0
    } else {
        stacked_base(map, object)
    };

    let max = own.max + base;
    VerticalEnvelope {
        min: own.min + base,
        max,
        shot_height: max - own.shot_offset,
    }
}

/// Which third of the envelope a projectile height falls into
pub fn classify_impact_height(envelope: &VerticalEnvelope, projectile_height: f32) -> ImpactRegion {
    if projectile_height < envelope.max * BODY_REGION_BOTTOM {
        ImpactRegion::Bottom
    } else if projectile_height < envelope.max * BODY_REGION_MIDDLE {
        ImpactRegion::Middle
    } else {
        ImpactRegion::Top
    }
}

fn own_band(map: &TacticalMap, object: &WorldObject) -> OwnBand {
    match &object.kind {
        ObjectKind::Creature(body) => creature_band(map, object, body),
        ObjectKind::Structure { .. } if object.is_full_fill() => OwnBand {
            min: 0.0,
            max: WALL_HEIGHT,
            shot_offset: 0.0,
        },
        ObjectKind::Structure { fill } | ObjectKind::Plant { fill, .. } => OwnBand {
            min: fill.min(0.0),
            max: fill.max(0.0),
            shot_offset: 0.0,
        },
        ObjectKind::Cosmetic => OwnBand {
            min: 0.0,
            max: 0.0,
            shot_offset: 0.0,
        },
    }
}

fn creature_band(map: &TacticalMap, object: &WorldObject, body: &CreatureBody) -> OwnBand {
    let upright = body.standing_height();
    let shot_offset = upright * (1.0 - BODY_HOLD_FRACTION);

    let height = match body.posture {
        Posture::Standing => upright,
        Posture::Lying => {
            if body.body_size > 1.0 {
                body.body_size - DOWNED_LARGE_REDUCTION
            } else {
                DOWNED_SMALL_FRACTION * body.body_size
            }
        }
        Posture::Crouching => match tallest_adjacent_partial_cover(map, object) {
            // Duck only as far as still firing over the chosen cover
            Some(cover) => {
                let over_cover = cover + CROUCH_COVER_EPSILON + shot_offset;
                upright.min(over_cover.max(BODY_REGION_BOTTOM * upright))
            }
            None => upright,
        },
    };

    OwnBand {
        min: 0.0,
        max: height,
        shot_offset,
    }
}

/// Height of the tallest partial, non-tree cover around a creature
fn tallest_adjacent_partial_cover(map: &TacticalMap, object: &WorldObject) -> Option<f32> {
    object
        .position
        .neighbors()
        .iter()
        .filter_map(|cell| map.cover_at(*cell))
        .filter(|cover| cover.fill_category() == FillCategory::Partial && !cover.is_tree())
        .map(|cover| own_band(map, cover).max)
        .reduce(f32::max)
}

/// Summed height of the cover stack beneath an object
fn stacked_base(map: &TacticalMap, object: &WorldObject) -> f32 {
    let mut visited = vec![object.id];
    let mut current = object;
    let mut base = 0.0;

    for _ in 0..MAX_COVER_STACK_DEPTH {
        let Some(under) = map.cover_at(current.position) else {
            break;
        };
        if under.is_plant() || visited.contains(&under.id) {
            break;
        }
        base += own_band(map, under).max;
        visited.push(under.id);
        current = under;
    }

    base
}
