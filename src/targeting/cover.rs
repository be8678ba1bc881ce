//! Cover raycasting against object bounding boxes
//!
//! Boxes are built from an object's footprint (or a creature's collision
//! width) and its [`VerticalEnvelope`].

use glam::Vec2;
use ordered_float::OrderedFloat;

use crate::core::types::ObjectId;
use crate::spatial::geometry::{Aabb, Ray3};
use crate::spatial::grid::GridPos;
use crate::targeting::envelope::{compute_envelope, VerticalEnvelope};
use crate::world::map::TacticalMap;
use crate::world::objects::WorldObject;

/// Cover and obscuring gas found along a sightline
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoverScan {
    /// Tallest partial structure in the target half of the line
    pub cover: Option<ObjectId>,
    /// Envelope max of `cover`, 0.0 when there is none
    pub cover_height: f32,
    /// Gas density summed over every cell not adjacent to the shooter
    pub smoke_density: f32,
}

/// Ray/box tests over one map snapshot
pub struct CoverRaycaster<'a> {
    map: &'a TacticalMap,
}

impl<'a> CoverRaycaster<'a> {
    pub fn new(map: &'a TacticalMap) -> Self {
        Self { map }
    }

    pub fn envelope(&self, object: &WorldObject) -> VerticalEnvelope {
        compute_envelope(self.map, Some(object))
    }

    /// 3D bounding box of an object
    pub fn bounds_for(&self, object: &WorldObject) -> Aabb {
        let env = self.envelope(object);
        match object.creature_body() {
            Some(body) => {
                let half = Vec2::splat(body.collision_width() * 0.5);
                let center = object.center();
                Aabb::from_footprint(center - half, center + half, env.min, env.max)
            }
            None => {
                let (min_xy, max_xy) = object.footprint_bounds();
                Aabb::from_footprint(min_xy, max_xy, env.min, env.max)
            }
        }
    }

    pub fn blocks_ray(&self, ray: &Ray3, obstacle: &WorldObject) -> bool {
        self.bounds_for(obstacle).intersects_segment(ray)
    }

    /// Walk the cells from a firing position to a target and report the cover
    /// a shooter has to aim around
    ///
    /// Only cells at least halfway to the target contribute cover; gas counts
    /// everywhere past the shooter's own neighbourhood.
    pub fn highest_cover_along_segment(
        &self,
        from: GridPos,
        to: GridPos,
        target: Option<ObjectId>,
    ) -> CoverScan {
        let half_distance = from.distance(&to) * 0.5;
        let mut scan = CoverScan::default();

        for cell in from.line_to(&to) {
            if cell.is_adjacent_8way_or_inside(&from) {
                continue;
            }

            scan.smoke_density += self.map.cell(cell).gas_density;

            if cell.distance(&from) < half_distance {
                continue;
            }

            let tallest = self
                .map
                .objects_at(cell)
                .filter(|o| o.is_partial_structure() && Some(o.id) != target)
                .map(|o| (o.id, OrderedFloat(self.envelope(o).max)))
                .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best });

            if let Some((id, OrderedFloat(height))) = tallest {
                if scan.cover.is_none() || height > scan.cover_height {
                    scan.cover = Some(id);
                    scan.cover_height = height;
                }
            }
        }

        scan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::MapId;
    use crate::world::objects::CreatureBody;
    use glam::Vec3;

    fn map() -> TacticalMap {
        TacticalMap::new(MapId(0), 20, 20)
    }

    #[test]
    fn test_creature_box_is_centered() {
        let mut map = map();
        let id = map.spawn(WorldObject::creature(GridPos::new(4, 4), CreatureBody::humanlike(1.0)));
        let raycaster = CoverRaycaster::new(&map);
        let bounds = raycaster.bounds_for(map.get(id).unwrap());
        assert!((bounds.min.x - 4.25).abs() < 1e-5);
        assert!((bounds.max.x - 4.75).abs() < 1e-5);
        assert!((bounds.max.z - 1.62).abs() < 1e-5);
    }

    #[test]
    fn test_low_cover_does_not_block_level_shot() {
        let mut map = map();
        let id = map.spawn(WorldObject::structure(GridPos::new(5, 0), 0.5));
        let raycaster = CoverRaycaster::new(&map);
        let ray = Ray3::between(Vec3::new(0.5, 0.5, 1.4), Vec3::new(10.5, 0.5, 1.6));
        assert!(!raycaster.blocks_ray(&ray, map.get(id).unwrap()));
        let low = Ray3::between(Vec3::new(0.5, 0.5, 0.3), Vec3::new(10.5, 0.5, 0.3));
        assert!(raycaster.blocks_ray(&low, map.get(id).unwrap()));
    }

    #[test]
    fn test_cover_only_in_target_half() {
        let mut map = map();
        map.spawn(WorldObject::structure(GridPos::new(3, 0), 0.9));
        let near_target = map.spawn(WorldObject::structure(GridPos::new(8, 0), 0.6));
        let scan = CoverRaycaster::new(&map).highest_cover_along_segment(
            GridPos::new(0, 0),
            GridPos::new(10, 0),
            None,
        );
        assert_eq!(scan.cover, Some(near_target));
        assert!((scan.cover_height - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_cover_scan_skips_plants_walls_and_target() {
        let mut map = map();
        map.spawn(WorldObject::plant(GridPos::new(7, 0), 0.8));
        map.spawn(WorldObject::structure(GridPos::new(8, 0), 1.0));
        let target = map.spawn(WorldObject::structure(GridPos::new(10, 0), 0.7));
        let scan = CoverRaycaster::new(&map).highest_cover_along_segment(
            GridPos::new(0, 0),
            GridPos::new(10, 0),
            Some(target),
        );
        assert!(scan.cover.is_none());
        assert_eq!(scan.cover_height, 0.0);
    }

    #[test]
    fn test_smoke_accumulates_past_shooter() {
        let mut map = map();
        map.set_gas(GridPos::new(1, 0), 5.0);
        map.set_gas(GridPos::new(4, 0), 0.3);
        map.set_gas(GridPos::new(6, 0), 0.2);
        let scan = CoverRaycaster::new(&map).highest_cover_along_segment(
            GridPos::new(0, 0),
            GridPos::new(10, 0),
            None,
        );
        assert!((scan.smoke_density - 0.5).abs() < 1e-5);
    }
}
