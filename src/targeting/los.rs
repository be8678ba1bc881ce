//! Firing lines: range gating, geometric block tests and lean positions

use glam::Vec2;
use ordered_float::OrderedFloat;
use thiserror::Error;
use tracing::{debug, trace};

use crate::combat::weapons::WeaponLoadout;
use crate::core::config::TargetingConfig;
use crate::core::types::ObjectId;
use crate::spatial::geometry::Ray3;
use crate::spatial::grid::GridPos;
use crate::targeting::constants::{MELEE_RANGE, TARGET_LEAN_FACTOR};
use crate::targeting::cover::CoverRaycaster;
use crate::world::map::TacticalMap;
use crate::world::objects::WorldObject;

/// Why no firing line exists this tick
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FiringLineError {
    #[error("Target is on a different map")]
    DifferentMap,

    #[error("Target out of range ({distance_sq} > {range_sq})")]
    OutOfRange { distance_sq: f32, range_sq: f32 },

    #[error("Target within minimum range ({distance_sq} < {min_range_sq})")]
    WithinMinimumRange { distance_sq: f32, min_range_sq: f32 },

    #[error("No line of sight")]
    NoLineOfSight,

    #[error("Object not on map: {0:?}")]
    UnknownObject(ObjectId),
}

/// A validated line from a firing position to a destination cell
#[derive(Debug, Clone, PartialEq)]
pub struct FiringLine {
    pub shooter: ObjectId,
    pub target: ObjectId,
    /// Cell the line starts from (the lean cell when leaning)
    pub source: GridPos,
    /// Continuous muzzle position
    pub source_point: Vec2,
    pub destination: GridPos,
    pub leaned: bool,
}

/// Where a candidate shot starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotOrigin {
    /// First cell of the grid walk
    pub cell: GridPos,
    pub point: Vec2,
    pub height: f32,
}

pub struct LineOfSightEngine<'a> {
    map: &'a TacticalMap,
    config: &'a TargetingConfig,
}

impl<'a> LineOfSightEngine<'a> {
    pub fn new(map: &'a TacticalMap, config: &'a TargetingConfig) -> Self {
        Self { map, config }
    }

    /// Find a firing line from `resting` (or a lean beside it) to `target`
    ///
    /// The first destination and the first lean that succeed win.
    pub fn find_firing_line(
        &self,
        shooter: &WorldObject,
        resting: GridPos,
        target: &WorldObject,
        loadout: &WeaponLoadout,
        max_lean_candidates: usize,
    ) -> Result<FiringLine, FiringLineError> {
        if shooter.map != self.map.id || target.map != shooter.map {
            return Err(FiringLineError::DifferentMap);
        }

        let weapon = &loadout.weapon;
        let distance_sq = target.closest_distance_squared(resting) as f32;
        let line = |source: GridPos, source_point: Vec2, destination: GridPos, leaned: bool| {
            FiringLine {
                shooter: shooter.id,
                target: target.id,
                source,
                source_point,
                destination,
                leaned,
            }
        };

        if weapon.range <= MELEE_RANGE {
            let reachable = target
                .occupied_cells()
                .into_iter()
                .find(|cell| cell.is_adjacent_8way_or_inside(&resting));
            return match reachable {
                Some(cell) => Ok(line(resting, resting.center(), cell, false)),
                None => Err(FiringLineError::OutOfRange {
                    distance_sq,
                    range_sq: weapon.range * weapon.range,
                }),
            };
        }

        let range_sq = weapon.range * weapon.range;
        if distance_sq > range_sq {
            return Err(FiringLineError::OutOfRange {
                distance_sq,
                range_sq,
            });
        }
        let min_range_sq = weapon.min_range * weapon.min_range;
        if distance_sq < min_range_sq {
            return Err(FiringLineError::WithinMinimumRange {
                distance_sq,
                min_range_sq,
            });
        }

        if loadout.projectile.flies_overhead {
            return Ok(line(resting, resting.center(), target.position, false));
        }

        let raycaster = CoverRaycaster::new(self.map);
        let height = raycaster.envelope(shooter).shot_height;
        let destinations = target.occupied_cells();

        let resting_origin = ShotOrigin {
            cell: resting,
            point: resting.center(),
            height,
        };
        for &destination in &destinations {
            if self.can_hit_cell_ignoring_range(
                shooter,
                resting,
                &resting_origin,
                destination,
                target,
                loadout,
            ) {
                return Ok(line(resting, resting_origin.point, destination, false));
            }
        }

        if shooter.is_creature() {
            for (cell, point) in self.lean_candidates(resting, target, max_lean_candidates) {
                let origin = ShotOrigin { cell, point, height };
                for &destination in &destinations {
                    if self.can_hit_cell_ignoring_range(
                        shooter,
                        resting,
                        &origin,
                        destination,
                        target,
                        loadout,
                    ) {
                        debug!(?cell, ?destination, "Leaning to clear firing line");
                        return Ok(line(cell, point, destination, true));
                    }
                }
            }
        }

        Err(FiringLineError::NoLineOfSight)
    }

    /// Geometric test of one origin/destination pair
    pub fn can_hit_cell_ignoring_range(
        &self,
        shooter: &WorldObject,
        resting: GridPos,
        origin: &ShotOrigin,
        destination: GridPos,
        target: &WorldObject,
        loadout: &WeaponLoadout,
    ) -> bool {
        let weapon = &loadout.weapon;

        if weapon.must_cast_on_open_ground {
            let occupied = self
                .map
                .objects_at(destination)
                .any(|o| o.is_creature() && o.id != target.id && o.id != shooter.id);
            if !self.map.is_standable(destination) || occupied {
                return false;
            }
        }

        if !weapon.requires_line_of_sight {
            return true;
        }

        let raycaster = CoverRaycaster::new(self.map);
        let mut target_point = destination.center();
        if destination == target.position {
            if let Some(body) = target.creature_body() {
                target_point += body.lean * TARGET_LEAN_FACTOR;
            }
        }
        let target_height = raycaster.envelope(target).max;
        let ray = Ray3::between(
            origin.point.extend(origin.height),
            target_point.extend(target_height),
        );

        // A lean cell's own contents stand between the muzzle and the target
        let cells = origin.cell.line_to(&destination);
        let skip = usize::from(origin.cell == resting);
        let intermediate = cells
            .iter()
            .skip(skip)
            .take(cells.len().saturating_sub(1 + skip));
        let ignore_partial = loadout.ignores_partial_blockers();

        for &cell in intermediate {
            let Some(obstacle) = self.tallest_blocker(&raycaster, cell, shooter, target) else {
                continue;
            };
            let full = obstacle.is_full_fill();

            if ignore_partial && !full {
                continue;
            }

            if cell.is_adjacent_8way_or_inside(&resting) && !full {
                // Cover right beside the shooter only matters while the shot
                // has not yet passed it
                let source_to_target = origin.point.distance_squared(target_point);
                let cell_to_target = cell.center().distance_squared(target_point);
                if source_to_target > cell_to_target
                    && raycaster.envelope(obstacle).max > origin.height
                {
                    trace!(?cell, "Blocked by adjacent cover");
                    return false;
                }
                continue;
            }

            if raycaster.blocks_ray(&ray, obstacle) {
                trace!(?cell, "Blocked by obstacle");
                return false;
            }
        }

        true
    }

    /// Tallest object in a cell that can stand in the shooter's way
    fn tallest_blocker(
        &self,
        raycaster: &CoverRaycaster<'_>,
        cell: GridPos,
        shooter: &WorldObject,
        target: &WorldObject,
    ) -> Option<&'a WorldObject> {
        self.map
            .objects_at(cell)
            .filter(|o| {
                o.id != shooter.id
                    && o.id != target.id
                    && !o.is_plant()
                    && !o.is_hostile_to(shooter)
                    && (o.is_cover() || o.is_creature())
            })
            .map(|o| (o, OrderedFloat(raycaster.envelope(o).max)))
            .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })
            .map(|(o, _)| o)
    }

    /// Cardinal lean positions facing the target, best aligned first
    ///
    /// Each candidate is the neighbouring cell the shot walk starts from and
    /// the muzzle point on the shooter's own cell edge.
    pub fn lean_candidates(
        &self,
        resting: GridPos,
        target: &WorldObject,
        max_candidates: usize,
    ) -> Vec<(GridPos, Vec2)> {
        let toward = (target.center() - resting.center()).normalize_or_zero();

        let mut candidates: Vec<(GridPos, Vec2, f32)> = GridPos::NEIGHBOR_OFFSETS[..4]
            .iter()
            .filter_map(|offset| {
                let dir = Vec2::new(offset.x as f32, offset.y as f32);
                let alignment = dir.dot(toward);
                let cell = resting + *offset;
                let open = self.map.in_bounds(cell) && !self.map.blocks_sight(cell);
                (alignment >= 0.0 && open).then(|| {
                    (cell, resting.center() + dir * self.config.lean_offset, alignment)
                })
            })
            .collect();

        candidates.sort_by(|a, b| b.2.total_cmp(&a.2));
        candidates.truncate(max_candidates);
        candidates.into_iter().map(|(cell, point, _)| (cell, point)).collect()
    }
}
