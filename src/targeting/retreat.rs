//! Retreat cell selection for combatants under fire

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::config::TargetingConfig;
use crate::spatial::grid::GridPos;
use crate::world::map::TacticalMap;
use crate::world::objects::WorldObject;

/// How candidate cells are rated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetreatScoring {
    /// Rate only the cover between the cell and the threat
    #[default]
    DirectionalCover,
    /// As above, but cells out of the threat's sight get a flat bonus
    PreferHidden,
}

pub struct CoverSelector<'a> {
    map: &'a TacticalMap,
    config: &'a TargetingConfig,
}

impl<'a> CoverSelector<'a> {
    pub fn new(map: &'a TacticalMap, config: &'a TargetingConfig) -> Self {
        Self { map, config }
    }

    /// Cover quality of a cell against a threat
    ///
    /// Solid cover rates full, plants rate their fill (a chance to block),
    /// nothing rates zero.
    pub fn cover_rating(&self, cell: GridPos, threat: GridPos, scoring: RetreatScoring) -> f32 {
        if scoring == RetreatScoring::PreferHidden && !self.map.has_line_of_sight(cell, threat) {
            return self.config.hidden_cell_bonus;
        }

        match self.map.cover_at(cell + cell.step_toward(&threat)) {
            Some(cover) if cover.is_plant() => cover.fill(),
            Some(_) => self.config.full_cover_rating,
            None => 0.0,
        }
    }

    /// Best cell to fall back to within `max_distance`, or the current cell
    ///
    /// Only cells the combatant can see are considered, so the choice never
    /// routes through a wall. Ties keep the earlier cell in scan order.
    pub fn best_retreat_cell(
        &self,
        combatant: &WorldObject,
        threat: GridPos,
        max_distance: f32,
        scoring: RetreatScoring,
    ) -> GridPos {
        let origin = combatant.position;
        let mut best = origin;
        let mut best_score = self.score(origin, origin, threat, scoring);

        for cell in origin.cells_in_radius(max_distance) {
            if cell == origin || !self.is_open(cell, combatant) {
                continue;
            }
            if !self.map.has_line_of_sight(origin, cell) {
                continue;
            }

            let score = self.score(origin, cell, threat, scoring);
            if score > best_score {
                best = cell;
                best_score = score;
            }
        }

        trace!(?origin, ?best, best_score, "Chose retreat cell");
        best
    }

    fn is_open(&self, cell: GridPos, combatant: &WorldObject) -> bool {
        self.map.is_standable(cell)
            && !self
                .map
                .objects_at(cell)
                .any(|o| o.is_creature() && o.id != combatant.id)
    }

    fn score(
        &self,
        origin: GridPos,
        cell: GridPos,
        threat: GridPos,
        scoring: RetreatScoring,
    ) -> f32 {
        let mut cost = origin.distance(&cell).max(1.0);
        if !self.map.has_line_of_sight(cell, threat) {
            cost *= self.config.hidden_path_penalty;
        }
        self.cover_rating(cell, threat, scoring) / cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::MapId;
    use crate::world::objects::CreatureBody;

    fn setup() -> (TacticalMap, WorldObject) {
        let mut map = TacticalMap::new(MapId(0), 20, 12);
        let id = map.spawn(WorldObject::creature(GridPos::new(5, 5), CreatureBody::humanlike(1.0)));
        let combatant = map.get(id).cloned().unwrap();
        (map, combatant)
    }

    const THREAT: GridPos = GridPos::new(15, 5);

    #[test]
    fn test_open_field_stays_put() {
        let (map, combatant) = setup();
        let config = TargetingConfig::default();
        let selector = CoverSelector::new(&map, &config);
        let cell =
            selector.best_retreat_cell(&combatant, THREAT, 4.0, RetreatScoring::DirectionalCover);
        assert_eq!(cell, GridPos::new(5, 5));
    }

    #[test]
    fn test_moves_behind_sandbags() {
        let (mut map, combatant) = setup();
        map.spawn(WorldObject::structure(GridPos::new(7, 5), 0.65));
        let config = TargetingConfig::default();
        let selector = CoverSelector::new(&map, &config);
        let cell =
            selector.best_retreat_cell(&combatant, THREAT, 4.0, RetreatScoring::DirectionalCover);
        assert_eq!(cell, GridPos::new(6, 5));
    }

    #[test]
    fn test_plant_rates_by_fill() {
        let (mut map, combatant) = setup();
        map.spawn(WorldObject::plant(GridPos::new(7, 5), 0.4));
        let config = TargetingConfig::default();
        let selector = CoverSelector::new(&map, &config);
        let rating =
            selector.cover_rating(GridPos::new(6, 5), THREAT, RetreatScoring::DirectionalCover);
        assert!((rating - 0.4).abs() < 1e-6);
        let cell =
            selector.best_retreat_cell(&combatant, THREAT, 4.0, RetreatScoring::DirectionalCover);
        assert_eq!(cell, GridPos::new(6, 5));
    }

    #[test]
    fn test_hidden_cells_get_bonus_only_when_preferred() {
        let (mut map, _) = setup();
        map.spawn(WorldObject::structure(GridPos::new(8, 5), 1.0));
        let config = TargetingConfig::default();
        let selector = CoverSelector::new(&map, &config);
        let behind_wall = GridPos::new(7, 5);
        assert_eq!(
            selector.cover_rating(behind_wall, THREAT, RetreatScoring::DirectionalCover),
            1.0
        );
        assert_eq!(selector.cover_rating(behind_wall, THREAT, RetreatScoring::PreferHidden), 2.0);
    }

    #[test]
    fn test_occupied_cells_are_skipped() {
        let (mut map, combatant) = setup();
        map.spawn(WorldObject::structure(GridPos::new(7, 5), 0.65));
        map.spawn(WorldObject::creature(GridPos::new(6, 5), CreatureBody::humanlike(1.0)));
        let config = TargetingConfig::default();
        let selector = CoverSelector::new(&map, &config);
        let cell =
            selector.best_retreat_cell(&combatant, THREAT, 4.0, RetreatScoring::DirectionalCover);
        assert_ne!(cell, GridPos::new(6, 5));
    }

    #[test]
    fn test_never_retreats_through_walls() {
        let (mut map, combatant) = setup();
        for y in 0..12 {
            map.spawn(WorldObject::structure(GridPos::new(3, y), 1.0));
        }
        // Good cover exists only on the far side of the wall
        map.spawn(WorldObject::structure(GridPos::new(2, 5), 0.65));
        let config = TargetingConfig::default();
        let selector = CoverSelector::new(&map, &config);
        let cell = selector.best_retreat_cell(
            &combatant,
            GridPos::new(0, 5),
            4.0,
            RetreatScoring::DirectionalCover,
        );
        assert!(cell.x > 3);
    }
}
