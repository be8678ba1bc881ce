//! Property tests for envelopes and firing-line gating

use proptest::prelude::*;

use sightline::combat::{ProjectileStats, WeaponLoadout, WeaponStats};
use sightline::core::{MapId, TargetingConfig};
use sightline::spatial::GridPos;
use sightline::targeting::constants::BODY_REGION_BOTTOM;
use sightline::targeting::{compute_envelope, FiringLineError, LineOfSightEngine};
use sightline::world::{CreatureBody, Posture, TacticalMap, WorldObject};

const SHOOTER: GridPos = GridPos::new(20, 20);

fn body(body_size: f32, height_factor: f32, posture: Posture) -> CreatureBody {
    let mut body = CreatureBody::humanlike(body_size).with_posture(posture);
    body.height_factor = height_factor;
    body
}

fn gated_loadout() -> WeaponLoadout {
    WeaponLoadout::new(
        WeaponStats {
            name: "gated".into(),
            range: 15.0,
            min_range: 5.0,
            ammo: "rifle_556".into(),
            ..WeaponStats::default()
        },
        ProjectileStats::rifle_bullet(),
    )
}

proptest! {
    #[test]
    fn prop_downed_never_taller_than_standing(
        body_size in 0.1f32..4.0,
        height_factor in 0.8f32..2.0,
    ) {
        let mut map = TacticalMap::new(MapId(0), 4, 4);
        let standing = map.spawn(WorldObject::creature(
            GridPos::new(0, 0),
            body(body_size, height_factor, Posture::Standing),
        ));
        let downed = map.spawn(WorldObject::creature(
            GridPos::new(3, 3),
            body(body_size, height_factor, Posture::Lying),
        ));

        let standing = compute_envelope(&map, map.get(standing));
        let downed = compute_envelope(&map, map.get(downed));
        prop_assert!(downed.max <= standing.max + 1e-5);
    }

    #[test]
    fn prop_crouch_stays_within_body(
        body_size in 0.1f32..4.0,
        fill in 0.01f32..0.98,
        side in 0usize..8,
    ) {
        let mut map = TacticalMap::new(MapId(0), 5, 5);
        let center = GridPos::new(2, 2);
        map.spawn(WorldObject::structure(center.neighbors()[side], fill));
        let body = CreatureBody::humanlike(body_size).with_posture(Posture::Crouching);
        let standing_height = body.standing_height();
        let id = map.spawn(WorldObject::creature(center, body));

        let envelope = compute_envelope(&map, map.get(id));
        prop_assert!(envelope.max <= standing_height + 1e-5);
        prop_assert!(envelope.max >= BODY_REGION_BOTTOM * standing_height - 1e-5);
    }

    #[test]
    fn prop_range_gating_precedes_raycasting(x in 0i32..41, y in 0i32..41) {
        prop_assume!(GridPos::new(x, y) != SHOOTER);

        let mut map = TacticalMap::new(MapId(0), 41, 41);
        // Wall the shooter in so any ungated shot fails on sight instead
        for cell in SHOOTER.neighbors() {
            map.spawn(WorldObject::structure(cell, 1.0));
        }
        let shooter = map.spawn(WorldObject::creature(SHOOTER, CreatureBody::humanlike(1.0)));
        let target = map.spawn(WorldObject::creature(
            GridPos::new(x, y),
            CreatureBody::humanlike(1.0),
        ));

        let config = TargetingConfig::default();
        let shooter = map.get(shooter).unwrap();
        let target = map.get(target).unwrap();
        let result = LineOfSightEngine::new(&map, &config).find_firing_line(
            shooter,
            SHOOTER,
            target,
            &gated_loadout(),
            4,
        );

        let dx = (x - SHOOTER.x) as f32;
        let dy = (y - SHOOTER.y) as f32;
        let distance_sq = dx * dx + dy * dy;
        if distance_sq > 15.0 * 15.0 {
            let is_out_of_range = matches!(result, Err(FiringLineError::OutOfRange { .. }));
            prop_assert!(is_out_of_range);
        } else if distance_sq < 5.0 * 5.0 {
            let is_too_close = matches!(result, Err(FiringLineError::WithinMinimumRange { .. }));
            prop_assert!(is_too_close);
        } else {
            let is_gated = matches!(
                result,
                Err(FiringLineError::OutOfRange { .. })
                    | Err(FiringLineError::WithinMinimumRange { .. })
            );
            prop_assert!(!is_gated);
        }
    }

    #[test]
    fn prop_overhead_ignores_cover(
        target_x in 15i32..40,
        covers in prop::collection::vec((1i32..40, 0i32..12, 0.05f32..1.0), 0..24),
    ) {
        let mut map = TacticalMap::new(MapId(0), 41, 12);
        for (x, y, fill) in covers {
            map.spawn(WorldObject::structure(GridPos::new(x, y), fill));
        }
        let shooter = map.spawn(WorldObject::creature(
            GridPos::new(0, 6),
            CreatureBody::humanlike(1.0),
        ));
        let target = map.spawn(WorldObject::creature(
            GridPos::new(target_x, 6),
            CreatureBody::humanlike(1.0),
        ));
        let loadout = WeaponLoadout::new(WeaponStats::mortar(), ProjectileStats::mortar_shell());

        let config = TargetingConfig::default();
        let shooter = map.get(shooter).unwrap();
        let target = map.get(target).unwrap();
        let result = LineOfSightEngine::new(&map, &config).find_firing_line(
            shooter,
            shooter.position,
            target,
            &loadout,
            4,
        );
        prop_assert!(result.is_ok());
    }
}
