//! Shipped data files load, validate and play out as described

use std::path::Path;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use sightline::combat::WeaponCatalog;
use sightline::core::{MapId, TargetingConfig};
use sightline::spatial::GridPos;
use sightline::targeting::{BurstState, LineOfSightEngine, ShotPlanner};
use sightline::world::{Scenario, ScenarioLoader};

fn scenario(name: &str) -> Scenario {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("data/scenarios")
        .join(name);
    ScenarioLoader::new(MapId(1)).load_from_file(&path).unwrap()
}

fn catalog() -> WeaponCatalog {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/weapons/default.toml");
    WeaponCatalog::load(&path).unwrap()
}

#[test]
fn test_default_catalog_matches_builtin() {
    let catalog = catalog();
    let builtin = WeaponCatalog::builtin();
    for name in builtin.weapon_names() {
        assert_eq!(catalog.weapon(name).unwrap(), builtin.weapon(name).unwrap());
    }
    let laser = catalog.projectile_for_ammo("power_cell").unwrap();
    assert!(laser.is_instant);
}

#[test]
fn test_open_field_plays_out() {
    let scenario = scenario("open_field.toml");
    let engagement = scenario.engagement.clone().unwrap();
    let loadout = catalog().loadout(&engagement.weapon, engagement.aim_mode).unwrap();
    let config = TargetingConfig::default();
    let shooter = scenario.object("rifleman").unwrap();
    let target = scenario.object("raider").unwrap();

    let line = LineOfSightEngine::new(&scenario.map, &config)
        .find_firing_line(
            shooter,
            shooter.position,
            target,
            &loadout,
            engagement.max_lean_candidates,
        )
        .unwrap();
    assert!(!line.leaned);

    let planner = ShotPlanner::new(&scenario.map, &config, &loadout);
    let report = planner.acquire_report(shooter, engagement.stats(), &line).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut burst = BurstState::new();
    for tick in 0..loadout.weapon.burst_shot_count as u64 {
        planner.plan_shot(&report, &mut burst, tick, &mut rng);
    }
    assert_eq!(burst.shots_fired, 5);
}

#[test]
fn test_corner_lean_scenario_leans() {
    let scenario = scenario("corner_lean.toml");
    let loadout = catalog().loadout("assault_rifle", Default::default()).unwrap();
    let config = TargetingConfig::default();
    let shooter = scenario.object("rifleman").unwrap();
    let target = scenario.object("raider").unwrap();

    let line = LineOfSightEngine::new(&scenario.map, &config)
        .find_firing_line(shooter, shooter.position, target, &loadout, 4)
        .unwrap();
    assert!(line.leaned);
    assert_eq!(line.source, GridPos::new(0, 1));
}

#[test]
fn test_sandbag_line_needs_suppression() {
    let scenario = scenario("sandbag_line.toml");
    let engagement = scenario.engagement.clone().unwrap();
    let catalog = catalog();
    let config = TargetingConfig::default();
    let shooter = scenario.object("rifleman").unwrap();
    let target = scenario.object("raider").unwrap();
    let engine = LineOfSightEngine::new(&scenario.map, &config);

    let aimed = catalog.loadout("assault_rifle", Default::default()).unwrap();
    assert!(engine.find_firing_line(shooter, shooter.position, target, &aimed, 4).is_err());

    let suppressing = catalog.loadout("assault_rifle", engagement.aim_mode).unwrap();
    let line = engine
        .find_firing_line(shooter, shooter.position, target, &suppressing, 4)
        .unwrap();
    let report = ShotPlanner::new(&scenario.map, &config, &suppressing)
        .acquire_report(shooter, engagement.stats(), &line)
        .unwrap();
    assert!(report.cover.is_some());
    assert_eq!(report.cover, scenario.names.get("sandbags").copied());
    assert!((report.lighting_deficit - 0.6).abs() < 1e-6);
    assert!((report.weather_deficit - 0.3).abs() < 1e-6);
    assert!((report.smoke_density - 0.3).abs() < 1e-6);
}
