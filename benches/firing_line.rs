//! Firing-line and shot-planning benchmarks
//!
//! Run with: cargo bench --bench firing_line

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use sightline::combat::{ProjectileStats, WeaponLoadout, WeaponStats};
use sightline::core::{MapId, ObjectId, TargetingConfig};
use sightline::spatial::GridPos;
use sightline::targeting::{BurstState, LineOfSightEngine, ShooterStats, ShotPlanner};
use sightline::world::{CreatureBody, TacticalMap, WorldObject};

/// A field scattered with sandbags and a wall ahead of the shooter
fn cluttered_field(distance: i32) -> (TacticalMap, ObjectId, ObjectId) {
    let mut map = TacticalMap::new(MapId(0), distance + 4, 16);
    for x in (3..distance).step_by(3) {
        map.spawn(WorldObject::structure(GridPos::new(x, 7 + x % 3), 0.65));
    }
    map.spawn(WorldObject::structure(GridPos::new(2, 8), 1.0));
    let shooter = map.spawn(WorldObject::creature(
        GridPos::new(1, 8),
        CreatureBody::humanlike(1.0),
    ));
    let target = map.spawn(WorldObject::creature(
        GridPos::new(distance, 8),
        CreatureBody::humanlike(1.0),
    ));
    (map, shooter, target)
}

fn loadout() -> WeaponLoadout {
    WeaponLoadout::new(WeaponStats::sniper_rifle(), ProjectileStats::rifle_bullet())
}

fn bench_find_firing_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_firing_line");
    let config = TargetingConfig::default();
    let loadout = loadout();

    for distance in [10, 25, 50] {
        let (map, shooter, target) = cluttered_field(distance);
        let engine = LineOfSightEngine::new(&map, &config);
        let (Some(shooter), Some(target)) = (map.get(shooter), map.get(target)) else {
            continue;
        };

        group.bench_with_input(BenchmarkId::from_parameter(distance), &distance, |b, _| {
            b.iter(|| {
                black_box(engine.find_firing_line(
                    black_box(shooter),
                    shooter.position,
                    black_box(target),
                    &loadout,
                    4,
                ))
            });
        });
    }

    group.finish();
}

fn bench_plan_burst(c: &mut Criterion) {
    let config = TargetingConfig::default();
    let loadout = WeaponLoadout::new(WeaponStats::assault_rifle(), ProjectileStats::rifle_bullet());
    let (map, shooter, target) = cluttered_field(25);
    let (Some(shooter), Some(target)) = (map.get(shooter), map.get(target)) else {
        return;
    };
    let engine = LineOfSightEngine::new(&map, &config);
    let Ok(line) = engine.find_firing_line(shooter, shooter.position, target, &loadout, 4) else {
        return;
    };
    let planner = ShotPlanner::new(&map, &config, &loadout);
    let Ok(report) = planner.acquire_report(shooter, ShooterStats::default(), &line) else {
        return;
    };
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    c.bench_function("plan_burst_5", |b| {
        b.iter(|| {
            let mut burst = BurstState::new();
            for tick in 0..5 {
                black_box(planner.plan_shot(&report, &mut burst, tick, &mut rng));
            }
        });
    });
}

criterion_group!(benches, bench_find_firing_line, bench_plan_burst);
criterion_main!(benches);
