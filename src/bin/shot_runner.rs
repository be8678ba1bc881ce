//! Headless Shot Runner
//!
//! Loads a scenario and a weapon catalog, resolves the firing line of the
//! scenario's engagement and plans a burst, printing JSON or text.

use std::path::PathBuf;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use sightline::combat::WeaponCatalog;
use sightline::core::types::MapId;
use sightline::core::{Result, SightlineError, TargetingConfig};
use sightline::spatial::GridPos;
use sightline::targeting::{
    BurstState, LineOfSightEngine, ShotPlanner, ShotSolution, classify_impact_height,
    compute_envelope,
};
use sightline::world::ScenarioLoader;

/// Headless Shot Runner - firing lines and burst plans for a scenario
#[derive(Parser, Debug)]
#[command(name = "shot_runner")]
#[command(about = "Resolve a firing line and plan a burst for a scenario engagement")]
struct Args {
    /// Scenario file (see data/scenarios/)
    #[arg(long)]
    scenario: PathBuf,

    /// Weapon catalog file
    #[arg(long, default_value = "data/weapons/default.toml")]
    catalog: PathBuf,

    /// Targeting config file; defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the engagement's weapon
    #[arg(long)]
    weapon: Option<String>,

    /// Shots to plan; defaults to the weapon's burst size
    #[arg(long)]
    shots: Option<u32>,

    /// Tick the burst starts on
    #[arg(long, default_value_t = 0)]
    tick: u64,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Enable debug logging of targeting decisions
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Serialize)]
struct LineOutput {
    source: GridPos,
    source_point: [f32; 2],
    destination: GridPos,
    leaned: bool,
}

#[derive(Serialize)]
struct ShotOutput {
    index: u32,
    pellet: u32,
    rotation_degrees: f32,
    angle_degrees: f32,
    aim_point: [f32; 2],
    aim_height: f32,
    impact_region: String,
    recoil_magnitude: f32,
}

#[derive(Serialize)]
struct RunResult {
    scenario: String,
    weapon: String,
    seed: u64,
    firing_line: Option<LineOutput>,
    failure: Option<String>,
    distance: Option<f32>,
    sway_degrees: Option<f32>,
    shots: Vec<ShotOutput>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "sightline=debug" } else { "sightline=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let config = match &args.config {
        Some(path) => TargetingConfig::load(path)?,
        None => TargetingConfig::default(),
    };
    let catalog = WeaponCatalog::load(&args.catalog)?;
    let scenario = ScenarioLoader::new(MapId(0)).load_from_file(&args.scenario)?;
    let engagement = scenario.engagement.clone().ok_or_else(|| {
        SightlineError::InvalidConfig("scenario has no [engagement] section".into())
    })?;

    let weapon_name = args.weapon.clone().unwrap_or_else(|| engagement.weapon.clone());
    let loadout = catalog.loadout(&weapon_name, engagement.aim_mode)?;
    let shooter = scenario.object(&engagement.shooter)?;
    let target = scenario.object(&engagement.target)?;

    tracing::info!(
        shooter = %engagement.shooter,
        target = %engagement.target,
        weapon = %weapon_name,
        "Resolving engagement"
    );

    let mut result = RunResult {
        scenario: args.scenario.display().to_string(),
        weapon: weapon_name,
        seed,
        firing_line: None,
        failure: None,
        distance: None,
        sway_degrees: None,
        shots: Vec::new(),
    };

    let engine = LineOfSightEngine::new(&scenario.map, &config);
    match engine.find_firing_line(
        shooter,
        shooter.position,
        target,
        &loadout,
        engagement.max_lean_candidates,
    ) {
        Ok(line) => {
            let planner = ShotPlanner::new(&scenario.map, &config, &loadout);
            match planner.acquire_report(shooter, engagement.stats(), &line) {
                Ok(report) => {
                    let target_env = compute_envelope(&scenario.map, Some(target));
                    let shots = args.shots.unwrap_or(loadout.weapon.burst_shot_count);
                    let mut burst = BurstState::new();

                    for index in 0..shots {
                        let tick = args.tick + index as u64;
                        let volley = planner.plan_volley(&report, &mut burst, tick, &mut rng);
                        for (pellet, shot) in volley.iter().enumerate() {
                            result.shots.push(shot_output(index, pellet as u32, shot, |h| {
                                format!("{:?}", classify_impact_height(&target_env, h))
                            }));
                        }
                    }

                    result.distance = Some(report.distance);
                    result.sway_degrees = Some(report.sway_degrees);
                }
                Err(e) => result.failure = Some(e.to_string()),
            }
            result.firing_line = Some(LineOutput {
                source: line.source,
                source_point: line.source_point.to_array(),
                destination: line.destination,
                leaned: line.leaned,
            });
        }
        Err(e) => {
            tracing::info!("No shot: {}", e);
            result.failure = Some(e.to_string());
        }
    }

    if args.format == "text" {
        print_text(&result);
    } else {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}

fn shot_output(
    index: u32,
    pellet: u32,
    shot: &ShotSolution,
    region: impl Fn(f32) -> String,
) -> ShotOutput {
    ShotOutput {
        index,
        pellet,
        rotation_degrees: shot.rotation_degrees,
        angle_degrees: shot.angle_radians.to_degrees(),
        aim_point: shot.aim_point.to_array(),
        aim_height: shot.aim_height,
        impact_region: region(shot.aim_height),
        recoil_magnitude: shot.recoil_magnitude,
    }
}

fn print_text(result: &RunResult) {
    println!("=== {} with {} (seed {}) ===", result.scenario, result.weapon, result.seed);
    match (&result.firing_line, &result.failure) {
        (Some(line), _) => println!(
            "Firing line: ({},{}) -> ({},{}){}",
            line.source.x,
            line.source.y,
            line.destination.x,
            line.destination.y,
            if line.leaned { " [leaning]" } else { "" }
        ),
        (None, Some(failure)) => println!("No firing line: {}", failure),
        (None, None) => {}
    }
    if let (Some(distance), Some(sway)) = (result.distance, result.sway_degrees) {
        println!("Distance: {:.2} cells, sway {:.2} deg", distance, sway);
    }
    for shot in &result.shots {
        println!(
            "  shot {:>2}.{} rot {:>8.3} deg  elev {:>7.3} deg  \
             aim ({:.2}, {:.2}) h {:.2} {}  recoil {:.2}",
            shot.index,
            shot.pellet,
            shot.rotation_degrees,
            shot.angle_degrees,
            shot.aim_point[0],
            shot.aim_point[1],
            shot.aim_height,
            shot.impact_region,
            shot.recoil_magnitude
        );
    }
}
