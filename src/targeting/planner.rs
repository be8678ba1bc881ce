//! Shot planning: acquisition reports and per-shot launch solutions
//!
//! A burst is planned one shot at a time. [`ShotPlanner::acquire_report`]
//! runs once per target lock; [`ShotPlanner::plan_shot`] runs once per shot
//! and composes:
//!
//! - a range estimate frozen for the whole burst
//! - per-shot circular aim jitter and target leading
//! - idle sway (a pure function of the tick)
//! - recoil compounding over the burst
//! - mechanical spread
//! - an aim height chosen around the cover in front of the target

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::combat::weapons::WeaponLoadout;
use crate::core::config::TargetingConfig;
use crate::core::types::Tick;
use crate::targeting::ballistics::shot_angle;
use crate::targeting::constants::{
    ACCURACY_CAP, AIM_LEAN_FACTOR, BODY_REGION_BOTTOM, BODY_REGION_MIDDLE,
    RECOIL_ANGLE_DOWN_FRACTION, RECOIL_GROWTH_DIVISOR, RECOIL_ROTATION_FRACTION,
    RECOIL_SATURATION_SHOTS, SUPPRESSIVE_AIM_MULTIPLIER, SWAY_ANGLE_FREQUENCY, SWAY_ANGLE_SCALE,
    SWAY_ROTATION_FREQUENCY,
};
use crate::targeting::cover::CoverRaycaster;
use crate::targeting::envelope::{compute_envelope, VerticalEnvelope};
use crate::targeting::los::{FiringLine, FiringLineError};
use crate::targeting::report::{BurstState, ShotAcquisitionReport};
use crate::world::map::TacticalMap;
use crate::world::objects::WorldObject;

/// Skill values of the shooter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShooterStats {
    /// Hand steadiness; drives sway and recoil (capped at 4.5)
    pub shooting_accuracy: f32,
    /// Judgement of range, lead and aim point (2.0 is flawless)
    pub aiming_accuracy: f32,
}

impl Default for ShooterStats {
    fn default() -> Self {
        Self {
            shooting_accuracy: 1.0,
            aiming_accuracy: 1.0,
        }
    }
}

/// Vertical band the shot is aimed into
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AimBand {
    pub min: f32,
    pub max: f32,
}

impl AimBand {
    /// Nothing of the target shows above the cover
    pub fn is_empty(&self) -> bool {
        self.max < self.min
    }

    pub fn aim_height(&self) -> f32 {
        if self.is_empty() {
            self.min
        } else {
            (self.min + self.max) * 0.5
        }
    }
}

/// Launch parameters of one projectile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotSolution {
    /// Horizontal direction in degrees, 0 along +X, counter-clockwise
    pub rotation_degrees: f32,
    /// Elevation in radians
    pub angle_radians: f32,
    pub aim_point: Vec2,
    pub aim_height: f32,
    pub source_height: f32,
    /// Horizontal distance from the muzzle to the aim point
    pub distance: f32,
    pub shot_speed: f32,
    pub recoil_magnitude: f32,
}

/// Choose the band to aim into given the target and the cover in front of it
///
/// An exposed creature is aimed at centre of mass; any other exposed object
/// is aimed at across its whole envelope.
pub fn select_aim_band(
    target: &VerticalEnvelope,
    cover: &VerticalEnvelope,
    suppressive: bool,
    overhead: bool,
    creature: bool,
) -> AimBand {
    if overhead {
        return AimBand {
            min: cover.max,
            max: cover.max,
        };
    }

    let mut band = AimBand {
        min: target.min,
        max: target.max,
    };
    let mut raised = false;

    if band.min < cover.max {
        band.min = cover.max;
        raised = true;
    }
    if band.max <= cover.max && suppressive {
        band.max = cover.max * SUPPRESSIVE_AIM_MULTIPLIER;
    }

    if !raised && creature {
        let span = target.max - target.min;
        band = AimBand {
            min: target.min + span * BODY_REGION_BOTTOM,
            max: target.min + span * BODY_REGION_MIDDLE,
        };
    }

    band
}

/// Recoil magnitude after `shots_fired` shots of a burst
///
/// Grows with every shot until the saturation count, then holds.
pub fn recoil_magnitude(shooting_accuracy: f32, shots_fired: u32) -> f32 {
    if shots_fired == 0 {
        return 0.0;
    }
    let base = (ACCURACY_CAP - shooting_accuracy.min(ACCURACY_CAP)).max(0.0);
    let exponent = shots_fired.min(RECOIL_SATURATION_SHOTS) as f32 / RECOIL_GROWTH_DIVISOR;
    base.powf(exponent)
}

/// Sway offsets at a tick: rotation in degrees, elevation in radians
pub fn sway_offsets(amplitude: f32, tick: Tick) -> (f32, f32) {
    let t = tick as f32;
    let rotation = amplitude * (t * SWAY_ROTATION_FREQUENCY).sin();
    let angle = (SWAY_ANGLE_SCALE * amplitude * (t * SWAY_ANGLE_FREQUENCY).sin()).to_radians();
    (rotation, angle)
}

fn symmetric(rng: &mut impl Rng, half_width: f32) -> f32 {
    if half_width > 0.0 {
        rng.gen_range(-half_width..=half_width)
    } else {
        0.0
    }
}

/// Plans shots for one weapon on one map
pub struct ShotPlanner<'a> {
    map: &'a TacticalMap,
    config: &'a TargetingConfig,
    loadout: &'a WeaponLoadout,
}

impl<'a> ShotPlanner<'a> {
    pub fn new(
        map: &'a TacticalMap,
        config: &'a TargetingConfig,
        loadout: &'a WeaponLoadout,
    ) -> Self {
        Self {
            map,
            config,
            loadout,
        }
    }

    /// Snapshot accuracy inputs for a newly locked target
    pub fn acquire_report(
        &self,
        shooter: &WorldObject,
        stats: ShooterStats,
        line: &FiringLine,
    ) -> Result<ShotAcquisitionReport, FiringLineError> {
        let target = self
            .map
            .get(line.target)
            .ok_or(FiringLineError::UnknownObject(line.target))?;
        let raycaster = CoverRaycaster::new(self.map);
        let weapon = &self.loadout.weapon;

        let target_point = target.center();
        let target_cell = self.map.cell(target.position);
        let source_cell = self.map.cell(line.source);
        let weather_deficit = if target_cell.roofed && source_cell.roofed {
            0.0
        } else {
            self.map.weather.accuracy_deficit()
        };

        let scan =
            raycaster.highest_cover_along_segment(line.source, target.position, Some(target.id));

        let report = ShotAcquisitionReport {
            shooter: shooter.id,
            target: target.id,
            source: line.source_point,
            source_height: raycaster.envelope(shooter).shot_height,
            target_point,
            target_envelope: raycaster.envelope(target),
            target_is_creature: target.is_creature(),
            shooting_accuracy: stats.shooting_accuracy,
            aiming_accuracy: stats.aiming_accuracy,
            sights_efficiency: weapon.sights_efficiency,
            distance: line.source_point.distance(target_point),
            max_range: weapon.range,
            lighting_deficit: (1.0 - target_cell.glow).clamp(0.0, 1.0),
            weather_deficit,
            sway_degrees: ShotAcquisitionReport::sway_amplitude(
                stats.shooting_accuracy,
                weapon.sway_factor,
            ),
            spread_degrees: self.loadout.spread_degrees(),
            recoil_amount: weapon.recoil_amount,
            cover: scan.cover,
            smoke_density: scan.smoke_density,
            sway_phase: shooter.id.sway_phase(),
        };

        debug!(
            distance = report.distance,
            sway = report.sway_degrees,
            cover = ?report.cover,
            smoke = report.smoke_density,
            "Acquired target"
        );
        Ok(report)
    }

    /// Plan the next shot of a burst and advance the burst counter
    pub fn plan_shot(
        &self,
        report: &ShotAcquisitionReport,
        burst: &mut BurstState,
        tick: Tick,
        rng: &mut impl Rng,
    ) -> ShotSolution {
        Self::start_burst(burst);
        let solution = self.solve(report, burst, tick, rng);
        burst.shots_fired += 1;
        solution
    }

    /// Plan one solution per pellet; the volley counts as a single shot
    pub fn plan_volley(
        &self,
        report: &ShotAcquisitionReport,
        burst: &mut BurstState,
        tick: Tick,
        rng: &mut impl Rng,
    ) -> Vec<ShotSolution> {
        Self::start_burst(burst);
        let pellets = self.loadout.projectile.pellet_count.max(1);
        let volley = (0..pellets)
            .map(|_| self.solve(report, burst, tick, rng))
            .collect();
        burst.shots_fired += 1;
        volley
    }

    /// Drop an estimate left over from a previous burst
    fn start_burst(burst: &mut BurstState) {
        if burst.is_first_shot() {
            burst.estimated_distance = None;
        }
    }

    fn solve(
        &self,
        report: &ShotAcquisitionReport,
        burst: &mut BurstState,
        tick: Tick,
        rng: &mut impl Rng,
    ) -> ShotSolution {
        let projectile = &self.loadout.projectile;

        let estimated = match burst.estimated_distance {
            Some(distance) => distance,
            None => {
                let distance = report.sample_estimated_distance(self.config, rng);
                debug!(
                    true_distance = report.distance,
                    estimated = distance,
                    "Froze range estimate"
                );
                burst.estimated_distance = Some(distance);
                distance
            }
        };

        let target = self.map.get(report.target);
        let (target_center, target_env, velocity, creature) = match target {
            Some(t) => {
                let body = t.creature_body();
                let lean = body.map_or(Vec2::ZERO, |b| b.lean * AIM_LEAN_FACTOR);
                let velocity = body.map_or(Vec2::ZERO, |b| b.velocity);
                let envelope = compute_envelope(self.map, Some(t));
                (t.center() + lean, envelope, velocity, t.is_creature())
            }
            None => (
                report.target_point,
                report.target_envelope,
                Vec2::ZERO,
                report.target_is_creature,
            ),
        };

        // Jitter varies per shot; range error is held for the burst
        let radius = report.aim_jitter_radius(self.config);
        let jitter = if radius > 0.0 {
            let theta = rng.gen_range(0.0..TAU);
            let r = radius * rng.gen::<f32>().sqrt();
            Vec2::new(theta.cos(), theta.sin()) * r
        } else {
            Vec2::ZERO
        };
        let direction = (target_center + jitter - report.source)
            .try_normalize()
            .unwrap_or(Vec2::X);
        let mut aim_point = report.source + direction * estimated;

        if !projectile.is_instant && velocity != Vec2::ZERO {
            let flight_time = estimated / projectile.speed.max(f32::EPSILON);
            let error = self.config.lead_error * (1.0 + report.aiming_deficit()) * 0.5;
            let factor = 1.0 + symmetric(rng, error);
            aim_point += velocity * flight_time * factor;
        }

        let (sway_rotation, sway_angle) =
            sway_offsets(report.sway_degrees, tick + report.sway_phase);

        let recoil = recoil_magnitude(report.shooting_accuracy, burst.shots_fired);
        let kick = report.recoil_amount;
        let (recoil_rotation, recoil_angle) = if recoil > 0.0 && kick > 0.0 {
            let rotation = recoil * symmetric(rng, kick * RECOIL_ROTATION_FRACTION);
            let angle = recoil * rng.gen_range(-kick * RECOIL_ANGLE_DOWN_FRACTION..=kick);
            (rotation, angle.to_radians())
        } else {
            (0.0, 0.0)
        };

        let spread_rotation = symmetric(rng, report.spread_degrees);
        let spread_angle = symmetric(rng, report.spread_degrees).to_radians();

        let cover_env = compute_envelope(self.map, report.cover.and_then(|id| self.map.get(id)));
        let band = select_aim_band(
            &target_env,
            &cover_env,
            self.loadout.aim_mode.is_suppressive(),
            projectile.flies_overhead,
            creature,
        );
        let aim_height = band.aim_height();

        let offset = aim_point - report.source;
        let distance = offset.length();
        let rotation_degrees = offset.y.atan2(offset.x).to_degrees()
            + sway_rotation
            + recoil_rotation
            + spread_rotation;
        let elevation = shot_angle(
            projectile.speed,
            distance,
            aim_height - report.source_height,
            projectile.flies_overhead,
            self.config.gravity,
        );

        ShotSolution {
            rotation_degrees,
            angle_radians: elevation + sway_angle + recoil_angle + spread_angle,
            aim_point,
            aim_height,
            source_height: report.source_height,
            distance,
            shot_speed: projectile.speed,
            recoil_magnitude: recoil,
        }
    }
}
