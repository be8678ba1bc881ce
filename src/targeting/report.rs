//! Per-acquisition shot reports and per-burst state

use glam::Vec2;
use rand::Rng;

use crate::core::config::TargetingConfig;
use crate::core::types::ObjectId;
use crate::targeting::constants::{ACCURACY_CAP, PERFECT_AIMING};
use crate::targeting::envelope::VerticalEnvelope;

/// Snapshot taken once when a burst's target is acquired
///
/// Reused read-only for every shot of the burst.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotAcquisitionReport {
    pub shooter: ObjectId,
    pub target: ObjectId,
    /// Muzzle position on the grid plane
    pub source: Vec2,
    pub source_height: f32,
    /// Target centre at acquisition
    pub target_point: Vec2,
    /// Target envelope at acquisition, used if the target leaves the map
    pub target_envelope: VerticalEnvelope,
    pub target_is_creature: bool,

    pub shooting_accuracy: f32,
    pub aiming_accuracy: f32,
    pub sights_efficiency: f32,

    /// Horizontal distance to the target in cells
    pub distance: f32,
    pub max_range: f32,

    pub lighting_deficit: f32,
    /// Zero when both endpoints are roofed
    pub weather_deficit: f32,
    pub sway_degrees: f32,
    pub spread_degrees: f32,
    pub recoil_amount: f32,

    /// Tallest partial cover near the target
    pub cover: Option<ObjectId>,
    pub smoke_density: f32,

    /// Tick offset keeping shooters out of sway lockstep
    pub sway_phase: u64,
}

impl ShotAcquisitionReport {
    /// Sway amplitude in degrees for a shooting skill and weapon sway factor
    pub fn sway_amplitude(shooting_accuracy: f32, sway_factor: f32) -> f32 {
        ((ACCURACY_CAP - shooting_accuracy.min(ACCURACY_CAP)) * sway_factor).max(0.0)
    }

    /// Environmental deficit: light, weather and smoke
    pub fn visibility_deficit(&self) -> f32 {
        self.lighting_deficit + self.weather_deficit + self.smoke_density
    }

    pub fn aiming_deficit(&self) -> f32 {
        (PERFECT_AIMING - self.aiming_accuracy).max(0.0)
    }

    /// Half-width of the range-estimate error in cells
    pub fn range_error_scale(&self, config: &TargetingConfig) -> f32 {
        let widening = self.aiming_deficit()
            + self.sway_degrees * config.sway_estimate_weight
            + self.visibility_deficit();
        self.distance * config.range_estimate_error * widening
            / self.sights_efficiency.max(f32::EPSILON)
    }

    /// Draw a range estimate for a new burst
    pub fn sample_estimated_distance(&self, config: &TargetingConfig, rng: &mut impl Rng) -> f32 {
        let scale = self.range_error_scale(config);
        if scale <= 0.0 {
            return self.distance;
        }
        (self.distance + rng.gen_range(-1.0_f32..=1.0) * scale).max(0.0)
    }

    /// Radius of the per-shot aim jitter around the target
    pub fn aim_jitter_radius(&self, config: &TargetingConfig) -> f32 {
        self.visibility_deficit() * self.distance * config.visibility_shift_per_cell
            / self.sights_efficiency.max(f32::EPSILON)
            * self.aiming_deficit()
    }
}

/// Shot counter and frozen range estimate of one firing sequence
///
/// Owned by the firing weapon and reset at the start of each burst.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BurstState {
    pub shots_fired: u32,
    pub estimated_distance: Option<f32>,
}

impl BurstState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_first_shot(&self) -> bool {
        self.shots_fired == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn report() -> ShotAcquisitionReport {
        ShotAcquisitionReport {
            shooter: ObjectId::new(),
            target: ObjectId::new(),
            source: Vec2::new(0.5, 0.5),
            source_height: 1.377,
            target_point: Vec2::new(10.5, 0.5),
            target_envelope: VerticalEnvelope::EMPTY,
            target_is_creature: true,
            shooting_accuracy: 1.0,
            aiming_accuracy: 1.0,
            sights_efficiency: 1.0,
            distance: 10.0,
            max_range: 30.0,
            lighting_deficit: 0.0,
            weather_deficit: 0.0,
            sway_degrees: 0.0,
            spread_degrees: 0.6,
            recoil_amount: 1.0,
            cover: None,
            smoke_density: 0.0,
            sway_phase: 0,
        }
    }

    #[test]
    fn test_sway_amplitude_never_negative() {
        assert_eq!(ShotAcquisitionReport::sway_amplitude(6.0, 1.5), 0.0);
        assert!((ShotAcquisitionReport::sway_amplitude(0.0, 1.0) - 4.5).abs() < 1e-6);
        assert!((ShotAcquisitionReport::sway_amplitude(2.5, 2.0) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_average_shooter_range_error() {
        let config = TargetingConfig::default();
        assert!((report().range_error_scale(&config) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_darkness_widens_and_sights_narrow() {
        let config = TargetingConfig::default();
        let base = report().range_error_scale(&config);
        let dark = ShotAcquisitionReport {
            lighting_deficit: 0.8,
            ..report()
        };
        assert!(dark.range_error_scale(&config) > base);
        let scoped = ShotAcquisitionReport {
            sights_efficiency: 3.5,
            ..dark.clone()
        };
        assert!(scoped.range_error_scale(&config) < dark.range_error_scale(&config));
    }

    #[test]
    fn test_estimate_within_scale() {
        let config = TargetingConfig::default();
        let report = report();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..100 {
            let estimate = report.sample_estimated_distance(&config, &mut rng);
            assert!((estimate - report.distance).abs() <= report.range_error_scale(&config) + 1e-5);
        }
    }

    #[test]
    fn test_perfect_aimer_has_no_error() {
        let config = TargetingConfig::default();
        let perfect = ShotAcquisitionReport {
            aiming_accuracy: 2.5,
            ..report()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(perfect.sample_estimated_distance(&config, &mut rng), 10.0);
        assert_eq!(perfect.aim_jitter_radius(&config), 0.0);
    }

    #[test]
    fn test_burst_reset() {
        let mut burst = BurstState {
            shots_fired: 4,
            estimated_distance: Some(9.8),
        };
        assert!(!burst.is_first_shot());
        burst.reset();
        assert_eq!(burst, BurstState::new());
    }
}
