//! Ranged weapon and projectile stats
//!
//! Stats are plain data; loading and cross-validation happen in
//! [`crate::combat::catalog`].

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SightlineError};

/// How deliberately a shot is aimed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AimMode {
    #[default]
    AimedShot,
    Snapshot,
    /// Fire over cover at a hidden target instead of holding fire
    SuppressFire,
}

impl AimMode {
    pub fn is_suppressive(&self) -> bool {
        matches!(self, AimMode::SuppressFire)
    }
}

/// Stats of a ranged weapon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponStats {
    pub name: String,
    /// Maximum range in cells
    pub range: f32,
    pub min_range: f32,
    /// Divides range-estimation error; 1.0 for iron sights
    pub sights_efficiency: f32,
    pub sway_factor: f32,
    /// Mechanical spread in degrees
    pub spread_degrees: f32,
    pub recoil_amount: f32,
    pub requires_line_of_sight: bool,
    /// Destination must be standable and free of other combatants
    pub must_cast_on_open_ground: bool,
    pub ignore_partial_blockers: bool,
    pub burst_shot_count: u32,
    /// Ammo type loaded; resolved to a projectile by the catalog
    pub ammo: String,
}

impl Default for WeaponStats {
    fn default() -> Self {
        Self {
            name: String::new(),
            range: 30.0,
            min_range: 0.0,
            sights_efficiency: 1.0,
            sway_factor: 1.0,
            spread_degrees: 0.5,
            recoil_amount: 1.0,
            requires_line_of_sight: true,
            must_cast_on_open_ground: false,
            ignore_partial_blockers: false,
            burst_shot_count: 1,
            ammo: String::new(),
        }
    }
}

impl WeaponStats {
    /// Automatic rifle: medium range, 5-round bursts
    pub fn assault_rifle() -> Self {
        Self {
            name: "assault_rifle".into(),
            range: 31.0,
            sway_factor: 1.2,
            spread_degrees: 0.6,
            recoil_amount: 1.4,
            burst_shot_count: 5,
            ammo: "rifle_556".into(),
            ..Self::default()
        }
    }

    /// Bolt-action rifle with a scope
    pub fn sniper_rifle() -> Self {
        Self {
            name: "sniper_rifle".into(),
            range: 55.0,
            sights_efficiency: 3.5,
            sway_factor: 1.6,
            spread_degrees: 0.1,
            recoil_amount: 2.5,
            ammo: "rifle_762".into(),
            ..Self::default()
        }
    }

    pub fn shotgun() -> Self {
        Self {
            name: "shotgun".into(),
            range: 16.0,
            sway_factor: 1.0,
            spread_degrees: 1.5,
            recoil_amount: 2.0,
            ammo: "buckshot".into(),
            ..Self::default()
        }
    }

    /// Indirect-fire tube; arcs over obstacles but cannot fire point-blank
    pub fn mortar() -> Self {
        Self {
            name: "mortar".into(),
            range: 80.0,
            min_range: 12.0,
            sway_factor: 0.0,
            spread_degrees: 3.0,
            recoil_amount: 0.0,
            requires_line_of_sight: false,
            must_cast_on_open_ground: true,
            ammo: "mortar_shell".into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |reason: String| {
            Err(SightlineError::InvalidWeapon {
                name: self.name.clone(),
                reason,
            })
        };

        if self.range <= 0.0 {
            return fail(format!("range ({}) must be positive", self.range));
        }
        if self.min_range < 0.0 || self.min_range > self.range {
            return fail(format!(
                "min_range ({}) must lie within 0..={}",
                self.min_range, self.range
            ));
        }
        if self.sights_efficiency <= 0.0 {
            return fail("sights_efficiency must be positive".into());
        }
        if self.sway_factor < 0.0 || self.spread_degrees < 0.0 || self.recoil_amount < 0.0 {
            return fail("sway, spread and recoil must be non-negative".into());
        }
        if self.burst_shot_count == 0 {
            return fail("burst_shot_count must be at least 1".into());
        }
        Ok(())
    }
}

/// Stats of the projectile a weapon launches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileStats {
    pub name: String,
    /// Launch speed in cells per second
    pub speed: f32,
    pub spread_multiplier: f32,
    /// Arcing fire that ignores horizontal obstruction
    pub flies_overhead: bool,
    /// Hitscan; arrives the tick it is fired, so targets are not led
    pub is_instant: bool,
    pub pellet_count: u32,
}

impl Default for ProjectileStats {
    fn default() -> Self {
        Self {
            name: String::new(),
            speed: 100.0,
            spread_multiplier: 1.0,
            flies_overhead: false,
            is_instant: false,
            pellet_count: 1,
        }
    }
}

impl ProjectileStats {
    pub fn rifle_bullet() -> Self {
        Self {
            name: "rifle_bullet".into(),
            speed: 160.0,
            ..Self::default()
        }
    }

    pub fn buckshot() -> Self {
        Self {
            name: "buckshot".into(),
            speed: 90.0,
            spread_multiplier: 8.0,
            pellet_count: 9,
            ..Self::default()
        }
    }

    pub fn mortar_shell() -> Self {
        Self {
            name: "mortar_shell".into(),
            speed: 40.0,
            flies_overhead: true,
            ..Self::default()
        }
    }

    pub fn laser() -> Self {
        Self {
            name: "laser".into(),
            speed: 1000.0,
            spread_multiplier: 0.0,
            is_instant: true,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |reason: &str| {
            Err(SightlineError::InvalidProjectile {
                name: self.name.clone(),
                reason: reason.to_string(),
            })
        };

        if self.pellet_count == 0 {
            return fail("pellet_count must be at least 1");
        }
        if self.speed <= 0.0 {
            return fail("speed must be positive");
        }
        if self.spread_multiplier < 0.0 {
            return fail("spread_multiplier must be non-negative");
        }
        Ok(())
    }
}

/// A weapon with its current projectile and aim mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponLoadout {
    pub weapon: WeaponStats,
    pub projectile: ProjectileStats,
    #[serde(default)]
    pub aim_mode: AimMode,
}

impl WeaponLoadout {
    pub fn new(weapon: WeaponStats, projectile: ProjectileStats) -> Self {
        Self {
            weapon,
            projectile,
            aim_mode: AimMode::default(),
        }
    }

    pub fn with_aim_mode(mut self, aim_mode: AimMode) -> Self {
        self.aim_mode = aim_mode;
        self
    }

    /// Partial cover is ignored when testing the line
    pub fn ignores_partial_blockers(&self) -> bool {
        self.weapon.ignore_partial_blockers || self.aim_mode.is_suppressive()
    }

    /// Mechanical spread of one shot in degrees
    pub fn spread_degrees(&self) -> f32 {
        self.weapon.spread_degrees * self.projectile.spread_multiplier
    }
}
