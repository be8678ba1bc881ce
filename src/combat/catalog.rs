//! Weapon catalog loaded from TOML
//!
//! Loads from `data/weapons/*.toml`. A catalog holds weapons, projectiles
//! and the ammo → projectile map tying them together; everything is
//! validated once here so targeting code can trust its inputs.

use std::path::Path;

use ahash::AHashMap;
use serde::Deserialize;
use tracing::debug;

use crate::combat::weapons::{AimMode, ProjectileStats, WeaponLoadout, WeaponStats};
use crate::core::error::{Result, SightlineError};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    weapons: Vec<WeaponStats>,
    #[serde(default)]
    projectiles: Vec<ProjectileStats>,
    #[serde(default)]
    ammo: AHashMap<String, String>,
}

/// Validated set of weapons and projectiles
#[derive(Debug, Clone, Default)]
pub struct WeaponCatalog {
    weapons: AHashMap<String, WeaponStats>,
    projectiles: AHashMap<String, ProjectileStats>,
    ammo: AHashMap<String, String>,
}

impl WeaponCatalog {
    /// Catalog of the built-in presets
    pub fn builtin() -> Self {
        let mut catalog = Self::default();
        for weapon in [
            WeaponStats::assault_rifle(),
            WeaponStats::sniper_rifle(),
            WeaponStats::shotgun(),
            WeaponStats::mortar(),
        ] {
            catalog.weapons.insert(weapon.name.clone(), weapon);
        }
        for projectile in [
            ProjectileStats::rifle_bullet(),
            ProjectileStats::buckshot(),
            ProjectileStats::mortar_shell(),
            ProjectileStats::laser(),
        ] {
            catalog.projectiles.insert(projectile.name.clone(), projectile);
        }
        for (ammo, projectile) in [
            ("rifle_556", "rifle_bullet"),
            ("rifle_762", "rifle_bullet"),
            ("buckshot", "buckshot"),
            ("mortar_shell", "mortar_shell"),
        ] {
            catalog.ammo.insert(ammo.to_string(), projectile.to_string());
        }
        catalog
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(contents)?;
        let catalog = Self {
            weapons: file
                .weapons
                .into_iter()
                .map(|w| (w.name.clone(), w))
                .collect(),
            projectiles: file
                .projectiles
                .into_iter()
                .map(|p| (p.name.clone(), p))
                .collect(),
            ammo: file.ammo,
        };
        catalog.validate()?;
        debug!(
            weapons = catalog.weapons.len(),
            projectiles = catalog.projectiles.len(),
            "Loaded weapon catalog"
        );
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Check every weapon, projectile and ammo mapping
    pub fn validate(&self) -> Result<()> {
        for weapon in self.weapons.values() {
            if weapon.name.is_empty() {
                return Err(SightlineError::InvalidWeapon {
                    name: String::new(),
                    reason: "name must not be empty".into(),
                });
            }
            weapon.validate()?;
            self.projectile_for_ammo(&weapon.ammo)?;
        }
        for projectile in self.projectiles.values() {
            projectile.validate()?;
        }
        for (ammo, projectile) in &self.ammo {
            if !self.projectiles.contains_key(projectile) {
                return Err(SightlineError::UnknownProjectile {
                    ammo: ammo.clone(),
                    projectile: projectile.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn weapon(&self, name: &str) -> Result<&WeaponStats> {
        self.weapons
            .get(name)
            .ok_or_else(|| SightlineError::UnknownWeapon(name.to_string()))
    }

    pub fn projectile_for_ammo(&self, ammo: &str) -> Result<&ProjectileStats> {
        let projectile = self
            .ammo
            .get(ammo)
            .ok_or_else(|| SightlineError::MissingAmmoMapping(ammo.to_string()))?;
        self.projectiles
            .get(projectile)
            .ok_or_else(|| SightlineError::UnknownProjectile {
                ammo: ammo.to_string(),
                projectile: projectile.clone(),
            })
    }

    /// Weapon paired with the projectile its ammo fires
    pub fn loadout(&self, name: &str, aim_mode: AimMode) -> Result<WeaponLoadout> {
        let weapon = self.weapon(name)?;
        let projectile = self.projectile_for_ammo(&weapon.ammo)?;
        Ok(WeaponLoadout::new(weapon.clone(), projectile.clone()).with_aim_mode(aim_mode))
    }

    /// Weapon names in sorted order
    pub fn weapon_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.weapons.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
