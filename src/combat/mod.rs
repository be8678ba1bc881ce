//! Weapons, projectiles and the catalog that loads them

pub mod catalog;
pub mod weapons;

pub use catalog::WeaponCatalog;
pub use weapons::{AimMode, ProjectileStats, WeaponLoadout, WeaponStats};
