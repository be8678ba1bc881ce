use thiserror::Error;

/// Errors raised at the data-loading boundary (catalogs, scenarios, config)
///
/// Geometry failures are not errors in this sense; see
/// [`crate::targeting::los::FiringLineError`].
#[derive(Error, Debug)]
pub enum SightlineError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid weapon {name}: {reason}")]
    InvalidWeapon { name: String, reason: String },

    #[error("Invalid projectile {name}: {reason}")]
    InvalidProjectile { name: String, reason: String },

    #[error("No projectile mapped for ammo: {0}")]
    MissingAmmoMapping(String),

    #[error("Ammo {ammo} maps to unknown projectile {projectile}")]
    UnknownProjectile { ammo: String, projectile: String },

    #[error("Weapon not found: {0}")]
    UnknownWeapon(String),

    #[error("Object not found: {0}")]
    UnknownObject(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SightlineError>;
