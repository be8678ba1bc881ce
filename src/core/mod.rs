pub mod config;
pub mod error;
pub mod types;

pub use config::TargetingConfig;
pub use error::{Result, SightlineError};
pub use types::{FactionId, MapId, ObjectId, Tick};
