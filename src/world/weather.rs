//! Weather conditions on a tactical map
//!
//! Only unroofed shots are affected; see
//! [`crate::targeting::planner::ShotPlanner::acquire_report`].

use serde::{Deserialize, Serialize};

/// Current weather condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[default]
    Clear,
    Cloudy,
    Rain,
    HeavyRain,
    Snow,
    Blizzard,
    Fog,
    Sandstorm,
}

impl Weather {
    /// Accuracy multiplier for ranged fire under open sky (1.0 = unaffected)
    pub fn ranged_accuracy_multiplier(&self) -> f32 {
        match self {
            Self::Clear => 1.0,
            Self::Cloudy => 1.0,
            Self::Rain => 0.7,
            Self::HeavyRain => 0.4,
            Self::Snow => 0.8,
            Self::Blizzard => 0.3,
            Self::Fog => 0.5,
            Self::Sandstorm => 0.3,
        }
    }

    /// Accuracy lost to this weather, in `[0, 1]`
    pub fn accuracy_deficit(&self) -> f32 {
        (1.0 - self.ranged_accuracy_multiplier()).clamp(0.0, 1.0)
    }
}
