//! Targeting configuration with documented constants
//!
//! Balance knobs for range estimation, leaning, leading and retreat scoring
//! are collected here. Geometric definitions that never change (body region
//! fractions, tree height, accuracy cap) live in
//! [`crate::targeting::constants`] instead.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SightlineError};

/// Configuration for the targeting systems
///
/// Passed by reference into every engine; there is no global instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetingConfig {
    // === FIRING LINE ===
    /// How far a leaning shooter moves its shot origin toward the lean cell (cells)
    ///
    /// 0.5 puts the muzzle on the edge shared with the neighbouring cell, so the
    /// shooter never leaves its own cell.
    pub lean_offset: f32,

    // === RANGE ESTIMATION ===
    /// Half-width of the range-estimate error per cell of distance
    ///
    /// At 0.02 an average shooter in perfect conditions misjudges a 10-cell
    /// shot by at most 0.2 cells. Every deficit in the acquisition report
    /// widens this linearly; sights efficiency divides it.
    pub range_estimate_error: f32,

    /// Contribution of one degree of sway to the range-estimate widening
    pub sway_estimate_weight: f32,

    /// Radius of the per-shot circular aim jitter per cell of distance,
    /// per unit of environmental deficit (light + weather + smoke)
    pub visibility_shift_per_cell: f32,

    // === LEADING ===
    /// Maximum relative error of the lead vector for an average shooter
    ///
    /// Scaled by the aiming deficit; a perfect aimer still misjudges
    /// target speed a little.
    pub lead_error: f32,

    // === BALLISTICS ===
    /// Downward acceleration used by the firing-solution angle (cells/s²)
    pub gravity: f32,

    // === RETREAT ===
    /// Rating of a cell sheltered by non-plant cover toward the threat
    pub full_cover_rating: f32,

    /// Flat rating for a cell with no line of sight to the threat
    /// (only under [`crate::targeting::retreat::RetreatScoring::PreferHidden`])
    pub hidden_cell_bonus: f32,

    /// Path-cost multiplier for candidate cells hidden from the threat
    pub hidden_path_penalty: f32,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            lean_offset: 0.5,

            range_estimate_error: 0.02,
            sway_estimate_weight: 0.1,
            visibility_shift_per_cell: 0.02,

            lead_error: 0.25,

            gravity: 19.6,

            full_cover_rating: 1.0,
            hidden_cell_bonus: 2.0,
            hidden_path_penalty: 5.0,
        }
    }
}

impl TargetingConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys keep their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: TargetingConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=0.5).contains(&self.lean_offset) {
            return Err(SightlineError::InvalidConfig(format!(
                "lean_offset ({}) must stay within the shooter's cell (0.0..=0.5)",
                self.lean_offset
            )));
        }

        if self.gravity <= 0.0 {
            return Err(SightlineError::InvalidConfig(format!(
                "gravity ({}) must be positive",
                self.gravity
            )));
        }

        if self.range_estimate_error < 0.0
            || self.visibility_shift_per_cell < 0.0
            || self.lead_error < 0.0
            || self.sway_estimate_weight < 0.0
        {
            return Err(SightlineError::InvalidConfig(
                "error scales must be non-negative".into(),
            ));
        }

        if self.hidden_path_penalty < 1.0 {
            return Err(SightlineError::InvalidConfig(format!(
                "hidden_path_penalty ({}) must not reward hidden cells",
                self.hidden_path_penalty
            )));
        }

        Ok(())
    }
}
