//! Targeting constants - fixed geometry and accuracy definitions
//!
//! Heights are in abstract height units over a cell (a wall is 2.0 tall).
//! Balance knobs that scenarios may tune live in
//! [`crate::core::config::TargetingConfig`].

// Obstacle heights
pub const TREE_HEIGHT: f32 = 5.0;
pub const WALL_HEIGHT: f32 = 2.0;
pub const FULL_FILL_THRESHOLD: f32 = 0.99;

// Creature proportions (per unit of body size)
pub const HUMANLIKE_HEIGHT_FACTOR: f32 = 1.62;
pub const HUMANLIKE_WIDTH_FACTOR: f32 = 0.5;

// Body regions, as fractions of envelope max
pub const BODY_REGION_BOTTOM: f32 = 0.45; // also the crouch floor
pub const BODY_REGION_MIDDLE: f32 = 0.85;
/// Weapon hold height as a fraction of upright height
pub const BODY_HOLD_FRACTION: f32 = 0.85;

// Posture
pub const CROUCH_COVER_EPSILON: f32 = 0.01;
pub const DOWNED_LARGE_REDUCTION: f32 = 0.8; // bodies larger than 1.0: size - 0.8
pub const DOWNED_SMALL_FRACTION: f32 = 0.2; // otherwise: 0.2 x size
pub const MAX_COVER_STACK_DEPTH: usize = 4;

// Firing line
pub const MELEE_RANGE: f32 = 1.42; // reaches diagonal neighbours
pub const TARGET_LEAN_FACTOR: f32 = 0.6;
pub const AIM_LEAN_FACTOR: f32 = 0.5;

// Accuracy
pub const ACCURACY_CAP: f32 = 4.5;
pub const PERFECT_AIMING: f32 = 2.0; // aiming accuracy at which estimates stop widening

// Recoil
pub const RECOIL_SATURATION_SHOTS: u32 = 10;
pub const RECOIL_GROWTH_DIVISOR: f32 = 6.25;
pub const RECOIL_ROTATION_FRACTION: f32 = 0.5; // horizontal kick in [-0.5r, 0.5r]
pub const RECOIL_ANGLE_DOWN_FRACTION: f32 = 1.0 / 3.0; // vertical kick in [-r/3, r]

// Sway (radians of phase per tick)
pub const SWAY_ROTATION_FREQUENCY: f32 = 0.022;
pub const SWAY_ANGLE_FREQUENCY: f32 = 0.0165;
pub const SWAY_ANGLE_SCALE: f32 = 0.25;

// Aim
pub const SUPPRESSIVE_AIM_MULTIPLIER: f32 = 2.0;
pub const MAX_ARC_ANGLE_DEGREES: f32 = 45.0;
