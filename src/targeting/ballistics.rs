//! Firing-solution elevation for a projectile under constant gravity

use tracing::warn;

use crate::targeting::constants::MAX_ARC_ANGLE_DEGREES;

/// Launch elevation (radians) that lands a projectile `range` cells away and
/// `height_diff` units above the muzzle
///
/// Direct fire takes the low arc, overhead fire the high arc. With no real
/// solution the shot is clamped to the maximum-range arc instead of failing.
pub fn shot_angle(speed: f32, range: f32, height_diff: f32, overhead: bool, gravity: f32) -> f32 {
    if range <= f32::EPSILON {
        return height_diff.atan2(0.0);
    }
    if gravity <= 0.0 {
        return height_diff.atan2(range);
    }

    let v2 = speed * speed;
    let discriminant = v2 * v2 - gravity * (gravity * range * range + 2.0 * height_diff * v2);
    if discriminant < 0.0 {
        warn!(speed, range, height_diff, "No ballistic solution, clamping to maximum arc");
        return MAX_ARC_ANGLE_DEGREES.to_radians();
    }

    let root = discriminant.sqrt();
    let numerator = if overhead { v2 + root } else { v2 - root };
    (numerator / (gravity * range)).atan()
}
