//! Rays and axis-aligned boxes in map space
//!
//! Map space is `x`/`y` on the grid plane and `z` for height.

use glam::{Vec2, Vec3};

/// Finite segment from `origin` to `origin + direction`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray3 {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray3 {
    pub fn between(from: Vec3, to: Vec3) -> Self {
        Self {
            origin: from,
            direction: to - from,
        }
    }

    /// Point at parameter `t` (0 = origin, 1 = end)
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Projection onto the grid plane
    pub fn horizontal_length(&self) -> f32 {
        self.direction.truncate().length()
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box over a horizontal rectangle between two heights
    pub fn from_footprint(min_xy: Vec2, max_xy: Vec2, bottom: f32, top: f32) -> Self {
        Self::new(min_xy.extend(bottom), max_xy.extend(top))
    }

    pub fn height(&self) -> f32 {
        self.max.z - self.min.z
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Slab test of the segment against the box
    ///
    /// Returns the entry parameter in `[0, 1]` when the segment touches the box.
    pub fn intersect_segment(&self, ray: &Ray3) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = 1.0_f32;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let dir = ray.direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if dir.abs() < f32::EPSILON {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let mut t0 = (lo - origin) * inv;
            let mut t1 = (hi - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }

    pub fn intersects_segment(&self, ray: &Ray3) -> bool {
        self.intersect_segment(ray).is_some()
    }
}
