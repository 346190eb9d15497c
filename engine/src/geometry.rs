//! Radius rule, geographic projection and the ray tests used by picking.

use glam::{Quat, Vec3};

/// Smallest viewport dimension we will compute a radius from. Guards the
/// division path against a hidden (zero-sized) container.
pub const MIN_VIEWPORT_PX: f32 = 1.0;

/// Globe radius for a viewport: ~5/7 of the smaller dimension, rounded to
/// four decimal digits after the 1/100 scale. 700x500 maps to 3.5714.
pub fn compute_radius(width: f32, height: f32) -> f32 {
    let min_view = width.min(height).max(MIN_VIEWPORT_PX);
    (min_view / 7.0 * 5.0 * 100.0).round() / 10_000.0
}

/// Geographic degrees to Cartesian, polar axis on +Y, prime meridian
/// toward +Z.
pub fn project_to_sphere(lat_deg: f32, lng_deg: f32, radius: f32) -> Vec3 {
    let lat = lat_deg.to_radians();
    let lng = lng_deg.to_radians();
    Vec3::new(
        radius * lat.cos() * lng.sin(),
        radius * lat.sin(),
        radius * lat.cos() * lng.cos(),
    )
}

/// A picking ray in world space. `dir` is unit length.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    /// Ray start point.
    pub origin: Vec3,
    /// Unit direction.
    pub dir: Vec3,
}

impl Ray {
    /// Nearest non-negative hit parameter against a sphere centered at the
    /// origin, or `None` if the ray misses.
    pub fn hit_sphere(&self, radius: f32) -> Option<f32> {
        let b = self.origin.dot(self.dir);
        let c = self.origin.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sq = disc.sqrt();
        let t0 = -b - sq;
        let t1 = -b + sq;
        if t0 >= 0.0 {
            Some(t0)
        } else if t1 >= 0.0 {
            Some(t1)
        } else {
            None
        }
    }

    /// Nearest non-negative hit parameter against an oriented box, or `None`.
    /// Slab test performed in the box's local frame.
    pub fn hit_box(&self, center: Vec3, rotation: Quat, half_extents: Vec3) -> Option<f32> {
        let inv = rotation.inverse();
        let o = inv * (self.origin - center);
        let d = inv * self.dir;

        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;
        for axis in 0..3 {
            let (o_a, d_a, h_a) = (o[axis], d[axis], half_extents[axis]);
            if d_a.abs() < 1e-12 {
                if o_a.abs() > h_a {
                    return None;
                }
                continue;
            }
            let inv_d = 1.0 / d_a;
            let mut t0 = (-h_a - o_a) * inv_d;
            let mut t1 = (h_a - o_a) * inv_d;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        if t_max < 0.0 {
            return None;
        }
        Some(if t_min >= 0.0 { t_min } else { t_max })
    }
}
