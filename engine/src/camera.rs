//! Fixed perspective camera on the +Z axis, plus NDC ray casting.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::geometry::Ray;

/// Default eye distance along +Z. Reset to this on every viewport change.
pub const DEFAULT_DISTANCE: f32 = 10.0;

/// Perspective camera looking at the origin from `(0, 0, distance)`.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    /// Vertical field of view, radians.
    pub fov_y: f32,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Near clip plane.
    pub z_near: f32,
    /// Far clip plane.
    pub z_far: f32,
    /// Eye distance from the origin along +Z.
    pub distance: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov_y: 75f32.to_radians(),
            aspect: 1.6,
            z_near: 0.1,
            z_far: 1000.0,
            distance: DEFAULT_DISTANCE,
        }
    }
}

impl Camera {
    /// Camera with aspect derived from a viewport size.
    pub fn for_viewport(width: f32, height: f32) -> Self {
        let mut cam = Self::default();
        cam.set_viewport(width, height);
        cam
    }

    /// Rebuild the projection for a new viewport and reset the eye distance
    /// to the default.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.aspect = (width / height.max(1.0)).max(1e-3);
        self.distance = DEFAULT_DISTANCE;
    }

    /// Eye position in world space.
    pub fn eye(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.distance)
    }

    fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }

    /// Combined view-projection matrix.
    pub fn view_proj(&self) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov_y, self.aspect.max(1e-3), self.z_near, self.z_far);
        proj * self.view()
    }

    /// World-space ray through a normalized device coordinate, by
    /// unprojecting the near and far clip points.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.view_proj().inverse();
        let near = inv * Vec4::new(ndc.x, ndc.y, 0.0, 1.0);
        let far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;
        Ray { origin: near, dir: (far - near).normalize() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_ray_points_down_the_view_axis() {
        let cam = Camera::for_viewport(800.0, 600.0);
        let ray = cam.ray_from_ndc(Vec2::ZERO);
        assert!(ray.dir.abs_diff_eq(Vec3::NEG_Z, 1e-4), "dir={:?}", ray.dir);
        assert!((ray.origin.z - (cam.distance - cam.z_near)).abs() < 1e-3);
    }

    #[test]
    fn center_ray_hits_the_globe() {
        let cam = Camera::for_viewport(700.0, 500.0);
        let ray = cam.ray_from_ndc(Vec2::ZERO);
        assert!(ray.hit_sphere(3.5714).is_some());
    }

    #[test]
    fn corner_ray_misses_a_small_globe() {
        let cam = Camera::for_viewport(700.0, 500.0);
        let ray = cam.ray_from_ndc(Vec2::new(1.0, 1.0));
        assert!(ray.hit_sphere(0.5).is_none());
    }

    #[test]
    fn viewport_change_resets_distance() {
        let mut cam = Camera::for_viewport(800.0, 600.0);
        cam.distance = 3.0;
        cam.set_viewport(400.0, 900.0);
        assert!((cam.distance - DEFAULT_DISTANCE).abs() < f32::EPSILON);
        assert!((cam.aspect - 400.0 / 900.0).abs() < 1e-6);
    }
}
