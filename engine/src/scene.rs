//! Scene construction: the globe group (sphere + atmosphere + one bar per
//! country) and the decorative starfield.

use glam::{Mat4, Quat, Vec2, Vec3};
use rand::{Rng, SeedableRng};

use crate::countries::{format_population, Country};
use crate::geometry::{compute_radius, project_to_sphere};

/// Atmosphere shell scale relative to the sphere radius.
pub const ATMOSPHERE_SCALE: f32 = 1.1;
/// Baseline bar translucency; raised to 1.0 while hovered.
pub const BASE_OPACITY: f32 = 0.4;
/// Number of starfield points.
pub const STAR_COUNT: usize = 10_000;
/// Initial spin of the sphere shell about Y so its seam faces away from
/// the camera at startup.
pub const SPHERE_SPIN_Y: f32 = -std::f32::consts::FRAC_PI_2;

/// One extruded population bar sitting on the globe surface.
#[derive(Clone, Debug)]
pub struct Bar {
    /// The country this bar represents. Owning the record here is the
    /// explicit association; nothing indexes bars and countries in parallel.
    pub country: Country,
    /// Pre-formatted population string for the tooltip.
    pub population_label: String,
    /// Footprint point, always exactly on the current sphere radius.
    pub base: Vec3,
    /// Rotation taking local +Z to the outward surface normal.
    pub rotation: Quat,
    /// Footprint edge length (local x and y).
    pub footprint: f32,
    /// Extrusion length along the outward normal (local z).
    pub extrusion: f32,
    /// Current display opacity.
    pub opacity: f32,
}

impl Bar {
    /// Build a bar for `country` on a sphere of `radius`. `height_rand` is
    /// the random floor sample in [0,1) for small countries' extrusion.
    pub fn new(country: Country, radius: f32, height_rand: f32) -> Self {
        let scale = country.population as f32 / 1.0e9;
        let footprint = (0.1 * scale).max(0.1);
        let extrusion = (0.8 * scale).max(0.4 * height_rand);
        let base = project_to_sphere(country.lat, country.lng, radius);
        let population_label = format_population(country.population);
        let mut bar = Self {
            country,
            population_label,
            base,
            rotation: Quat::IDENTITY,
            footprint,
            extrusion,
            opacity: BASE_OPACITY,
        };
        bar.orient();
        bar
    }

    fn orient(&mut self) {
        self.rotation = Quat::from_rotation_arc(Vec3::Z, self.base.normalize());
    }

    /// Outward surface normal at the footprint.
    pub fn normal(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Box center: the footprint offset outward by half the extrusion, so
    /// the base (not the center) sits on the sphere surface.
    pub fn center(&self) -> Vec3 {
        self.base + self.normal() * (self.extrusion * 0.5)
    }

    /// Half extents in the box's local frame (x, y footprint; z extrusion).
    pub fn half_extents(&self) -> Vec3 {
        Vec3::new(self.footprint * 0.5, self.footprint * 0.5, self.extrusion * 0.5)
    }

    /// Move the footprint to a new sphere radius. Size is untouched; the
    /// angular position (and so the normal) is invariant.
    pub fn reposition(&mut self, radius: f32) {
        self.base = project_to_sphere(self.country.lat, self.country.lng, radius);
        self.orient();
    }

    /// Local-to-world transform for a unit cube centered at the origin.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::new(self.footprint, self.footprint, self.extrusion),
            self.rotation,
            self.center(),
        )
    }
}

/// The whole renderable scene: globe group state plus the starfield.
#[derive(Clone, Debug)]
pub struct GlobeScene {
    /// Current sphere radius.
    pub radius: f32,
    /// Animated group rotation (x = pitch, y = yaw), radians.
    pub rotation: Vec2,
    /// Accumulated drag target the rotation eases toward. Never reset;
    /// survives resizes.
    pub rotation_offset: Vec2,
    /// One bar per valid country.
    pub bars: Vec<Bar>,
    /// Starfield points. Decorative, never pickable.
    pub stars: Vec<Vec3>,
}

impl GlobeScene {
    /// Build the scene for a viewport. `seed` fixes the starfield and the
    /// random floor on bar heights.
    pub fn build(countries: &[Country], width: f32, height: f32, seed: u64) -> Self {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let radius = compute_radius(width, height);

        let bars: Vec<Bar> = countries
            .iter()
            .map(|c| Bar::new(c.clone(), radius, rng.gen::<f32>()))
            .collect();

        let stars: Vec<Vec3> = (0..STAR_COUNT)
            .map(|_| {
                Vec3::new(
                    (rng.gen::<f32>() - 0.5) * 1000.0,
                    (rng.gen::<f32>() - 0.5) * 1000.0,
                    -rng.gen::<f32>() * 10_000.0,
                )
            })
            .collect();

        println!("[scene] radius={radius:.4} bars={} stars={}", bars.len(), stars.len());

        Self { radius, rotation: Vec2::ZERO, rotation_offset: Vec2::ZERO, bars, stars }
    }

    /// Viewport changed: recompute the radius and re-derive every bar's
    /// surface position. Sizes, highlighting, rotation and stars are left
    /// alone.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.radius = compute_radius(width, height);
        for bar in &mut self.bars {
            bar.reposition(self.radius);
        }
    }

    /// Group transform applied to the sphere, atmosphere and bars.
    pub fn group_transform(&self) -> Mat4 {
        Mat4::from_rotation_x(self.rotation.x) * Mat4::from_rotation_y(self.rotation.y)
    }

    /// Reset every bar to the baseline translucency.
    pub fn clear_highlight(&mut self) {
        for bar in &mut self.bars {
            bar.opacity = BASE_OPACITY;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn testland() -> Country {
        Country { name: "Testland".into(), population: 1_000_000_000, lat: 0.0, lng: 0.0 }
    }

    #[test]
    fn reference_bar_dimensions_and_position() {
        // scale = 1 -> footprint 0.1, extrusion >= 0.8, base at (0,0,r).
        let bar = Bar::new(testland(), 5.0, 0.99);
        assert!((bar.footprint - 0.1).abs() < 1e-6);
        assert!(bar.extrusion >= 0.8);
        assert!(bar.base.abs_diff_eq(Vec3::new(0.0, 0.0, 5.0), 1e-4));
        assert!(bar.normal().abs_diff_eq(Vec3::Z, 1e-4));
    }

    #[test]
    fn base_sits_on_the_sphere_and_center_is_outward() {
        let c = Country { name: "X".into(), population: 50_000_000, lat: 37.0, lng: 127.5 };
        let bar = Bar::new(c, 3.5714, 0.5);
        assert!((bar.base.length() - 3.5714).abs() < 1e-4);
        // Center is strictly farther out than the base, along the normal.
        assert!(bar.center().length() > bar.base.length());
        let along = (bar.center() - bar.base).normalize();
        assert!(along.abs_diff_eq(bar.normal(), 1e-4));
    }

    #[test]
    fn tiny_population_gets_floor_sizes() {
        let c = Country { name: "Tiny".into(), population: 1_000, lat: 10.0, lng: 10.0 };
        let bar = Bar::new(c, 5.0, 0.25);
        assert!((bar.footprint - 0.1).abs() < 1e-6);
        assert!((bar.extrusion - 0.1).abs() < 1e-6); // 0.4 * 0.25 beats 0.8 * scale
    }

    #[test]
    fn build_counts_and_star_bounds() {
        let scene = GlobeScene::build(&[testland()], 700.0, 500.0, 7);
        assert_eq!(scene.bars.len(), 1);
        assert_eq!(scene.stars.len(), STAR_COUNT);
        assert!((scene.radius - 3.5714).abs() < 1e-6);
        for s in &scene.stars {
            assert!(s.x.abs() <= 500.0 && s.y.abs() <= 500.0);
            assert!(s.z <= 0.0 && s.z > -10_000.0);
        }
    }

    #[test]
    fn resize_preserves_direction_and_scales_magnitude() {
        let countries = [
            testland(),
            Country { name: "N".into(), population: 5_000_000, lat: 62.0, lng: 10.0 },
        ];
        let mut scene = GlobeScene::build(&countries, 700.0, 500.0, 7);
        let before: Vec<Vec3> = scene.bars.iter().map(|b| b.base).collect();
        scene.resize(1400.0, 1000.0);
        let r2 = scene.radius;
        assert!((r2 - 7.1429).abs() < 1e-4);
        for (bar, old) in scene.bars.iter().zip(&before) {
            assert!(bar.base.normalize().abs_diff_eq(old.normalize(), 1e-5));
            assert!((bar.base.length() - r2).abs() < 1e-3);
        }
    }

    #[test]
    fn resize_leaves_rotation_offset_alone() {
        let mut scene = GlobeScene::build(&[testland()], 700.0, 500.0, 7);
        scene.rotation_offset = Vec2::new(0.3, -0.7);
        scene.resize(300.0, 300.0);
        assert_eq!(scene.rotation_offset, Vec2::new(0.3, -0.7));
    }
}
