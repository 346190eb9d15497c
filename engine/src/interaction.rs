//! Pointer/touch input: drag-to-rotate state machine, coordinate
//! normalization, per-frame picking and the smoothed rotation tween.
//!
//! Mouse and touch share one delta/offset/tween path; only coordinate
//! acquisition and drag-start detection differ.

use glam::{Vec2, Vec3};

use crate::camera::Camera;
use crate::geometry::Ray;
use crate::scene::GlobeScene;

/// Radians of rotation per pixel of drag.
pub const DRAG_SENSITIVITY: f32 = 0.005;
/// Below this window width the canvas sits in a stacked layout and pointer
/// y must be corrected by the canvas top offset.
pub const STACKED_BREAKPOINT_PX: f32 = 1280.0;
/// Time-units the rotation takes to ease toward the accumulated offset.
pub const TWEEN_DURATION: f32 = 2.0;

/// Raw pointer record shared by the mouse and touch handlers.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerState {
    /// Last normalized device position; unset until the first move.
    pub ndc: Option<Vec2>,
    /// Previous pixel position, for frame-to-frame drag deltas.
    pub prev_px: Option<Vec2>,
    /// Whether a drag is in progress.
    pub dragging: bool,
}

/// Map viewport pixels to [-1,1] normalized device coordinates. In the
/// stacked (narrow) layout the canvas is vertically offset by `canvas_top`.
pub fn normalize_pointer(px: Vec2, window: Vec2, canvas_top: f32) -> Vec2 {
    let w = window.x.max(1.0);
    let h = window.y.max(1.0);
    let y_px = if window.x >= STACKED_BREAKPOINT_PX { px.y } else { px.y - canvas_top };
    Vec2::new(px.x / w * 2.0 - 1.0, -(y_px / h) * 2.0 + 1.0)
}

/// Eases the group rotation toward a target over a fixed duration with a
/// quadratic ease-out, retargeted from the live value on every new delta.
/// This is what makes the globe trail the cursor instead of tracking 1:1.
#[derive(Clone, Copy, Debug)]
pub struct RotationTween {
    from: Vec2,
    to: Vec2,
    elapsed: f32,
}

impl RotationTween {
    /// A finished tween resting at `at`.
    pub fn resting(at: Vec2) -> Self {
        Self { from: at, to: at, elapsed: TWEEN_DURATION }
    }

    /// Restart toward `target` from the current animated value.
    pub fn retarget(&mut self, current: Vec2, target: Vec2) {
        self.from = current;
        self.to = target;
        self.elapsed = 0.0;
    }

    /// Advance by `dt` time-units and return the new animated value.
    pub fn advance(&mut self, dt: f32) -> Vec2 {
        self.elapsed = (self.elapsed + dt).min(TWEEN_DURATION);
        self.value()
    }

    /// Current animated value.
    pub fn value(&self) -> Vec2 {
        let t = (self.elapsed / TWEEN_DURATION).clamp(0.0, 1.0);
        let eased = t * (2.0 - t);
        self.from + (self.to - self.from) * eased
    }
}

/// A single bar intersection, `t` along the ray.
#[derive(Clone, Copy, Debug)]
pub struct PickHit {
    /// Index into `scene.bars`.
    pub index: usize,
    /// Ray parameter at entry; smaller is nearer the camera.
    pub t: f32,
}

/// Tooltip payload for the hovered bar.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    /// Country display name.
    pub name: String,
    /// Population, thousands-separated.
    pub population: String,
}

/// Intersect a world-space ray against the bars only (the sphere,
/// atmosphere and stars are never candidates), nearest hit first. The ray
/// is carried into the rotating group's local frame first.
pub fn pick_bars(ray: Ray, scene: &GlobeScene) -> Vec<PickHit> {
    let inv = scene.group_transform().inverse();
    let local = Ray {
        origin: inv.transform_point3(ray.origin),
        dir: inv.transform_vector3(ray.dir).normalize(),
    };
    let mut hits: Vec<PickHit> = scene
        .bars
        .iter()
        .enumerate()
        .filter_map(|(index, bar)| {
            local
                .hit_box(bar.center(), bar.rotation, bar.half_extents())
                .map(|t| PickHit { index, t })
        })
        .collect();
    hits.sort_by(|a, b| a.t.partial_cmp(&b.t).unwrap_or(std::cmp::Ordering::Equal));
    hits
}

/// Per-frame highlight pass: every bar drops to the baseline opacity, hits
/// are raised to full, and the tooltip reflects the hit nearest the camera
/// (deterministic tie-break when the ray passes through several bars).
pub fn update_highlight(scene: &mut GlobeScene, ray: Option<Ray>) -> Option<Tooltip> {
    scene.clear_highlight();
    let ray = ray?;
    let hits = pick_bars(ray, scene);
    for hit in &hits {
        scene.bars[hit.index].opacity = 1.0;
    }
    hits.first().map(|hit| {
        let bar = &scene.bars[hit.index];
        Tooltip { name: bar.country.name.clone(), population: bar.population_label.clone() }
    })
}

/// Input controller: owns the pointer record and the rotation tween, and
/// feeds drag deltas into the scene's rotation offset.
#[derive(Clone, Copy, Debug)]
pub struct InputController {
    /// Shared pointer record.
    pub pointer: PointerState,
    tween: RotationTween,
}

impl Default for InputController {
    fn default() -> Self {
        Self { pointer: PointerState::default(), tween: RotationTween::resting(Vec2::ZERO) }
    }
}

impl InputController {
    /// Mouse button pressed: start dragging from this pixel position.
    pub fn pointer_down(&mut self, px: Vec2) {
        self.pointer.dragging = true;
        self.pointer.prev_px = Some(px);
    }

    /// Mouse button released or touch ended: stop dragging unconditionally.
    pub fn pointer_up(&mut self) {
        self.pointer.dragging = false;
    }

    /// Mouse moved. Updates the picking position and, while dragging,
    /// accumulates the rotation offset.
    pub fn pointer_move(
        &mut self,
        px: Vec2,
        window: Vec2,
        canvas_top: f32,
        scene: &mut GlobeScene,
    ) {
        self.pointer.ndc = Some(normalize_pointer(px, window, canvas_top));
        if self.pointer.dragging {
            self.apply_drag(px, scene);
        } else {
            self.pointer.prev_px = Some(px);
        }
    }

    /// Touch moved. There is no separate touch-down wired to drag-start: the
    /// first move whose ray hits the sphere begins the drag.
    pub fn touch_move(
        &mut self,
        px: Vec2,
        window: Vec2,
        canvas_top: f32,
        scene: &mut GlobeScene,
        camera: &Camera,
    ) {
        let ndc = normalize_pointer(px, window, canvas_top);
        self.pointer.ndc = Some(ndc);
        if !self.pointer.dragging {
            let hits_globe = camera.ray_from_ndc(ndc).hit_sphere(scene.radius).is_some();
            if hits_globe {
                self.pointer.dragging = true;
                self.pointer.prev_px = Some(px);
                return; // delta starts from the next move
            }
        }
        if self.pointer.dragging {
            self.apply_drag(px, scene);
        }
    }

    fn apply_drag(&mut self, px: Vec2, scene: &mut GlobeScene) {
        if let Some(prev) = self.pointer.prev_px {
            let delta = px - prev;
            scene.rotation_offset.x += delta.y * DRAG_SENSITIVITY;
            scene.rotation_offset.y += delta.x * DRAG_SENSITIVITY;
            self.tween.retarget(scene.rotation, scene.rotation_offset);
        }
        self.pointer.prev_px = Some(px);
    }

    /// Per-frame work: advance the smoothed rotation and run the highlight
    /// pass for the current pointer position.
    pub fn frame(&mut self, dt: f32, scene: &mut GlobeScene, camera: &Camera) -> Option<Tooltip> {
        scene.rotation = self.tween.advance(dt);
        let ray = self.pointer.ndc.map(|ndc| camera.ray_from_ndc(ndc));
        update_highlight(scene, ray)
    }

    /// Point on the sphere the pointer is over, if any. Handy for debugging
    /// and for drag-start checks by callers that already have a ray.
    pub fn pointer_on_globe(&self, scene: &GlobeScene, camera: &Camera) -> Option<Vec3> {
        let ndc = self.pointer.ndc?;
        let ray = camera.ray_from_ndc(ndc);
        let t = ray.hit_sphere(scene.radius)?;
        Some(ray.origin + ray.dir * t)
    }
}
