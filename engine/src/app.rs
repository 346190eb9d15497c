//! Application state: scene, camera and input bundled into one owned
//! struct so nothing lives in ambient globals.

use glam::Vec2;

use crate::camera::Camera;
use crate::countries::Country;
use crate::interaction::{InputController, Tooltip};
use crate::scene::GlobeScene;

/// What a frame hands back to the presentation layer.
#[derive(Clone, Debug, Default)]
pub struct FrameOutput {
    /// Tooltip for the hovered bar, or `None` to hide it.
    pub tooltip: Option<Tooltip>,
}

/// Everything mutable in the session: scene, camera and input state.
#[derive(Clone, Debug)]
pub struct App {
    /// The globe group and starfield.
    pub scene: GlobeScene,
    /// Fixed perspective camera.
    pub camera: Camera,
    /// Pointer state machine and rotation tween.
    pub input: InputController,
    /// Vertical offset of the canvas within the window (stacked layouts).
    pub canvas_top: f32,
    window: Vec2,
}

impl App {
    /// Build the scene for a viewport and wire up the default camera.
    pub fn new(countries: &[Country], width: f32, height: f32, seed: u64) -> Self {
        Self {
            scene: GlobeScene::build(countries, width, height, seed),
            camera: Camera::for_viewport(width, height),
            input: InputController::default(),
            canvas_top: 0.0,
            window: Vec2::new(width, height),
        }
    }

    /// Viewport changed: new radius, repositioned bars, rebuilt projection.
    /// Rotation offset and highlighting are untouched.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.window = Vec2::new(width, height);
        self.scene.resize(width, height);
        self.camera.set_viewport(width, height);
    }

    /// Mouse button pressed at a pixel position.
    pub fn pointer_down(&mut self, px: Vec2) {
        self.input.pointer_down(px);
    }

    /// Mouse moved to a pixel position.
    pub fn pointer_move(&mut self, px: Vec2) {
        self.input.pointer_move(px, self.window, self.canvas_top, &mut self.scene);
    }

    /// Mouse button released.
    pub fn pointer_up(&mut self) {
        self.input.pointer_up();
    }

    /// Touch moved to a pixel position.
    pub fn touch_move(&mut self, px: Vec2) {
        self.input.touch_move(px, self.window, self.canvas_top, &mut self.scene, &self.camera);
    }

    /// Touch lifted.
    pub fn touch_end(&mut self) {
        self.input.pointer_up();
    }

    /// Advance the rotation tween and run picking for this frame.
    pub fn frame(&mut self, dt: f32) -> FrameOutput {
        let tooltip = self.input.frame(dt, &mut self.scene, &self.camera);
        FrameOutput { tooltip }
    }
}
