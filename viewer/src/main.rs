//! Population globe viewer binary.
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::dbg_macro, clippy::large_enum_variant)]

mod globe;

use egui_wgpu::Renderer as EguiRenderer;
use egui_wgpu::ScreenDescriptor;
use egui_winit::State as EguiWinitState;
use glam::Vec2;
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, MouseButton, TouchPhase, WindowEvent},
    event_loop::EventLoop,
    window::{Window, WindowBuilder},
};

use globe::mesh::SceneBuffers;
use globe::pipeline::GlobeRenderer;

/// Fixes the starfield layout and the random floor on bar heights.
const STAR_SEED: u64 = 12345;

struct GpuState<'w> {
    _instance: wgpu::Instance,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
}

impl<'w> GpuState<'w> {
    async fn new(window: &'w Window) -> Self {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = match instance.create_surface(window) {
            Ok(s) => s,
            Err(e) => panic!("create surface: {e}"),
        };

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .unwrap_or_else(|| panic!("no suitable GPU adapters"));

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await
            .unwrap_or_else(|e| panic!("request device: {e}"));

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Self { _instance: instance, surface, device, queue, config }
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }
}

fn main() {
    let countries = engine::countries::embedded()
        .unwrap_or_else(|e| panic!("load country dataset: {e}"));
    println!("[data] {} countries loaded", countries.len());

    let event_loop = EventLoop::new().unwrap_or_else(|e| panic!("event loop: {e}"));
    let title = format!("Population Globe v{}", engine::version());
    let window_init = WindowBuilder::new()
        .with_title(title)
        .build(&event_loop)
        .unwrap_or_else(|e| panic!("create window: {e}"));

    // Leak the window to obtain a 'static reference for the surface lifetime without unsafe.
    let window: &'static Window = Box::leak(Box::new(window_init));
    let mut gpu = pollster::block_on(GpuState::new(window));
    let egui_ctx = egui::Context::default();
    let mut egui_state =
        EguiWinitState::new(egui_ctx.clone(), egui::ViewportId::ROOT, &event_loop, None, None);
    let mut egui_renderer = EguiRenderer::new(&gpu.device, gpu.config.format, None, 1);

    let size = window.inner_size();
    let mut app =
        engine::app::App::new(&countries, size.width as f32, size.height as f32, STAR_SEED);
    let mut buffers = SceneBuffers::new(&gpu.device, &app.scene);
    let mut renderer = GlobeRenderer::new(&gpu.device, gpu.config.format, size.width, size.height);

    let mut cursor_px = Vec2::ZERO;
    let mut last_frame = std::time::Instant::now();

    event_loop
        .run(move |event, elwt| match event {
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::WindowEvent { event, window_id } if window_id == window.id() => {
                let _ = egui_state.on_window_event(window, &event);
                match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::Resized(new_size) => {
                        gpu.resize(new_size);
                        app.resize(new_size.width as f32, new_size.height as f32);
                        buffers.rebuild_spheres(&gpu.device, app.scene.radius);
                        renderer.resize(&gpu.device, new_size.width, new_size.height);
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        cursor_px = Vec2::new(position.x as f32, position.y as f32);
                        app.pointer_move(cursor_px);
                    }
                    WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                        match state {
                            ElementState::Pressed => app.pointer_down(cursor_px),
                            ElementState::Released => app.pointer_up(),
                        }
                    }
                    WindowEvent::Touch(touch) => {
                        let px = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                        cursor_px = px;
                        match touch.phase {
                            TouchPhase::Started | TouchPhase::Moved => app.touch_move(px),
                            TouchPhase::Ended | TouchPhase::Cancelled => app.touch_end(),
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        let now = std::time::Instant::now();
                        let dt = now.duration_since(last_frame).as_secs_f32();
                        last_frame = now;
                        let out = app.frame(dt);

                        let ppp = window.scale_factor() as f32;
                        let raw_input = egui_state.take_egui_input(window);
                        let full_output = egui_ctx.run(raw_input, |ctx| {
                            if let Some(tip) = &out.tooltip {
                                let at =
                                    egui::pos2(cursor_px.x / ppp + 16.0, cursor_px.y / ppp + 16.0);
                                egui::Area::new(egui::Id::new("country tooltip"))
                                    .fixed_pos(at)
                                    .show(ctx, |ui| {
                                        egui::Frame::popup(ui.style()).show(ui, |ui| {
                                            ui.label(egui::RichText::new(&tip.name).strong());
                                            ui.label(&tip.population);
                                        });
                                    });
                            }
                        });

                        for (id, image_delta) in &full_output.textures_delta.set {
                            egui_renderer.update_texture(&gpu.device, &gpu.queue, *id, image_delta);
                        }
                        for id in &full_output.textures_delta.free {
                            egui_renderer.free_texture(id);
                        }
                        let paint_jobs = egui_ctx.tessellate(full_output.shapes, ppp);

                        let frame = match gpu.surface.get_current_texture() {
                            Ok(f) => f,
                            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                gpu.resize(window.inner_size());
                                return;
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                elwt.exit();
                                return;
                            }
                            Err(wgpu::SurfaceError::Timeout) => {
                                return;
                            }
                        };
                        let view =
                            frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
                        let mut encoder = gpu.device.create_command_encoder(
                            &wgpu::CommandEncoderDescriptor { label: Some("encoder") },
                        );

                        renderer.render(&gpu.queue, &mut encoder, &view, &buffers, &app);

                        let screen_desc = ScreenDescriptor {
                            size_in_pixels: [gpu.config.width, gpu.config.height],
                            pixels_per_point: ppp,
                        };
                        egui_renderer.update_buffers(
                            &gpu.device,
                            &gpu.queue,
                            &mut encoder,
                            &paint_jobs,
                            &screen_desc,
                        );
                        {
                            let mut rpass =
                                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                                    label: Some("egui pass"),
                                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                        view: &view,
                                        resolve_target: None,
                                        ops: wgpu::Operations {
                                            load: wgpu::LoadOp::Load,
                                            store: wgpu::StoreOp::Store,
                                        },
                                    })],
                                    depth_stencil_attachment: None,
                                    occlusion_query_set: None,
                                    timestamp_writes: None,
                                });
                            egui_renderer.render(&mut rpass, &paint_jobs, &screen_desc);
                        }
                        gpu.queue.submit(std::iter::once(encoder.finish()));
                        frame.present();

                        egui_state.handle_platform_output(window, full_output.platform_output);
                    }
                    _ => {}
                }
            }
            _ => {}
        })
        .unwrap_or_else(|e| panic!("run app: {e}"));
}
