use glam::Mat4;

use super::mesh::{BarInstance, SceneBuffers, SceneVertex};

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
}

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

fn mesh_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<SceneVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 12,
                shader_location: 1,
            },
        ],
    }
}

fn bar_instance_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<BarInstance>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &[
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: 0,
                shader_location: 2,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: 16,
                shader_location: 3,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: 32,
                shader_location: 4,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: 48,
                shader_location: 5,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: 64,
                shader_location: 6,
            },
        ],
    }
}

fn star_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: 12,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: 0,
        }],
    }
}

struct GlobalsSlot {
    buf: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl GlobalsSlot {
    fn new(device: &wgpu::Device, bgl: &wgpu::BindGroupLayout, label: &str) -> Self {
        let buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: buf.as_entire_binding() }],
        });
        Self { buf, bind_group }
    }

    fn write(&self, queue: &wgpu::Queue, view_proj: Mat4, model: Mat4) {
        let globals = Globals {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
        };
        queue.write_buffer(&self.buf, 0, bytemuck::bytes_of(&globals));
    }
}

/// Render pipelines and per-draw uniforms for the globe scene.
pub struct GlobeRenderer {
    sphere_pipeline: wgpu::RenderPipeline,
    atmosphere_pipeline: wgpu::RenderPipeline,
    bar_pipeline: wgpu::RenderPipeline,
    star_pipeline: wgpu::RenderPipeline,
    sphere_globals: GlobalsSlot,
    atmosphere_globals: GlobalsSlot,
    shared_globals: GlobalsSlot,
    depth_view: wgpu::TextureView,
}

impl GlobeRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("globe shaders"),
            source: wgpu::ShaderSource::Wgsl(include_str!("globe.wgsl").into()),
        });

        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("globe layout"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });

        let depth_on = wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        };
        let depth_read_only = wgpu::DepthStencilState {
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::LessEqual,
            ..depth_on.clone()
        };

        let opaque_target = [Some(wgpu::ColorTargetState {
            format: surface_format,
            blend: None,
            write_mask: wgpu::ColorWrites::ALL,
        })];
        let alpha_target = [Some(wgpu::ColorTargetState {
            format: surface_format,
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            write_mask: wgpu::ColorWrites::ALL,
        })];
        let additive_target = [Some(wgpu::ColorTargetState {
            format: surface_format,
            blend: Some(wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
            }),
            write_mask: wgpu::ColorWrites::ALL,
        })];

        let triangles = |cull: Option<wgpu::Face>| wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: cull,
            ..wgpu::PrimitiveState::default()
        };

        let sphere_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sphere pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_mesh",
                buffers: &[mesh_vertex_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_sphere",
                targets: &opaque_target,
            }),
            primitive: triangles(Some(wgpu::Face::Back)),
            depth_stencil: Some(depth_on.clone()),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        // Back faces only, additive, no depth write: the glow shell.
        let atmosphere_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("atmosphere pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_mesh",
                buffers: &[mesh_vertex_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_atmosphere",
                targets: &additive_target,
            }),
            primitive: triangles(Some(wgpu::Face::Front)),
            depth_stencil: Some(depth_read_only.clone()),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let bar_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("bar pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_bar",
                buffers: &[mesh_vertex_layout(), bar_instance_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_bar",
                targets: &alpha_target,
            }),
            primitive: triangles(Some(wgpu::Face::Back)),
            depth_stencil: Some(depth_on.clone()),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let star_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("star pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_star",
                buffers: &[star_vertex_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_star",
                targets: &opaque_target,
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::PointList,
                ..wgpu::PrimitiveState::default()
            },
            depth_stencil: Some(depth_on),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        Self {
            sphere_pipeline,
            atmosphere_pipeline,
            bar_pipeline,
            star_pipeline,
            sphere_globals: GlobalsSlot::new(device, &bgl, "sphere globals"),
            atmosphere_globals: GlobalsSlot::new(device, &bgl, "atmosphere globals"),
            shared_globals: GlobalsSlot::new(device, &bgl, "shared globals"),
            depth_view: Self::make_depth(device, width, height),
        }
    }

    fn make_depth(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let tex = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("scene depth"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        tex.create_view(&wgpu::TextureViewDescriptor::default())
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_view = Self::make_depth(device, width, height);
    }

    /// Record one frame of the scene into `encoder`, drawing to `view`.
    pub fn render(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        buffers: &SceneBuffers,
        app: &engine::app::App,
    ) {
        let view_proj = app.camera.view_proj();
        let group = app.scene.group_transform();
        let spin = Mat4::from_rotation_y(engine::scene::SPHERE_SPIN_Y);
        let shell = Mat4::from_scale(glam::Vec3::splat(engine::scene::ATMOSPHERE_SCALE));
        self.sphere_globals.write(queue, view_proj, group * spin);
        self.atmosphere_globals.write(queue, view_proj, group * shell);
        self.shared_globals.write(queue, view_proj, Mat4::IDENTITY);
        buffers.write_bar_instances(queue, &app.scene);

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        rpass.set_pipeline(&self.star_pipeline);
        rpass.set_bind_group(0, &self.shared_globals.bind_group, &[]);
        rpass.set_vertex_buffer(0, buffers.stars.vertex_buf.slice(..));
        rpass.draw(0..buffers.stars.count, 0..1);

        rpass.set_pipeline(&self.sphere_pipeline);
        rpass.set_bind_group(0, &self.sphere_globals.bind_group, &[]);
        rpass.set_vertex_buffer(0, buffers.sphere.vertex_buf.slice(..));
        rpass.set_index_buffer(buffers.sphere.index_buf.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..buffers.sphere.index_count, 0, 0..1);

        if buffers.bar_count > 0 {
            rpass.set_pipeline(&self.bar_pipeline);
            rpass.set_bind_group(0, &self.shared_globals.bind_group, &[]);
            rpass.set_vertex_buffer(0, buffers.cube.vertex_buf.slice(..));
            rpass.set_vertex_buffer(1, buffers.bar_instances.slice(..));
            rpass.set_index_buffer(buffers.cube.index_buf.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..buffers.cube.index_count, 0, 0..buffers.bar_count);
        }

        rpass.set_pipeline(&self.atmosphere_pipeline);
        rpass.set_bind_group(0, &self.atmosphere_globals.bind_group, &[]);
        rpass.set_vertex_buffer(0, buffers.atmosphere.vertex_buf.slice(..));
        rpass.set_index_buffer(buffers.atmosphere.index_buf.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..buffers.atmosphere.index_count, 0, 0..1);
    }
}
