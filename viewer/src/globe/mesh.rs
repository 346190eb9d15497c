use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// Angular resolution of the sphere and atmosphere shells.
pub const SPHERE_SEGMENTS: u32 = 50;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct SceneVertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct BarInstance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

pub struct Mesh {
    pub vertex_buf: wgpu::Buffer,
    pub index_buf: wgpu::Buffer,
    pub index_count: u32,
}

/// UV sphere at `radius`, shared-vertex rings and sectors.
pub fn build_sphere_mesh(device: &wgpu::Device, radius: f32, segments: u32) -> Mesh {
    let rings = segments;
    let sectors = segments;
    let mut verts: Vec<SceneVertex> = Vec::with_capacity(((rings + 1) * (sectors + 1)) as usize);
    for ring in 0..=rings {
        let theta = std::f32::consts::PI * ring as f32 / rings as f32;
        let (sin_t, cos_t) = theta.sin_cos();
        for sector in 0..=sectors {
            let phi = std::f32::consts::TAU * sector as f32 / sectors as f32;
            let (sin_p, cos_p) = phi.sin_cos();
            let n = [sin_t * sin_p, cos_t, sin_t * cos_p];
            verts.push(SceneVertex {
                pos: [n[0] * radius, n[1] * radius, n[2] * radius],
                normal: n,
            });
        }
    }
    let mut indices: Vec<u32> = Vec::with_capacity((rings * sectors * 6) as usize);
    let stride = sectors + 1;
    for ring in 0..rings {
        for sector in 0..sectors {
            let a = ring * stride + sector;
            let b = a + stride;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }

    let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("sphere vertices"),
        contents: bytemuck::cast_slice(&verts),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("sphere indices"),
        contents: bytemuck::cast_slice(&indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    Mesh { vertex_buf, index_buf, index_count: indices.len() as u32 }
}

/// Unit cube spanning [-0.5, 0.5] on every axis, one normal per face.
pub fn build_unit_cube(device: &wgpu::Device) -> Mesh {
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        // normal, tangent u, tangent v
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ];
    let mut verts: Vec<SceneVertex> = Vec::with_capacity(24);
    let mut indices: Vec<u32> = Vec::with_capacity(36);
    for (n, u, v) in faces {
        let base = verts.len() as u32;
        for (su, sv) in [(-0.5f32, -0.5f32), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            let pos = [
                n[0] * 0.5 + u[0] * su + v[0] * sv,
                n[1] * 0.5 + u[1] * su + v[1] * sv,
                n[2] * 0.5 + u[2] * su + v[2] * sv,
            ];
            verts.push(SceneVertex { pos, normal: n });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("bar cube vertices"),
        contents: bytemuck::cast_slice(&verts),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("bar cube indices"),
        contents: bytemuck::cast_slice(&indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    Mesh { vertex_buf, index_buf, index_count: indices.len() as u32 }
}

pub struct StarBuffer {
    pub vertex_buf: wgpu::Buffer,
    pub count: u32,
}

pub fn build_star_buffer(device: &wgpu::Device, stars: &[glam::Vec3]) -> StarBuffer {
    let verts: Vec<[f32; 3]> = stars.iter().map(|s| [s.x, s.y, s.z]).collect();
    let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("star vertices"),
        contents: bytemuck::cast_slice(&verts),
        usage: wgpu::BufferUsages::VERTEX,
    });
    StarBuffer { vertex_buf, count: verts.len() as u32 }
}

/// All vertex/index/instance buffers for the scene. Sphere and atmosphere
/// geometry is dropped and rebuilt on resize; the bar cube and star buffer
/// live for the whole session (bars move via per-instance transforms).
pub struct SceneBuffers {
    pub sphere: Mesh,
    pub atmosphere: Mesh,
    pub cube: Mesh,
    pub stars: StarBuffer,
    pub bar_instances: wgpu::Buffer,
    pub bar_count: u32,
}

/// Cyan bar color (#3BF7FF); opacity comes per bar.
const BAR_RGB: [f32; 3] = [0.231, 0.969, 1.0];

impl SceneBuffers {
    pub fn new(device: &wgpu::Device, scene: &engine::scene::GlobeScene) -> Self {
        let bar_count = scene.bars.len() as u32;
        let bar_instances = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("bar instances"),
            size: (scene.bars.len().max(1) * std::mem::size_of::<BarInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            sphere: build_sphere_mesh(device, scene.radius, SPHERE_SEGMENTS),
            atmosphere: build_sphere_mesh(device, scene.radius, SPHERE_SEGMENTS),
            cube: build_unit_cube(device),
            stars: build_star_buffer(device, &scene.stars),
            bar_instances,
            bar_count,
        }
    }

    /// Radius changed: reallocate the sphere and atmosphere shells. Bars and
    /// stars keep their buffers.
    pub fn rebuild_spheres(&mut self, device: &wgpu::Device, radius: f32) {
        self.sphere = build_sphere_mesh(device, radius, SPHERE_SEGMENTS);
        self.atmosphere = build_sphere_mesh(device, radius, SPHERE_SEGMENTS);
    }

    /// Rewrite the per-instance transforms and opacities for this frame.
    pub fn write_bar_instances(&self, queue: &wgpu::Queue, scene: &engine::scene::GlobeScene) {
        let group = scene.group_transform();
        let instances: Vec<BarInstance> = scene
            .bars
            .iter()
            .map(|bar| BarInstance {
                model: (group * bar.transform()).to_cols_array_2d(),
                color: [BAR_RGB[0], BAR_RGB[1], BAR_RGB[2], bar.opacity],
            })
            .collect();
        if !instances.is_empty() {
            queue.write_buffer(&self.bar_instances, 0, bytemuck::cast_slice(&instances));
        }
    }
}
