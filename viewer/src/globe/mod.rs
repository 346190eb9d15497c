//! Globe rendering: scene buffers and the wgpu pipelines that draw them.

pub mod mesh;
pub mod pipeline;
