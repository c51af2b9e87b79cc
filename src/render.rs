//! Draw-call descriptors collected during the draw pass.
//!
//! The scene graph does not render anything itself. Every frame it appends a
//! [`DrawCall`] per visible mesh to a [`DrawList`] which the renderer drains.
//!
//! # Key types
//!
//! - [`DrawCall<'a, B>`] is everything needed for one indexed draw
//! - [`DrawList<'a, B>`] is the per-frame collection of draw calls
//!

use crate::{
    data_structures::{material::Material, vertex::VertexLayout},
    gpu::GpuBackend,
};

/// One indexed draw of a mesh.
///
/// Buffers, material and layout are borrowed from the mesh; only the world
/// transform is per node.
pub struct DrawCall<'a, B: GpuBackend = wgpu::Device> {
    pub vertex_buffer: &'a B::Buffer,
    pub index_buffer: &'a B::Buffer,
    pub index_count: u32,
    pub topology: wgpu::PrimitiveTopology,
    pub material: &'a Material,
    pub layout: &'a VertexLayout,
    pub transform: cgmath::Matrix4<f32>,
}

impl<'a, B: GpuBackend> DrawCall<'a, B> {
    pub fn with_transform(self, transform: cgmath::Matrix4<f32>) -> Self {
        Self { transform, ..self }
    }
}

impl DrawCall<'_, wgpu::Device> {
    /// Binds the mesh buffers and issues the draw. The pipeline, material bind
    /// groups and the transform must already be set on the pass.
    pub fn record(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Draw calls of one frame, in submission order.
pub struct DrawList<'a, B: GpuBackend = wgpu::Device> {
    calls: Vec<DrawCall<'a, B>>,
}

impl<'a, B: GpuBackend> DrawList<'a, B> {
    pub fn new() -> Self {
        Self { calls: Vec::new() }
    }

    pub fn push(&mut self, call: DrawCall<'a, B>) {
        self.calls.push(call);
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrawCall<'a, B>> {
        self.calls.iter()
    }

    /// Total number of indices submitted this frame.
    pub fn index_count(&self) -> u64 {
        self.calls.iter().map(|call| call.index_count as u64).sum()
    }
}

impl<'a, B: GpuBackend> Default for DrawList<'a, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, B: GpuBackend> IntoIterator for DrawList<'a, B> {
    type Item = DrawCall<'a, B>;
    type IntoIter = std::vec::IntoIter<DrawCall<'a, B>>;

    fn into_iter(self) -> Self::IntoIter {
        self.calls.into_iter()
    }
}

impl DrawList<'_, wgpu::Device> {
    pub fn record(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        for call in &self.calls {
            call.record(render_pass);
        }
    }
}
