//! Vertex attributes and their packed GPU layout.
//!
//! A mesh only uploads the attributes its source actually provides. The
//! packed order is position, normal, color, uv, weights and every present
//! attribute keeps a fixed shader location, so shaders can rely on
//! `@location(3)` being the uv no matter what else is missing.

use std::mem;

bitflags::bitflags! {
    /// Attributes present in a mesh's vertices.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct VertexFormat: u32 {
        const POSITION = 1 << 0;
        const UV = 1 << 1;
        const NORMAL = 1 << 2;
        const COLOR = 1 << 3;
        const WEIGHTS = 1 << 4;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
    pub color: [f32; 3],
    pub weights: [f32; 4],
}

/// (attribute, shader location, wgpu format, float count) in packing order.
const ATTRIBUTES: [(VertexFormat, u32, wgpu::VertexFormat, usize); 5] = [
    (VertexFormat::POSITION, 0, wgpu::VertexFormat::Float32x3, 3),
    (VertexFormat::NORMAL, 1, wgpu::VertexFormat::Float32x3, 3),
    (VertexFormat::COLOR, 2, wgpu::VertexFormat::Float32x3, 3),
    (VertexFormat::UV, 3, wgpu::VertexFormat::Float32x2, 2),
    (VertexFormat::WEIGHTS, 4, wgpu::VertexFormat::Float32x4, 4),
];

impl Vertex {
    fn attribute(&self, attribute: VertexFormat) -> &[f32] {
        if attribute == VertexFormat::POSITION {
            &self.position
        } else if attribute == VertexFormat::NORMAL {
            &self.normal
        } else if attribute == VertexFormat::COLOR {
            &self.color
        } else if attribute == VertexFormat::UV {
            &self.uv
        } else if attribute == VertexFormat::WEIGHTS {
            &self.weights
        } else {
            &[]
        }
    }
}

/// Interleaves the attributes present in `format`; absent ones take no space.
pub fn pack_vertices(vertices: &[Vertex], format: VertexFormat) -> Vec<f32> {
    let layout = VertexLayout::new(format);
    let mut packed = Vec::with_capacity(vertices.len() * layout.floats_per_vertex());
    for vertex in vertices {
        for (attribute, ..) in ATTRIBUTES.iter().filter(|(a, ..)| format.contains(*a)) {
            packed.extend_from_slice(vertex.attribute(*attribute));
        }
    }
    packed
}

/// Byte layout of packed vertices, ready to be handed to a render pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct VertexLayout {
    stride: wgpu::BufferAddress,
    attributes: Vec<wgpu::VertexAttribute>,
}

impl VertexLayout {
    pub fn new(format: VertexFormat) -> Self {
        let mut offset = 0;
        let attributes = ATTRIBUTES
            .iter()
            .filter(|(attribute, ..)| format.contains(*attribute))
            .map(|&(_, shader_location, vertex_format, floats)| {
                let attribute = wgpu::VertexAttribute {
                    format: vertex_format,
                    offset,
                    shader_location,
                };
                offset += (floats * mem::size_of::<f32>()) as wgpu::BufferAddress;
                attribute
            })
            .collect();
        Self {
            stride: offset,
            attributes,
        }
    }

    pub fn stride(&self) -> wgpu::BufferAddress {
        self.stride
    }

    pub fn attributes(&self) -> &[wgpu::VertexAttribute] {
        &self.attributes
    }

    fn floats_per_vertex(&self) -> usize {
        self.stride as usize / mem::size_of::<f32>()
    }

    pub fn desc(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}
