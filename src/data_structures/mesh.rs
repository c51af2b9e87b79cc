//! Triangle meshes built from imported geometry.
//!
//! A [`Mesh`] goes through two steps. [`Mesh::from_imported`] copies the
//! vertex channels, faces and material out of the import data. Then
//! [`Mesh::make_buffers`] uploads the packed vertices and indices once;
//! the buffers live exactly as long as the mesh.

use cgmath::SquareMatrix;
use log::warn;
use thiserror::Error;

use crate::{
    data_structures::{
        material::Material,
        vertex::{Vertex, VertexFormat, VertexLayout, pack_vertices},
    },
    gpu::{BufferUsage, GpuBackend},
    render::DrawCall,
    resources::import::{ImportedMaterial, ImportedMesh, ImportedScene},
};

/// Malformed face found while building a mesh. Reported, never fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FaceIssue {
    #[error("face {face} has only {len} indices and is dropped.")]
    TooFewIndices { face: usize, len: usize },
    #[error("face {face} has {len} indices, only the first 3 are used.")]
    Polygon { face: usize, len: usize },
    #[error("face {face} references vertex {index} but there are only {vertex_count} vertices.")]
    VertexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("GPU buffers of mesh {0:?} were already built")]
    AlreadyRealized(String),
    #[error("mesh {0:?} has no GPU buffers yet")]
    NotRealized(String),
}

struct MeshBuffers<T> {
    vertex: T,
    index: T,
    index_count: u32,
}

pub struct Mesh<B: GpuBackend = wgpu::Device> {
    name: String,
    vertex_format: VertexFormat,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    material: Material,
    layout: VertexLayout,
    buffers: Option<MeshBuffers<B::Buffer>>,
}

impl<B: GpuBackend> Mesh<B> {
    /// Mesh from already validated triangle data. `POSITION` is always added
    /// to `vertex_format`.
    pub fn new(
        name: impl Into<String>,
        vertex_format: VertexFormat,
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
        material: Material,
    ) -> Self {
        let vertex_format = vertex_format | VertexFormat::POSITION;
        Self {
            name: name.into(),
            vertex_format,
            vertices,
            indices,
            material,
            layout: VertexLayout::new(vertex_format),
            buffers: None,
        }
    }

    /// Copies one imported mesh. `scene` supplies the materials.
    ///
    /// Faces are expected to be triangles already. A larger polygon is
    /// reported and contributes its first three indices; faces with fewer than
    /// three indices or with indices past the vertex list are reported and
    /// dropped. The index count is therefore always a multiple of three.
    pub fn from_imported(mesh: &ImportedMesh, scene: &ImportedScene) -> Self {
        let mut vertex_format = VertexFormat::POSITION;
        vertex_format.set(VertexFormat::UV, has_channel(&mesh.uvs));
        vertex_format.set(VertexFormat::NORMAL, has_channel(&mesh.normals));
        vertex_format.set(VertexFormat::COLOR, has_channel(&mesh.colors));
        vertex_format.set(VertexFormat::WEIGHTS, has_channel(&mesh.weights));

        let vertices = mesh
            .positions
            .iter()
            .enumerate()
            .map(|(i, &position)| Vertex {
                position,
                uv: channel(&mesh.uvs, i),
                normal: channel(&mesh.normals, i),
                color: channel(&mesh.colors, i),
                weights: channel(&mesh.weights, i),
            })
            .collect::<Vec<_>>();

        let (indices, issues) = triangle_indices(&mesh.faces, vertices.len());
        for issue in &issues {
            warn!("Mesh {:?}: {}", mesh.name, issue);
        }

        let material = match mesh.material {
            Some(idx) => match scene.materials.get(idx) {
                Some(imported) => resolve_material(imported),
                None => {
                    warn!(
                        "Mesh {:?} references material {} but the model has {} materials.",
                        mesh.name,
                        idx,
                        scene.materials.len()
                    );
                    Material::default()
                }
            },
            None => Material::default(),
        };

        Self::new(mesh.name.clone(), vertex_format, vertices, indices, material)
    }

    /// Uploads vertices and indices. Runs once per mesh.
    pub fn make_buffers(&mut self, backend: &B) -> Result<(), MeshError> {
        if self.buffers.is_some() {
            return Err(MeshError::AlreadyRealized(self.name.clone()));
        }
        let packed = pack_vertices(&self.vertices, self.vertex_format);
        let vertex = backend.create_buffer(
            &format!("{:?} Vertex Buffer", self.name),
            bytemuck::cast_slice(&packed),
            BufferUsage::Vertex,
        );
        let index = backend.create_buffer(
            &format!("{:?} Index Buffer", self.name),
            bytemuck::cast_slice(&self.indices),
            BufferUsage::Index,
        );
        self.buffers = Some(MeshBuffers {
            vertex,
            index,
            index_count: self.indices.len() as u32,
        });
        Ok(())
    }

    /// Draw call for this mesh with an identity transform.
    pub fn assemble_draw_call(&self) -> Result<DrawCall<'_, B>, MeshError> {
        let buffers = self
            .buffers
            .as_ref()
            .ok_or_else(|| MeshError::NotRealized(self.name.clone()))?;
        Ok(DrawCall {
            vertex_buffer: &buffers.vertex,
            index_buffer: &buffers.index,
            index_count: buffers.index_count,
            topology: wgpu::PrimitiveTopology::TriangleList,
            material: &self.material,
            layout: &self.layout,
            transform: cgmath::Matrix4::identity(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertex_format(&self) -> VertexFormat {
        self.vertex_format
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub fn is_realized(&self) -> bool {
        self.buffers.is_some()
    }
}

/// Flattens `faces` into a triangle list over `vertex_count` vertices.
///
/// Polygons contribute their first three indices. Faces with fewer than
/// three indices or with an index past the vertex list are dropped. Every
/// such face yields a [`FaceIssue`].
pub fn triangle_indices(faces: &[Vec<u32>], vertex_count: usize) -> (Vec<u32>, Vec<FaceIssue>) {
    let mut indices = Vec::with_capacity(faces.len() * 3);
    let mut issues = Vec::new();
    for (face, polygon) in faces.iter().enumerate() {
        let len = polygon.len();
        if len < 3 {
            issues.push(FaceIssue::TooFewIndices { face, len });
            continue;
        }
        if len > 3 {
            issues.push(FaceIssue::Polygon { face, len });
        }
        let triangle = &polygon[..3];
        if let Some(&index) = triangle.iter().find(|&&i| i as usize >= vertex_count) {
            issues.push(FaceIssue::VertexOutOfRange {
                face,
                index,
                vertex_count,
            });
            continue;
        }
        indices.extend_from_slice(triangle);
    }
    (indices, issues)
}

fn has_channel<T>(channel: &Option<Vec<T>>) -> bool {
    channel.as_ref().is_some_and(|values| !values.is_empty())
}

fn channel<T: Copy + Default>(channel: &Option<Vec<T>>, i: usize) -> T {
    channel
        .as_ref()
        .and_then(|values| values.get(i))
        .copied()
        .unwrap_or_default()
}

/// Textured when the source names a diffuse texture, flat colored otherwise.
fn resolve_material(imported: &ImportedMaterial) -> Material {
    match &imported.diffuse_texture {
        Some(path) => Material::LitTexture {
            diffuse_texture: path.clone(),
        },
        None => Material::Lit {
            diffuse: imported.diffuse_color,
        },
    }
}
