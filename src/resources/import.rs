//! Library-neutral form of an imported model.
//!
//! The OBJ and glTF importers convert into these plain types right away, so
//! nothing from `tobj` or `gltf` survives past the import call.

/// Row-major 4x4 matrix, `rows[r][c]`, column-vector convention.
pub type RowMajor = [[f32; 4]; 4];

pub const IDENTITY: RowMajor = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

#[derive(Clone, Debug, PartialEq)]
pub struct ImportedMaterial {
    pub name: String,
    pub diffuse_color: [f32; 3],
    pub diffuse_texture: Option<String>,
}

impl Default for ImportedMaterial {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            diffuse_color: [0.6, 0.6, 0.6],
            diffuse_texture: None,
        }
    }
}

/// One mesh as handed over by the import library. Optional channels are
/// `None` when the source has no such attribute.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportedMesh {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub uvs: Option<Vec<[f32; 2]>>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub colors: Option<Vec<[f32; 3]>>,
    pub weights: Option<Vec<[f32; 4]>>,
    /// Polygons as vertex index lists. Expected to be triangles.
    pub faces: Vec<Vec<u32>>,
    /// Index into [`ImportedScene::materials`].
    pub material: Option<usize>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportedNode {
    pub name: String,
    pub transform: RowMajor,
    /// Indices into [`ImportedScene::meshes`].
    pub meshes: Vec<usize>,
    pub children: Vec<ImportedNode>,
}

impl ImportedNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: IDENTITY,
            meshes: Vec::new(),
            children: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportedScene {
    pub root: ImportedNode,
    pub meshes: Vec<ImportedMesh>,
    pub materials: Vec<ImportedMaterial>,
}
