//! Surface description attached to a mesh.
//!
//! Only the parameters are kept here. Turning them into bind groups and
//! shaders is the renderer's business.

#[derive(Clone, Debug, PartialEq)]
pub enum Material {
    /// Lit surface with a flat diffuse color.
    Lit { diffuse: [f32; 3] },
    /// Lit surface sampling a diffuse texture. The path is as the model file
    /// spelled it.
    LitTexture { diffuse_texture: String },
}

impl Material {
    pub fn diffuse_texture(&self) -> Option<&str> {
        match self {
            Material::LitTexture { diffuse_texture } => Some(diffuse_texture),
            Material::Lit { .. } => None,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Material::Lit {
            diffuse: [0.6, 0.6, 0.6],
        }
    }
}
