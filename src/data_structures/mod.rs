//! Engine data structures: meshes, materials, scene graphs and entities.
//!
//! - `vertex` holds the vertex attributes and their packed GPU layout
//! - `mesh` builds triangle meshes from imported data and owns their buffers
//! - `material` describes the surface of a mesh
//! - `scene_graph` enables hierarchical scene organization
//! - `instance` is a decomposed position/rotation/scale transform
//! - `entity` is the game object components are attached to

pub mod entity;
pub mod instance;
pub mod material;
pub mod mesh;
pub mod scene_graph;
pub mod vertex;
