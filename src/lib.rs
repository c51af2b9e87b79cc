//! scene-ngin
//!
//! Scene and model layer of a small wgpu engine. Imported models become GPU
//! meshes plus a scene graph whose world transforms are recomputed every
//! frame, and entities can be driven by Lua scripts.
//!
//! High-level modules
//! - `components`: per-entity behavior (`ModelComponent`, `LuaComponent`)
//! - `context`: asset root and engine-wide options passed to constructors
//! - `data_structures`: entities, instances, vertices, meshes and scene nodes
//! - `frame`: the per-frame input and timing record
//! - `gpu`: buffer allocation seam between meshes and the graphics device
//! - `render`: draw calls and the draw list a frame is recorded into
//! - `resources`: file loading and the OBJ / glTF importers
//!

pub mod components;
pub mod context;
pub mod data_structures;
pub mod frame;
pub mod gpu;
pub mod render;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use mlua;
pub use wgpu;
