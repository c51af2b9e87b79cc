//! Imported model attached to an entity.

use log::{error, info};

use crate::{
    components::Component,
    context::Context,
    data_structures::{entity::EntityRef, mesh::Mesh, scene_graph::SceneNode},
    frame::FrameParams,
    gpu::GpuBackend,
    render::DrawList,
    resources::{self, import::ImportedScene},
};

/// Owns the meshes of one model and the scene graph referencing them.
///
/// A model that fails to import leaves the component empty: it updates and
/// draws nothing, and the failure is logged once at construction.
pub struct ModelComponent<B: GpuBackend = wgpu::Device> {
    entity: EntityRef,
    meshes: Vec<Mesh<B>>,
    root: SceneNode,
}

impl<B: GpuBackend> ModelComponent<B> {
    pub fn new(entity: EntityRef, ctx: &Context, backend: &B, model_file: &str) -> Self {
        match resources::import_model(ctx, model_file) {
            Ok(scene) => Self::from_imported(entity, backend, &scene),
            Err(e) => {
                error!("Couldn't load model {model_file}: {e:#}");
                Self::empty(entity)
            }
        }
    }

    /// Builds and uploads every mesh, then mirrors the node tree.
    pub fn from_imported(entity: EntityRef, backend: &B, scene: &ImportedScene) -> Self {
        info!("number of meshes: {}", scene.meshes.len());
        let meshes = scene
            .meshes
            .iter()
            .map(|imported| {
                let mut mesh = Mesh::from_imported(imported, scene);
                if let Err(e) = mesh.make_buffers(backend) {
                    error!("{e}");
                }
                mesh
            })
            .collect::<Vec<_>>();
        let root = SceneNode::from_imported(&scene.root, meshes.len());
        Self {
            entity,
            meshes,
            root,
        }
    }

    pub fn empty(entity: EntityRef) -> Self {
        Self {
            entity,
            meshes: Vec::new(),
            root: SceneNode::new(""),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty() && self.root.is_empty()
    }

    pub fn meshes(&self) -> &[Mesh<B>] {
        &self.meshes
    }

    pub fn root(&self) -> &SceneNode {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut SceneNode {
        &mut self.root
    }

    /// Draw pass over the whole tree. Call after [`Component::update`].
    pub fn draw<'a>(&'a self, draw_list: &mut DrawList<'a, B>) {
        self.root.draw(&self.meshes, draw_list);
    }
}

impl<B: GpuBackend> Component for ModelComponent<B> {
    fn entity(&self) -> &EntityRef {
        &self.entity
    }

    /// Update pass starting from the entity's world transform.
    fn update(&mut self, _params: &FrameParams) {
        let entity_world = self.entity.borrow().world_transform();
        self.root.update(&entity_world);
    }
}
