//! Scene graph and hierarchical transform propagation.
//!
//! A [`SceneNode`] owns its children and refers to meshes by index into the
//! mesh list of the component that built them, so the meshes outlive the
//! tree without reference counting. Each frame runs two independent
//! pre-order passes: [`SceneNode::update`] recomputes world transforms and
//! [`SceneNode::draw`] emits draw calls using them.

use cgmath::{Matrix, Matrix4, SquareMatrix};
use log::warn;

use crate::{
    data_structures::mesh::Mesh,
    gpu::GpuBackend,
    render::DrawList,
    resources::import::{ImportedNode, RowMajor},
};

/// Converts an imported row-major matrix into a cgmath matrix.
///
/// cgmath stores columns, so the element-wise copy lands transposed and gets
/// transposed back once.
pub fn import_matrix(rows: &RowMajor) -> Matrix4<f32> {
    let copied: Matrix4<f32> = (*rows).into();
    copied.transpose()
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    name: String,
    local_transform: Matrix4<f32>,
    world_transform: Matrix4<f32>,
    meshes: Vec<usize>,
    children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local_transform: Matrix4::identity(),
            world_transform: Matrix4::identity(),
            meshes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builds the native tree for `node` and all its descendants.
    ///
    /// Mesh references at or past `mesh_count` are reported and skipped.
    pub fn from_imported(node: &ImportedNode, mesh_count: usize) -> Self {
        let mut scene_node = SceneNode::new(node.name.clone());
        scene_node.local_transform = import_matrix(&node.transform);
        for &mesh in &node.meshes {
            if mesh < mesh_count {
                scene_node.meshes.push(mesh);
            } else {
                warn!(
                    "Node {:?} references mesh {} but the model has {} meshes.",
                    node.name, mesh, mesh_count
                );
            }
        }
        for child in &node.children {
            scene_node.add_child(SceneNode::from_imported(child, mesh_count));
        }
        scene_node
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn local_transform(&self) -> &Matrix4<f32> {
        &self.local_transform
    }

    pub fn set_local_transform(&mut self, transform: Matrix4<f32>) {
        self.local_transform = transform;
    }

    /// Valid after the last [`SceneNode::update`].
    pub fn world_transform(&self) -> &Matrix4<f32> {
        &self.world_transform
    }

    pub fn meshes(&self) -> &[usize] {
        &self.meshes
    }

    pub fn attach_mesh(&mut self, mesh: usize) {
        self.meshes.push(mesh);
    }

    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<SceneNode> {
        &mut self.children
    }

    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    /// True for a node without meshes and children.
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty() && self.children.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }

    /// First node named `name` in pre-order.
    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// Update pass: `world = parent_world * local`, then the children with
    /// this node's world transform as their parent.
    pub fn update(&mut self, parent_world: &Matrix4<f32>) {
        self.world_transform = *parent_world * self.local_transform;
        let world = self.world_transform;
        for child in self.children.iter_mut() {
            child.update(&world);
        }
    }

    /// Draw pass: one draw call per referenced mesh carrying this node's
    /// world transform, then the children.
    pub fn draw<'a, B: GpuBackend>(&self, meshes: &'a [Mesh<B>], draw_list: &mut DrawList<'a, B>) {
        for &idx in &self.meshes {
            match meshes.get(idx).map(|mesh| mesh.assemble_draw_call()) {
                Some(Ok(call)) => draw_list.push(call.with_transform(self.world_transform)),
                Some(Err(e)) => warn!("Node {:?} skips a mesh: {}", self.name, e),
                None => warn!(
                    "Node {:?} references mesh {} which does not exist.",
                    self.name, idx
                ),
            }
        }
        for child in &self.children {
            child.draw(meshes, draw_list);
        }
    }
}
