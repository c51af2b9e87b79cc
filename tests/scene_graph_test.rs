use cgmath::{Deg, Matrix4, SquareMatrix, Vector3, Vector4};
use scene_ngin::{
    data_structures::{
        material::Material,
        mesh::Mesh,
        scene_graph::SceneNode,
        vertex::{Vertex, VertexFormat},
    },
    gpu::HostBackend,
    render::DrawList,
};

mod common;

fn node(name: &str, local: Matrix4<f32>, meshes: &[usize]) -> SceneNode {
    let mut node = SceneNode::new(name);
    node.set_local_transform(local);
    for &mesh in meshes {
        node.attach_mesh(mesh);
    }
    node
}

/// root -> (hip -> (knee -> foot), spine)
fn skeleton() -> SceneNode {
    let mut knee = node("knee", Matrix4::from_angle_x(Deg(30.0)), &[]);
    knee.add_child(node("foot", Matrix4::from_translation(Vector3::new(0.0, -1.0, 0.5)), &[1]));
    let mut hip = node("hip", Matrix4::from_translation(Vector3::new(0.5, -1.0, 0.0)), &[0]);
    hip.add_child(knee);
    let mut root = node("root", Matrix4::from_scale(2.0), &[]);
    root.add_child(hip);
    root.add_child(node("spine", Matrix4::from_angle_y(Deg(90.0)), &[0, 1]));
    root
}

fn assert_world_transforms(node: &SceneNode, parent_world: &Matrix4<f32>) {
    assert_eq!(
        *node.world_transform(),
        *parent_world * *node.local_transform(),
        "node {}",
        node.name()
    );
    for child in node.children() {
        assert_world_transforms(child, node.world_transform());
    }
}

fn triangle(name: &str) -> Mesh<HostBackend> {
    let vertex = |x: f32, y: f32| Vertex {
        position: [x, y, 0.0],
        ..Default::default()
    };
    Mesh::new(
        name,
        VertexFormat::POSITION,
        vec![vertex(0.0, 0.0), vertex(1.0, 0.0), vertex(0.0, 1.0)],
        vec![0, 1, 2],
        Material::default(),
    )
}

#[test]
fn update_composes_parent_world_with_local() {
    common::test_utils::init_logger();
    let mut root = skeleton();
    let entity_world = Matrix4::from_translation(Vector3::new(3.0, 0.0, -4.0));

    root.update(&entity_world);

    assert_world_transforms(&root, &entity_world);
}

#[test]
fn update_follows_changed_local_transforms() {
    let mut root = skeleton();
    root.update(&Matrix4::identity());

    root.children_mut()[0].set_local_transform(Matrix4::from_translation(Vector3::new(0.0, 4.0, 0.0)));
    root.update(&Matrix4::identity());

    assert_world_transforms(&root, &Matrix4::identity());
    let hip = root.find("hip").unwrap();
    assert_eq!(hip.world_transform().w, Vector4::new(0.0, 8.0, 0.0, 1.0));
}

#[test]
fn draw_emits_one_call_per_mesh_reference_in_pre_order() {
    let backend = HostBackend::new();
    let mut meshes = vec![triangle("a"), triangle("b")];
    for mesh in meshes.iter_mut() {
        mesh.make_buffers(&backend).unwrap();
    }
    let mut root = skeleton();
    root.update(&Matrix4::identity());

    let mut draw_list = DrawList::new();
    root.draw(&meshes, &mut draw_list);

    // hip: a, foot: b, spine: a b
    assert_eq!(draw_list.len(), 4);
    assert_eq!(draw_list.index_count(), 12);
    let transforms: Vec<Matrix4<f32>> = draw_list.iter().map(|call| call.transform).collect();
    assert_eq!(
        transforms,
        vec![
            *root.find("hip").unwrap().world_transform(),
            *root.find("foot").unwrap().world_transform(),
            *root.find("spine").unwrap().world_transform(),
            *root.find("spine").unwrap().world_transform(),
        ]
    );
}

#[test]
fn draw_skips_meshes_without_buffers() {
    let backend = HostBackend::new();
    let mut meshes = vec![triangle("a"), triangle("b")];
    meshes[1].make_buffers(&backend).unwrap();
    let mut root = skeleton();
    root.update(&Matrix4::identity());

    let mut draw_list = DrawList::new();
    root.draw(&meshes, &mut draw_list);

    assert_eq!(draw_list.len(), 2);
}

#[test]
fn node_count_and_lookup_cover_the_whole_tree() {
    let root = skeleton();
    assert_eq!(root.node_count(), 5);
    assert_eq!(root.find("foot").unwrap().meshes(), &[1]);
    assert!(root.find("tail").is_none());
}
