//! glTF 2.0 import (`.gltf` with external or embedded buffers, `.glb`).

use anyhow::{Context as _, anyhow};
use log::{debug, warn};

use crate::{
    context::Context,
    resources::{
        import::{IDENTITY, ImportedMaterial, ImportedMesh, ImportedNode, ImportedScene, RowMajor},
        load_binary,
    },
};

/// Imports the default scene of `file_name` (or its first scene).
///
/// Every triangle primitive becomes one imported mesh. A scene with several
/// root nodes is wrapped in a root named after the file.
pub fn import_gltf(ctx: &Context, file_name: &str) -> anyhow::Result<ImportedScene> {
    let gltf_bytes = load_binary(ctx, file_name)?;
    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(&gltf_bytes)
        .with_context(|| format!("couldn't parse glTF file {file_name}"))?;
    let path = ctx.resolve(file_name);
    let buffer_data = gltf::import_buffers(&document, path.parent(), blob)
        .with_context(|| format!("couldn't load the buffers of {file_name}"))?;

    let materials = document.materials().map(convert_material).collect();

    let mut meshes = Vec::new();
    // imported mesh indices of every glTF mesh, indexed like `document.meshes()`
    let mut primitives_of = Vec::new();
    for mesh in document.meshes() {
        let mesh_name = mesh
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("mesh{}", mesh.index()));
        let primitive_count = mesh.primitives().count();
        let mut imported = Vec::new();
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                warn!(
                    "{file_name}: primitive {} of mesh {mesh_name:?} is {:?}, only triangles are imported.",
                    primitive.index(),
                    primitive.mode()
                );
                continue;
            }
            let reader = primitive.reader(|buffer| {
                buffer_data.get(buffer.index()).map(|data| data.0.as_slice())
            });
            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .map(|positions| positions.collect())
                .unwrap_or_default();
            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };
            let name = if primitive_count > 1 {
                format!("{mesh_name}.{}", primitive.index())
            } else {
                mesh_name.clone()
            };
            imported.push(meshes.len());
            meshes.push(ImportedMesh {
                name,
                normals: reader.read_normals().map(|normals| normals.collect()),
                uvs: reader.read_tex_coords(0).map(|uvs| uvs.into_f32().collect()),
                colors: reader.read_colors(0).map(|colors| colors.into_rgb_f32().collect()),
                weights: reader.read_weights(0).map(|weights| weights.into_f32().collect()),
                faces: indices.chunks(3).map(<[u32]>::to_vec).collect(),
                material: primitive.material().index(),
                positions,
            });
        }
        primitives_of.push(imported);
    }

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or_else(|| anyhow!("{file_name} contains no scene"))?;
    let mut roots: Vec<ImportedNode> = scene
        .nodes()
        .map(|node| convert_node(node, &primitives_of))
        .collect();
    let root = if roots.len() == 1 {
        roots.remove(0)
    } else {
        let mut root = ImportedNode::new(file_name);
        root.children = roots;
        root
    };

    Ok(ImportedScene {
        root,
        meshes,
        materials,
    })
}

fn convert_material(material: gltf::Material) -> ImportedMaterial {
    let pbr = material.pbr_metallic_roughness();
    let [r, g, b, _] = pbr.base_color_factor();
    let diffuse_texture = pbr
        .base_color_texture()
        .and_then(|info| match info.texture().source().source() {
            gltf::image::Source::Uri { uri, .. } if !uri.starts_with("data:") => {
                Some(uri.to_string())
            }
            _ => {
                debug!(
                    "embedded base color texture of material {:?} is not referenced by path",
                    material.name()
                );
                None
            }
        });
    ImportedMaterial {
        name: material.name().unwrap_or("material").to_string(),
        diffuse_color: [r, g, b],
        diffuse_texture,
    }
}

fn convert_node(node: gltf::Node, primitives_of: &[Vec<usize>]) -> ImportedNode {
    // glTF matrices are column-major
    let columns = node.transform().matrix();
    let mut transform: RowMajor = IDENTITY;
    for (r, row) in transform.iter_mut().enumerate() {
        for (c, value) in row.iter_mut().enumerate() {
            *value = columns[c][r];
        }
    }
    ImportedNode {
        name: node
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("node{}", node.index())),
        transform,
        meshes: node
            .mesh()
            .and_then(|mesh| primitives_of.get(mesh.index()).cloned())
            .unwrap_or_default(),
        children: node
            .children()
            .map(|child| convert_node(child, primitives_of))
            .collect(),
    }
}
