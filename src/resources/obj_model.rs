//! Wavefront OBJ import through `tobj`.

use std::{
    io::{BufReader, Cursor},
    path::Path,
};

use anyhow::Context as _;
use log::warn;

use crate::{
    context::Context,
    resources::{
        import::{ImportedMaterial, ImportedMesh, ImportedNode, ImportedScene},
        load_string,
    },
};

/// Imports `file_name` and the MTL libraries it references.
///
/// OBJ has no hierarchy: the root is named after the file and gets one child
/// per OBJ object, each referencing that object's mesh. A missing MTL file
/// only costs the materials.
pub fn import_obj(ctx: &Context, file_name: &str) -> anyhow::Result<ImportedScene> {
    let obj_text = load_string(ctx, file_name)?;
    let mut obj_reader = BufReader::new(Cursor::new(obj_text));
    let options = ctx.import_options();
    let base = Path::new(file_name).parent().unwrap_or(Path::new(""));

    let (models, obj_materials) = tobj::load_obj_buf(
        &mut obj_reader,
        &tobj::LoadOptions {
            single_index: true,
            triangulate: options.triangulate,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        },
        |p| {
            let mtl_file = base.join(p);
            match load_string(ctx, &mtl_file.to_string_lossy()) {
                Ok(mat_text) => tobj::load_mtl_buf(&mut BufReader::new(Cursor::new(mat_text))),
                Err(e) => {
                    warn!("Material library for {file_name} not loaded: {e:#}");
                    Err(tobj::LoadError::OpenFileFailed)
                }
            }
        },
    )
    .with_context(|| format!("couldn't parse OBJ file {file_name}"))?;

    let materials = match obj_materials {
        Ok(materials) => materials.into_iter().map(convert_material).collect(),
        Err(e) => {
            warn!("{file_name} is imported without materials: {e}");
            Vec::new()
        }
    };

    let mut root = ImportedNode::new(file_name);
    let mut meshes = Vec::with_capacity(models.len());
    for model in models {
        let mut node = ImportedNode::new(model.name.clone());
        node.meshes.push(meshes.len());
        root.children.push(node);
        meshes.push(convert_mesh(model, options.flip_uv));
    }

    Ok(ImportedScene {
        root,
        meshes,
        materials,
    })
}

fn convert_material(m: tobj::Material) -> ImportedMaterial {
    ImportedMaterial {
        diffuse_color: m
            .diffuse
            .unwrap_or(ImportedMaterial::default().diffuse_color),
        diffuse_texture: m.diffuse_texture,
        name: m.name,
    }
}

fn convert_mesh(model: tobj::Model, flip_uv: bool) -> ImportedMesh {
    let mesh = model.mesh;
    let triples = |values: &[f32]| -> Option<Vec<[f32; 3]>> {
        (!values.is_empty()).then(|| values.chunks_exact(3).map(|v| [v[0], v[1], v[2]]).collect())
    };
    let uvs = (!mesh.texcoords.is_empty()).then(|| {
        mesh.texcoords
            .chunks_exact(2)
            .map(|t| [t[0], if flip_uv { 1.0 - t[1] } else { t[1] }])
            .collect()
    });

    // Without arities every face is a triangle.
    let faces = if mesh.face_arities.is_empty() {
        mesh.indices.chunks(3).map(<[u32]>::to_vec).collect()
    } else {
        let mut start = 0;
        mesh.face_arities
            .iter()
            .map(|&arity| {
                let end = (start + arity as usize).min(mesh.indices.len());
                let face = mesh.indices[start..end].to_vec();
                start = end;
                face
            })
            .collect()
    };

    ImportedMesh {
        name: model.name,
        positions: triples(&mesh.positions).unwrap_or_default(),
        uvs,
        normals: triples(&mesh.normals),
        colors: triples(&mesh.vertex_color),
        weights: None,
        faces,
        material: mesh.material_id,
    }
}
