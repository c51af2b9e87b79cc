//! Loading of external files: raw text and bytes below the asset root, and
//! model import into the library-neutral [`import::ImportedScene`].

use std::path::Path;

use anyhow::{Context as _, bail};

use crate::context::Context;

pub mod gltf_model;
pub mod import;
pub mod obj_model;

pub fn load_string(ctx: &Context, file_name: &str) -> anyhow::Result<String> {
    let path = ctx.resolve(file_name);
    std::fs::read_to_string(&path).with_context(|| format!("couldn't read {}", path.display()))
}

pub fn load_binary(ctx: &Context, file_name: &str) -> anyhow::Result<Vec<u8>> {
    let path = ctx.resolve(file_name);
    std::fs::read(&path).with_context(|| format!("couldn't read {}", path.display()))
}

/// Imports a model, choosing the importer by file extension.
pub fn import_model(ctx: &Context, file_name: &str) -> anyhow::Result<import::ImportedScene> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let scene = match extension.as_deref() {
        Some("obj") => obj_model::import_obj(ctx, file_name)?,
        Some("gltf") | Some("glb") => gltf_model::import_gltf(ctx, file_name)?,
        _ => bail!("unsupported model format: {file_name}"),
    };
    log::info!(
        "imported {}: {} meshes, {} materials",
        file_name,
        scene.meshes.len(),
        scene.materials.len()
    );
    Ok(scene)
}
