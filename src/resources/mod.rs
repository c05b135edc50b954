/**
 * This module contains all logic for loading levels/textures from the `assets` directory.
 */
pub mod texture;

use std::path::PathBuf;

pub use texture::{TextureManager, TextureProvider, platform_texture_extension};

pub fn asset_path(file_name: &str) -> PathBuf {
    std::path::Path::new("./").join("assets").join(file_name)
}

pub async fn load_string(file_name: &str) -> anyhow::Result<String> {
    let path = asset_path(file_name);
    let txt = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
    Ok(txt)
}

/// Blocking read, used where the caller is synchronous (texture resolution during a level load).
pub fn read_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    let path = asset_path(file_name);
    let data = std::fs::read(&path).map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
    Ok(data)
}
