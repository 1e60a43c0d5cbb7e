use cfg_if::cfg_if;

use crate::modules::core::{model, texture};

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let location = window.location();
    let mut origin = location.origin().map_err(|e| anyhow::anyhow!("{e:?}"))?;
    if !origin.ends_with("assets") {
        origin = format!("{}/assets", origin);
    }
    let base = reqwest::Url::parse(&format!("{}/", origin,))?;
    Ok(base.join(file_name)?)
}

pub async fn load_string(file_name: &str) -> anyhow::Result<String> {
    cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            let url = format_url(file_name)?;
            let response = reqwest::get(url).await?.error_for_status()?;
            let txt = response.text().await?;
        } else {
            let path = std::path::Path::new(env!("OUT_DIR"))
                .join("assets")
                .join(file_name);
            let txt = std::fs::read_to_string(path)?;
        }
    }

    Ok(txt)
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            let url = format_url(file_name)?;
            let response = reqwest::get(url).await?.error_for_status()?;
            let data = response.bytes().await?.to_vec();
        } else {
            let path = std::path::Path::new(env!("OUT_DIR"))
                .join("assets")
                .join(file_name);
            let data = std::fs::read(path)?;
        }
    }

    Ok(data)
}

pub fn load_material_from_bytes(
    label: &str,
    bytes: &[u8],
    base_color: [f32; 4],
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<model::Material> {
    let diffuse_texture = texture::Texture::from_bytes(device, queue, bytes, label)?;
    Ok(model::Material {
        name: label.to_string(),
        base_color,
        diffuse_texture,
    })
}

/// Resolves a path found inside an asset relative to that asset's directory.
pub fn resolve_relative(asset_file: &str, uri: &str) -> String {
    match asset_file.rfind('/') {
        Some(index) => format!("{}/{}", &asset_file[..index], uri),
        None => uri.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_to_root_asset() {
        assert_eq!(resolve_relative("scene.gltf", "scene.bin"), "scene.bin");
    }

    #[test]
    fn relative_to_nested_asset() {
        assert_eq!(resolve_relative("models/pyramids/scene.gltf", "textures/sand.png"), "models/pyramids/textures/sand.png");
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = pollster::block_on(load_binary("does/not/exist.bin"));
        assert!(result.is_err());
    }
}
