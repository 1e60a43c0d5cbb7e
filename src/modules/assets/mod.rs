pub mod assets;
pub mod gltf_loader;
