use log::{debug, info, warn};
use wgpu::util::DeviceExt;

use crate::modules::{
    assets::assets::{load_binary, load_material_from_bytes, resolve_relative},
    core::{model::{Material, Mesh, MeshUniform, MeshVertex, Model}, object::Object, texture::Texture},
    pipelines::{render_pipeline::RenderPipeline, shadow_pipeline::ShadowPipeline},
};

const DEFAULT_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];

#[derive(Debug, thiserror::Error)]
pub enum GltfLoadError {
    #[error("embedded data uris are not supported ({0})")]
    DataUri(String),
    #[error("buffer {0} has no binary chunk")]
    MissingBlob(usize),
    #[error("a primitive of mesh {0:?} has no positions")]
    MissingPositions(String),
    #[error("buffer view {0} points past the end of its buffer")]
    TruncatedBuffer(usize),
}

/// Objects and materials of a glTF file, ready to be added to a `Scene`.
pub struct GltfScene {
    pub objects: Vec<Object>,
    pub materials: Vec<Material>,
}

struct LoadContext<'a> {
    file_name: &'a str,
    device: &'a wgpu::Device,
    buffer_data: &'a [Vec<u8>],
    materials: &'a [Material],
    mesh_layout: &'a wgpu::BindGroupLayout,
    shadow_mesh_layout: &'a wgpu::BindGroupLayout,
}

pub async fn load_model_gltf(
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    render_pipeline: &RenderPipeline,
    shadow_pipeline: &ShadowPipeline,
) -> anyhow::Result<GltfScene> {
    let gltf_bin = load_binary(file_name).await?;
    let gltf = gltf::Gltf::from_slice(&gltf_bin)?;

    let buffer_data = extract_buffer_data(file_name, &gltf).await?;
    let materials = extract_materials(file_name, device, queue, &gltf, &buffer_data).await?;

    let context = LoadContext {
        file_name,
        device,
        buffer_data: &buffer_data,
        materials: &materials,
        mesh_layout: &render_pipeline.bind_group_layouts.mesh,
        shadow_mesh_layout: &shadow_pipeline.mesh_bind_group_layout,
    };
    let mut objects = Vec::new();
    for scene in gltf.scenes() {
        for node in scene.nodes() {
            extract_node(&context, &node, None, &mut objects)?;
        }
    }

    info!("{file_name} loaded with {} objects and {} materials", objects.len(), materials.len());
    Ok(GltfScene { objects, materials })
}

async fn extract_buffer_data(
    file_name: &str,
    model: &gltf::Gltf
) -> anyhow::Result<Vec<Vec<u8>>> {
    let mut buffer_data = Vec::new();
    for buffer in model.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let blob = model.blob.as_deref().ok_or(GltfLoadError::MissingBlob(buffer.index()))?;
                buffer_data.push(blob.to_vec());
            }
            gltf::buffer::Source::Uri(uri) => {
                buffer_data.push(load_uri(file_name, uri).await?);
            }
        }
    }
    Ok(buffer_data)
}

async fn load_uri(file_name: &str, uri: &str) -> anyhow::Result<Vec<u8>> {
    if uri.starts_with("data:") {
        return Err(GltfLoadError::DataUri(uri.chars().take(32).collect()).into());
    }
    load_binary(&resolve_relative(file_name, uri)).await
}

/// One material per glTF material, plus a trailing white default.
async fn extract_materials(
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    model: &gltf::Gltf,
    buffer_data: &[Vec<u8>],
) -> anyhow::Result<Vec<Material>> {
    let mut extracted_materials = Vec::new();

    for material in model.materials() {
        let name = material.name().unwrap_or("Default Material").to_string();
        let pbr = material.pbr_metallic_roughness();
        let base_color = pbr.base_color_factor();
        let Some(info) = pbr.base_color_texture() else {
            extracted_materials.push(white_material(&name, base_color, device, queue));
            continue;
        };
        let image_data = match info.texture().source().source() {
            gltf::image::Source::View { view, .. } => view_bytes(&view, buffer_data)?.to_vec(),
            gltf::image::Source::Uri { uri, .. } => load_uri(file_name, uri).await?,
        };
        extracted_materials.push(load_material_from_bytes(&name, &image_data, base_color, device, queue)?);
    }

    extracted_materials.push(white_material("Default Material", [1.0; 4], device, queue));
    debug!("{file_name} materials: {:?}", extracted_materials.iter().map(|m| &m.name).collect::<Vec<_>>());
    Ok(extracted_materials)
}

/// Bytes of a buffer view, checked against the data actually loaded.
fn view_bytes<'a>(view: &gltf::buffer::View<'_>, buffer_data: &'a [Vec<u8>]) -> Result<&'a [u8], GltfLoadError> {
    let start = view.offset();
    let end = start + view.length();
    buffer_data
        .get(view.buffer().index())
        .and_then(|buffer| buffer.get(start..end))
        .ok_or(GltfLoadError::TruncatedBuffer(view.index()))
}

fn white_material(name: &str, base_color: [f32; 4], device: &wgpu::Device, queue: &wgpu::Queue) -> Material {
    Material {
        name: name.to_string(),
        base_color,
        diffuse_texture: Texture::from_color(device, queue, [255, 255, 255, 255], name),
    }
}

fn extract_node(
    context: &LoadContext<'_>,
    node: &gltf::Node<'_>,
    parent_index: Option<usize>,
    objects: &mut Vec<Object>,
) -> anyhow::Result<()> {
    let mut object = Object::new();
    object.name = node.name().map(str::to_string);
    object.matrix = node.transform().matrix();
    if let Some(mesh) = node.mesh() {
        let name = mesh.name().or(node.name()).unwrap_or(context.file_name).to_string();
        let mut meshes = Vec::new();
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                warn!("{name}: skipping primitive with mode {:?}", primitive.mode());
                continue;
            }
            let (vertices, indices) = read_primitive(&name, &primitive, context.buffer_data)?;
            let material = primitive
                .material()
                .index()
                .unwrap_or(context.materials.len() - 1);
            meshes.push(create_mesh(context, &name, &vertices, &indices, material));
        }
        if !meshes.is_empty() {
            object.set_model(Model { meshes });
        }
    }
    debug!("{}: node {:?}", context.file_name, object.name);

    if let Some(parent_index) = parent_index {
        object.parent = Some(objects[parent_index].id.clone());
        objects[parent_index].childrens.push(object.id.clone());
    }
    let index = objects.len();
    objects.push(object);
    for child in node.children() {
        extract_node(context, &child, Some(index), objects)?;
    }
    Ok(())
}

fn read_primitive(
    name: &str,
    primitive: &gltf::Primitive<'_>,
    buffer_data: &[Vec<u8>],
) -> anyhow::Result<(Vec<MeshVertex>, Vec<u32>)> {
    let reader = primitive.reader(|buffer| buffer_data.get(buffer.index()).map(Vec::as_slice));
    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .ok_or_else(|| GltfLoadError::MissingPositions(name.to_string()))?
        .collect();
    let tex_coords: Vec<[f32; 2]> = reader
        .read_tex_coords(0)
        .map(|tex_coords| tex_coords.into_f32().collect())
        .unwrap_or_default();
    let normals: Vec<[f32; 3]> = reader
        .read_normals()
        .map(|normals| normals.collect())
        .unwrap_or_default();
    let vertices = build_vertices(&positions, &tex_coords, &normals);
    let indices = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..vertices.len() as u32).collect(),
    };
    Ok((vertices, indices))
}

/// Missing attributes fall back to zero uvs and an up normal.
pub fn build_vertices(positions: &[[f32; 3]], tex_coords: &[[f32; 2]], normals: &[[f32; 3]]) -> Vec<MeshVertex> {
    positions
        .iter()
        .enumerate()
        .map(|(i, position)| {
            MeshVertex::new(
                *position,
                tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
                normals.get(i).copied().unwrap_or(DEFAULT_NORMAL),
            )
        })
        .collect()
}

fn create_mesh(
    context: &LoadContext<'_>,
    name: &str,
    vertices: &[MeshVertex],
    indices: &[u32],
    material: usize,
) -> Mesh {
    let device = context.device;
    let material_ref = &context.materials[material.min(context.materials.len() - 1)];
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{name} Vertex Buffer")),
        contents: bytemuck::cast_slice(vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{name} Index Buffer")),
        contents: bytemuck::cast_slice(indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{name} Mesh Buffer")),
        contents: bytemuck::cast_slice(&[MeshUniform::identity()]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: context.mesh_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&material_ref.diffuse_texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&material_ref.diffuse_texture.sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: uniform_buffer.as_entire_binding(),
            },
        ],
        label: Some("mesh_bind_group"),
    });
    let shadow_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: context.shadow_mesh_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            },
        ],
        label: Some("shadow_mesh_bind_group"),
    });
    Mesh {
        name: name.to_string(),
        vertex_buffer,
        index_buffer,
        num_elements: indices.len() as u32,
        material,
        base_color: material_ref.base_color,
        uniform_buffer,
        bind_group,
        shadow_bind_group,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertices_fill_missing_attributes() {
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let tex_coords = [[0.5, 0.5]];
        let vertices = build_vertices(&positions, &tex_coords, &[]);
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[0].tex_coords, [0.5, 0.5]);
        assert_eq!(vertices[2].tex_coords, [0.0, 0.0]);
        assert_eq!(vertices[1].normal, DEFAULT_NORMAL);
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn data_uris_are_rejected() {
        let result = pollster::block_on(load_uri("scene.gltf", "data:application/octet-stream;base64,AAAA"));
        let error = result.unwrap_err();
        assert!(matches!(error.downcast_ref::<GltfLoadError>(), Some(GltfLoadError::DataUri(_))));
    }

    fn glb(json: &str, bin: &[u8]) -> Vec<u8> {
        let mut json = json.as_bytes().to_vec();
        while json.len() % 4 != 0 {
            json.push(b' ');
        }
        let total = 12 + 8 + json.len() + 8 + bin.len();
        let mut glb = Vec::with_capacity(total);
        glb.extend_from_slice(b"glTF");
        glb.extend_from_slice(&2u32.to_le_bytes());
        glb.extend_from_slice(&(total as u32).to_le_bytes());
        glb.extend_from_slice(&(json.len() as u32).to_le_bytes());
        glb.extend_from_slice(b"JSON");
        glb.extend_from_slice(&json);
        glb.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        glb.extend_from_slice(b"BIN\0");
        glb.extend_from_slice(bin);
        glb
    }

    #[test]
    fn short_binary_chunk_is_an_error() {
        let json = r#"{
            "asset": { "version": "2.0" },
            "buffers": [ { "byteLength": 64 } ],
            "bufferViews": [ { "buffer": 0, "byteLength": 64 } ],
            "images": [ { "bufferView": 0, "mimeType": "image/png" } ]
        }"#;
        let gltf = gltf::Gltf::from_slice(&glb(json, &[0u8; 8])).unwrap();
        let buffers = pollster::block_on(extract_buffer_data("scene.glb", &gltf)).unwrap();
        assert_eq!(buffers[0].len(), 8);

        let image = gltf.images().next().unwrap();
        let gltf::image::Source::View { view, .. } = image.source() else {
            panic!("image should come from a buffer view");
        };
        assert!(matches!(view_bytes(&view, &buffers), Err(GltfLoadError::TruncatedBuffer(0))));
    }

    #[test]
    fn view_bytes_slices_the_buffer() {
        let json = r#"{
            "asset": { "version": "2.0" },
            "buffers": [ { "byteLength": 8 } ],
            "bufferViews": [ { "buffer": 0, "byteOffset": 2, "byteLength": 4 } ]
        }"#;
        let gltf = gltf::Gltf::from_slice(&glb(json, &[0, 1, 2, 3, 4, 5, 6, 7])).unwrap();
        let buffers = pollster::block_on(extract_buffer_data("scene.glb", &gltf)).unwrap();
        let view = gltf.views().next().unwrap();
        assert_eq!(view_bytes(&view, &buffers).unwrap(), &[2, 3, 4, 5]);
    }

    #[test]
    fn model_without_buffers_parses() {
        let json = br#"{
            "asset": { "version": "2.0" },
            "scenes": [ { "nodes": [0] } ],
            "nodes": [ { "name": "Pyramid_01_-_Default_0", "children": [1] }, { "name": "Tip" } ]
        }"#;
        let gltf = gltf::Gltf::from_slice(json).unwrap();
        let names = gltf.nodes().map(|node| node.name().unwrap_or_default().to_string()).collect::<Vec<_>>();
        assert_eq!(names, vec!["Pyramid_01_-_Default_0", "Tip"]);
        let buffers = pollster::block_on(extract_buffer_data("scene.gltf", &gltf)).unwrap();
        assert!(buffers.is_empty());
    }
}
