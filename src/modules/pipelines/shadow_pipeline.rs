use wgpu::util::DeviceExt;

use crate::modules::core::{
    model::{MeshVertex, Vertex},
    point_shadow::{PointShadowsUniform, SHADOW_LAYERS},
    texture::Texture,
};

/// One uniform buffer and bind group per shadow layer.
pub struct ShadowFace {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

pub struct ShadowPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub face_bind_group_layout: wgpu::BindGroupLayout,
    pub mesh_bind_group_layout: wgpu::BindGroupLayout,
    pub faces: Vec<ShadowFace>,
}

impl ShadowPipeline {
    pub fn new(device: &wgpu::Device) -> Self {
        let face_bind_group_layout = Self::create_bind_group_layout(device, "shadow_face_bind_group_layout");
        let mesh_bind_group_layout = Self::create_bind_group_layout(device, "shadow_mesh_bind_group_layout");
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Shadow Pipeline Layout"),
            bind_group_layouts: &[
                &face_bind_group_layout,
                &mesh_bind_group_layout,
            ],
            push_constant_ranges: &[],
        });
        let pipeline = Self::create_pipeline(device, &pipeline_layout);
        let faces = (0..SHADOW_LAYERS)
            .map(|_| Self::create_face(device, &face_bind_group_layout))
            .collect();
        Self {
            pipeline,
            face_bind_group_layout,
            mesh_bind_group_layout,
            faces,
        }
    }

    pub fn write_faces(&self, queue: &wgpu::Queue, shadows: &PointShadowsUniform) {
        for (layer, face) in self.faces.iter().enumerate() {
            queue.write_buffer(&face.buffer, 0, bytemuck::cast_slice(&[shadows.face(layer)]));
        }
    }

    fn create_face(device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> ShadowFace {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Shadow Face Buffer"),
            contents: bytemuck::cast_slice(&[PointShadowsUniform::new().face(0)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
            ],
            label: Some("shadow_face_bind_group"),
        });
        ShadowFace { buffer, bind_group }
    }

    fn create_pipeline(
        device: &wgpu::Device, 
        layout: &wgpu::PipelineLayout,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(
            wgpu::ShaderModuleDescriptor {
                label: Some("Shadow Shader"),
                source: wgpu::ShaderSource::Wgsl(
                    include_str!("../../shaders/shadow.wgsl").into()
                ),
            }
        );
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Shadow Pipeline"),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[
                    MeshVertex::desc(), 
                ],
            },
            fragment: None,
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: Texture::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState {
                    constant: 2, // corresponds to bilinear filtering
                    slope_scale: 2.0,
                    clamp: 0.0,
                },
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        })
    }

    fn create_bind_group_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
            label: Some(label),
        })
    }
}
