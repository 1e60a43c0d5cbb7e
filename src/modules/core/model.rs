use cgmath::SquareMatrix;

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],     
    pub tex_coords: [f32; 2],  
    pub normal: [f32; 3],
}

impl MeshVertex {
    pub fn new(
        position: [f32; 3], 
        tex_coords: [f32; 2], 
        normal: [f32; 3], 
    ) -> Self {
        MeshVertex {
            position,
            tex_coords,
            normal,
        }
    }
}

impl Vertex for MeshVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                }
            ],
        }
    }
}

#[derive(Debug)]
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
    pub diffuse_texture: super::texture::Texture,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshUniform {
    pub transform: [[f32; 4]; 4],
    pub base_color: [f32; 4],
    /// x: receives shadows
    pub flags: [f32; 4],
}

impl MeshUniform {
    pub fn new(transform: [[f32; 4]; 4], base_color: [f32; 4], receive_shadow: bool) -> Self {
        Self {
            transform,
            base_color,
            flags: [if receive_shadow { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }
    pub fn identity() -> Self {
        Self::new(cgmath::Matrix4::identity().into(), [1.0; 4], false)
    }
}

/// One glTF primitive uploaded to the GPU.
#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
    pub material: usize,
    pub base_color: [f32; 4],
    pub uniform_buffer: wgpu::Buffer,
    /// Material and transform, main pass
    pub bind_group: wgpu::BindGroup,
    /// Transform only, shadow passes
    pub shadow_bind_group: wgpu::BindGroup,
}

#[derive(Debug)]
pub struct Model {
    pub meshes: Vec<Mesh>,
}

pub trait DrawModel<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh);
    fn draw_model(&mut self, model: &'a Model);
    fn draw_mesh_shadow(&mut self, mesh: &'a Mesh);
    fn draw_model_shadow(&mut self, model: &'a Model);
}

impl<'a, 'b> DrawModel<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.set_bind_group(1, &mesh.bind_group, &[]);
        self.draw_indexed(0..mesh.num_elements, 0, 0..1);
    }

    fn draw_model(&mut self, model: &'b Model) {
        for mesh in &model.meshes {
            self.draw_mesh(mesh);
        }
    }

    fn draw_mesh_shadow(&mut self, mesh: &'b Mesh) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.set_bind_group(1, &mesh.shadow_bind_group, &[]);
        self.draw_indexed(0..mesh.num_elements, 0, 0..1);
    }

    fn draw_model_shadow(&mut self, model: &'b Model) {
        for mesh in &model.meshes {
            self.draw_mesh_shadow(mesh);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_matches_struct() {
        let layout = MeshVertex::desc();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.attributes.len(), 3);
        assert_eq!(layout.attributes[2].offset, 20);
    }

    #[test]
    fn mesh_uniform_flags_receive_shadow() {
        assert_eq!(MeshUniform::identity().flags[0], 0.0);
        let uniform = MeshUniform::new(cgmath::Matrix4::identity().into(), [1.0; 4], true);
        assert_eq!(uniform.flags[0], 1.0);
        assert_eq!(std::mem::size_of::<MeshUniform>(), 96);
    }
}
