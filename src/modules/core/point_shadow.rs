use cgmath::{perspective, Deg, Matrix4, Point3, Vector3};

use crate::modules::camera::camera::OPENGL_TO_WGPU_MATRIX;
use super::light::POINT_LIGHTS;

pub const CUBE_FACES: usize = 6;
pub const SHADOW_LAYERS: usize = POINT_LIGHTS * CUBE_FACES;

const NEAR: f32 = 0.5;
const FAR: f32 = 500.0;
const DEPTH_BIAS: f32 = 0.0005;

/// Face order is +X, -X, +Y, -Y, +Z, -Z, the shader picks faces in the same order.
const FACES: [([f32; 3], [f32; 3]); CUBE_FACES] = [
    ([1.0, 0.0, 0.0], [0.0, -1.0, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, -1.0, 0.0]),
    ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, -1.0, 0.0], [0.0, 0.0, -1.0]),
    ([0.0, 0.0, 1.0], [0.0, -1.0, 0.0]),
    ([0.0, 0.0, -1.0], [0.0, -1.0, 0.0]),
];

/// View-projection of each of the 6 faces around a point light.
pub fn face_view_projs(position: [f32; 3]) -> [Matrix4<f32>; CUBE_FACES] {
    let eye = Point3::from(position);
    let projection = OPENGL_TO_WGPU_MATRIX * perspective(Deg(90.0), 1.0, NEAR, FAR);
    FACES.map(|(direction, up)| {
        projection * Matrix4::look_to_rh(eye, Vector3::from(direction), Vector3::from(up))
    })
}

/// Same selection rule as the shader, on the light-to-fragment direction.
pub fn face_index(direction: [f32; 3]) -> usize {
    let [x, y, z] = direction;
    let (ax, ay, az) = (x.abs(), y.abs(), z.abs());
    if ax >= ay && ax >= az {
        if x > 0.0 { 0 } else { 1 }
    } else if ay >= az {
        if y > 0.0 { 2 } else { 3 }
    } else if z > 0.0 { 4 } else { 5 }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShadowFaceUniform {
    pub view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointShadowsUniform {
    pub view_projs: [[[f32; 4]; 4]; SHADOW_LAYERS],
    /// x: depth bias, y: enabled
    pub params: [f32; 4],
}

impl PointShadowsUniform {
    pub fn new() -> Self {
        Self {
            view_projs: [[[0.0; 4]; 4]; SHADOW_LAYERS],
            params: [DEPTH_BIAS, 1.0, 0.0, 0.0],
        }
    }

    /// Recomputes all layers, `light * 6 + face`.
    pub fn update(&mut self, positions: &[[f32; 3]; POINT_LIGHTS]) {
        for (light, position) in positions.iter().enumerate() {
            for (face, view_proj) in face_view_projs(*position).into_iter().enumerate() {
                self.view_projs[light * CUBE_FACES + face] = view_proj.into();
            }
        }
    }

    pub fn face(&self, layer: usize) -> ShadowFaceUniform {
        ShadowFaceUniform { view_proj: self.view_projs[layer] }
    }
}
