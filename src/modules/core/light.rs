use cgmath::{InnerSpace, Vector3};

use crate::modules::{
    environment::{cycle::CycleFrame, fog::FogUniform, sky::{GROUND_LIGHT_POSITION, SKY_LIGHT_POSITION}},
    utils::functions::srgb_to_linear_f32x3,
};

pub const POINT_LIGHTS: usize = 2;
pub const DIRECTIONAL_LIGHTS: usize = 2;

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightRaw {
    pub position: [f32; 4],
    /// Linear rgb, intensity in `w`
    pub color: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalLightRaw {
    /// Direction the light travels, normalized
    pub direction: [f32; 4],
    pub color: [f32; 4],
}

impl DirectionalLightRaw {
    fn from_position(position: [f64; 3]) -> Self {
        // lights aim at the origin
        let direction = -Vector3::new(position[0] as f32, position[1] as f32, position[2] as f32).normalize();
        Self {
            direction: direction.extend(0.0).into(),
            color: [1.0, 1.0, 1.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightsUniform {
    pub ambient: [f32; 4],
    pub points: [PointLightRaw; POINT_LIGHTS],
    pub directionals: [DirectionalLightRaw; DIRECTIONAL_LIGHTS],
    pub fog: FogUniform,
}

impl LightsUniform {
    pub fn new(ambient_intensity: f64, fog_color: [f64; 3]) -> Self {
        Self {
            ambient: [1.0, 1.0, 1.0, ambient_intensity as f32],
            points: Default::default(),
            directionals: [
                DirectionalLightRaw::from_position(SKY_LIGHT_POSITION),
                DirectionalLightRaw::from_position(GROUND_LIGHT_POSITION),
            ],
            fog: FogUniform::new(srgb_to_linear_f32x3(fog_color), 0.0),
        }
    }

    /// Copies one simulated frame into the light slots: sun, moon, then sky, ground.
    pub fn apply(&mut self, frame: &CycleFrame) {
        for (raw, light) in self.points.iter_mut().zip([&frame.sun, &frame.moon]) {
            raw.position = [
                light.position[0] as f32,
                light.position[1] as f32,
                light.position[2] as f32,
                1.0,
            ];
            raw.color = color_with_intensity(light.rgb(), light.intensity);
        }
        for (raw, light) in self.directionals.iter_mut().zip([&frame.sky, &frame.ground]) {
            raw.color = color_with_intensity(light.rgb(), light.intensity);
        }
        self.fog.color_density[3] = frame.fog_density as f32;
    }

    pub fn point_light_positions(&self) -> [[f32; 3]; POINT_LIGHTS] {
        self.points.map(|light| [light.position[0], light.position[1], light.position[2]])
    }
}

fn color_with_intensity(srgb: [f64; 3], intensity: f64) -> [f32; 4] {
    let [r, g, b] = srgb_to_linear_f32x3(srgb);
    [r, g, b, intensity as f32]
}
