use crate::modules::utils::functions::hsl_to_rgb;
use super::{Hsl, Position};

const BASE_INTENSITY: f64 = 5.0;
const DAY_BOOST_LIMIT: f64 = 15.0;
const NIGHT_DIM_FACTOR: f64 = 3.0;

/// Positions of the hemisphere lights, both aimed at the origin.
pub const SKY_LIGHT_POSITION: Position = [0.0, -0.01, 0.0];
pub const GROUND_LIGHT_POSITION: Position = [0.0, 0.01, 0.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HemisphereLight {
    pub color: Hsl,
    pub intensity: f64,
}

impl HemisphereLight {
    pub fn sky(angle: f64) -> Self {
        let sin = angle.sin();
        Self {
            color: [0.65, 1.0, f64::max(0.0, sin * 0.5 + 0.6)],
            intensity: sky_intensity(sin),
        }
    }

    pub fn ground(angle: f64) -> Self {
        let sin = angle.sin();
        Self {
            color: [0.55, 0.3, f64::max(0.0, sin * 0.2 + 0.7)],
            intensity: ground_intensity(sin),
        }
    }

    pub fn rgb(&self) -> [f64; 3] {
        hsl_to_rgb(self.color[0], self.color[1], self.color[2])
    }
}

pub fn is_day(sin: f64) -> bool {
    sin > 0.0
}

pub fn sky_intensity(sin: f64) -> f64 {
    if is_day(sin) {
        BASE_INTENSITY + f64::min(DAY_BOOST_LIMIT, sin * 50.0)
    } else {
        night_intensity(sin)
    }
}

pub fn ground_intensity(sin: f64) -> f64 {
    if is_day(sin) {
        BASE_INTENSITY + f64::min(DAY_BOOST_LIMIT, sin * 5.0)
    } else {
        night_intensity(sin)
    }
}

/// Drops down to 2 when the sun is at its lowest point.
fn night_intensity(sin: f64) -> f64 {
    BASE_INTENSITY + sin * NIGHT_DIM_FACTOR
}
