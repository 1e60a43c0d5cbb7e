use std::f64::consts::PI;

use crate::modules::utils::functions::hsl_to_rgb;
use super::{Hsl, Position};

const SUN_HUE: f64 = 0.1;
const MOON_HUE: f64 = 0.5;

/// A point light orbiting the scene in the X-Y plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CelestialLight {
    pub position: Position,
    pub color: Hsl,
    pub intensity: f64,
}

impl CelestialLight {
    pub fn sun(angle: f64, radius: f64, intensity: f64) -> Self {
        Self {
            position: orbit_position(angle, radius),
            color: sun_color(angle),
            intensity,
        }
    }

    /// The moon is always on the opposite side of the sun.
    pub fn moon(angle: f64, radius: f64, intensity: f64) -> Self {
        Self {
            position: orbit_position(angle + PI, radius),
            color: moon_color(angle),
            intensity,
        }
    }

    pub fn rgb(&self) -> [f64; 3] {
        hsl_to_rgb(self.color[0], self.color[1], self.color[2])
    }
}

pub fn orbit_position(angle: f64, radius: f64) -> Position {
    [angle.cos() * radius, angle.sin() * radius, 0.0]
}

/// Fully dark when the sun sits at its lowest point.
pub fn sun_color(angle: f64) -> Hsl {
    [SUN_HUE, 1.0, angle.sin() * 0.5 + 0.5]
}

pub fn moon_color(angle: f64) -> Hsl {
    [MOON_HUE, 1.0, (angle + PI).sin() * 0.15 + 0.85]
}
