pub mod cycle;
pub mod fog;
pub mod sky;
pub mod sun;

/// Hue, saturation, lightness
pub type Hsl = [f64; 3];
pub type Position = [f64; 3];
