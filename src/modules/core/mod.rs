pub mod light;
pub mod model;
pub mod object;
pub mod point_shadow;
pub mod scene;
pub mod texture;
