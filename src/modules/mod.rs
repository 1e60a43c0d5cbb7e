pub mod assets;
pub mod camera;
pub mod core;
pub mod environment;
pub mod pipelines;
pub mod setting;
pub mod state;
pub mod utils;
