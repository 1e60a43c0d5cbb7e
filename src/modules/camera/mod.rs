pub mod camera;
pub mod orbit_controller;
