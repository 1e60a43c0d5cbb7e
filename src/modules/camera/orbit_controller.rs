use std::f32::consts::PI;

use cgmath::{InnerSpace, Point3, Rad, Vector3};
use winit::{dpi::PhysicalPosition, event::MouseScrollDelta};
use super::camera::Camera;

const POLAR_EPSILON: f32 = 0.000001;
const ZOOM_SCALE: f32 = 0.95;
const PIXELS_PER_LINE: f32 = 100.0;

/// Rotates and dollies the camera around a target, with optional inertia.
pub struct OrbitController {
    target: Point3<f32>,
    radius: f32,
    /// Azimuth around the Y axis, 0 looks down -Z
    theta: f32,
    /// Polar angle from +Y
    phi: f32,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    viewport_height: f32,
}

impl OrbitController {

    pub fn new(camera: &Camera, target: [f32; 3], viewport_height: u32) -> Self {
        let target = Point3::from(target);
        let offset = camera.position - target;
        let radius = offset.magnitude();
        let (theta, phi) = if radius == 0.0 {
            (0.0, PI / 2.0)
        } else {
            (offset.x.atan2(offset.z), (offset.y / radius).clamp(-1.0, 1.0).acos())
        };
        Self {
            target,
            radius,
            theta,
            phi,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            min_distance: 0.5,
            max_distance: 500.0,
            viewport_height: viewport_height.max(1) as f32,
        }
    }

    pub fn set_viewport_height(&mut self, height: u32) {
        self.viewport_height = height.max(1) as f32;
    }

    pub fn process_mouse(&mut self, delta_x: f64, delta_y: f64) {
        let full_turn = 2.0 * PI * self.rotate_speed / self.viewport_height;
        self.delta_theta -= full_turn * delta_x as f32;
        self.delta_phi -= full_turn * delta_y as f32;
    }

    pub fn process_scroll(&mut self, delta: &MouseScrollDelta) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => *y,
            MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32 / PIXELS_PER_LINE,
        };
        // scrolling forward moves closer
        self.scale *= ZOOM_SCALE.powf(lines);
    }

    pub fn update_camera(&mut self, camera: &mut Camera) {
        if self.enable_damping {
            self.theta += self.delta_theta * self.damping_factor;
            self.phi += self.delta_phi * self.damping_factor;
        } else {
            self.theta += self.delta_theta;
            self.phi += self.delta_phi;
        }
        self.phi = self.phi.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        self.radius = (self.radius * self.scale).clamp(self.min_distance, self.max_distance);

        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        let offset = Vector3::new(
            self.radius * sin_phi * sin_theta,
            self.radius * cos_phi,
            self.radius * sin_phi * cos_theta,
        );
        camera.position = self.target + offset;
        camera.yaw = Rad(-self.theta - PI / 2.0);
        camera.pitch = Rad(self.phi - PI / 2.0);

        if self.enable_damping {
            self.delta_theta *= 1.0 - self.damping_factor;
            self.delta_phi *= 1.0 - self.damping_factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
        }
        self.scale = 1.0;
    }

    pub fn distance(&self) -> f32 {
        self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, EuclideanSpace};

    fn camera() -> Camera {
        Camera::new((0.0, 1.0, 4.0), Deg(-90.0), Deg(0.0))
    }

    fn assert_near(a: Point3<f32>, b: Point3<f32>) {
        assert!((a - b).magnitude() < 1e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn idle_update_keeps_position() {
        let mut camera = camera();
        let mut controller = OrbitController::new(&camera, [0.0, 0.0, 0.0], 600);
        controller.update_camera(&mut camera);
        assert_near(camera.position, Point3::new(0.0, 1.0, 4.0));
        assert!((controller.distance() - 17f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn camera_looks_at_target() {
        let mut camera = camera();
        let mut controller = OrbitController::new(&camera, [0.0, 0.0, 0.0], 600);
        controller.process_mouse(120.0, -40.0);
        for _ in 0..10 {
            controller.update_camera(&mut camera);
        }
        let to_target = (Point3::origin() - camera.position).normalize();
        assert!((camera.direction() - to_target).magnitude() < 1e-4);
    }

    #[test]
    fn damping_spreads_rotation_over_frames() {
        let mut camera = camera();
        let mut controller = OrbitController::new(&camera, [0.0, 0.0, 0.0], 600);
        controller.process_mouse(300.0, 0.0);
        controller.update_camera(&mut camera);
        let first = controller.theta;
        controller.update_camera(&mut camera);
        let second = controller.theta - first;
        assert!(second.abs() < first.abs());
        assert!((second / first - 0.95).abs() < 1e-4);
    }

    #[test]
    fn without_damping_rotation_is_applied_once() {
        let mut camera = camera();
        let mut controller = OrbitController::new(&camera, [0.0, 0.0, 0.0], 600);
        controller.enable_damping = false;
        controller.process_mouse(150.0, 0.0);
        controller.update_camera(&mut camera);
        let after_first = controller.theta;
        assert!((after_first + PI / 2.0).abs() < 1e-5);
        controller.update_camera(&mut camera);
        assert_eq!(controller.theta, after_first);
    }

    #[test]
    fn polar_angle_is_clamped() {
        let mut camera = camera();
        let mut controller = OrbitController::new(&camera, [0.0, 0.0, 0.0], 600);
        controller.enable_damping = false;
        controller.process_mouse(0.0, 100_000.0);
        controller.update_camera(&mut camera);
        assert!(controller.phi >= POLAR_EPSILON);
        assert!(camera.position.y > 0.0);
    }

    #[test]
    fn scroll_dollies_in_and_out() {
        let mut camera = camera();
        let mut controller = OrbitController::new(&camera, [0.0, 0.0, 0.0], 600);
        let start = controller.distance();
        controller.process_scroll(&MouseScrollDelta::LineDelta(0.0, 1.0));
        controller.update_camera(&mut camera);
        assert!((controller.distance() - start * 0.95).abs() < 1e-5);
        controller.process_scroll(&MouseScrollDelta::LineDelta(0.0, -1.0));
        controller.update_camera(&mut camera);
        assert!((controller.distance() - start).abs() < 1e-4);
    }
}
