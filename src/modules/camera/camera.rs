use cgmath::*;

/// Maps OpenGL clip depth `-1..1` to wgpu's `0..1`.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

pub const SCENE_FOVY: Deg<f32> = Deg(75.0);
pub const SCENE_ZNEAR: f32 = 0.1;
pub const SCENE_ZFAR: f32 = 1000.0;

/// Viewer position plus a heading, yaw measured from +X towards +Z.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Point3<f32>,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
}

impl Camera {
    pub fn new(position: impl Into<Point3<f32>>, yaw: impl Into<Rad<f32>>, pitch: impl Into<Rad<f32>>) -> Self {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        }
    }

    /// Camera at `position` facing `target`. Coincident points face -Z.
    pub fn looking_at(position: impl Into<Point3<f32>>, target: impl Into<Point3<f32>>) -> Self {
        let position = position.into();
        let offset = target.into() - position;
        if offset.magnitude2() == 0.0 {
            return Self::new(position, Deg(-90.0), Rad(0.0));
        }
        let offset = offset.normalize();
        Self::new(position, Rad(offset.z.atan2(offset.x)), Rad(offset.y.clamp(-1.0, 1.0).asin()))
    }

    pub fn direction(&self) -> Vector3<f32> {
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize()
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.direction(), Vector3::unit_y())
    }
}

pub struct Projection {
    pub aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32, fovy: impl Into<Rad<f32>>, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: aspect_ratio(width, height),
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// 75° vertical field of view, clipping at 0.1 and 1000.
    pub fn for_scene(width: u32, height: u32) -> Self {
        Self::new(width, height, SCENE_FOVY, SCENE_ZNEAR, SCENE_ZFAR)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = aspect_ratio(width, height);
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    width as f32 / height.max(1) as f32
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// Used for fog depth, `w` is 1
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_position: [0.0, 0.0, 0.0, 1.0],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = (projection.matrix() * camera.view_matrix()).into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn resize_updates_aspect() {
        let mut projection = Projection::for_scene(800, 600);
        assert!((projection.aspect - 800.0 / 600.0).abs() < 1e-6);
        projection.resize(1000, 500);
        assert_eq!(projection.aspect, 2.0);
    }

    #[test]
    fn zero_height_does_not_divide_by_zero() {
        let projection = Projection::for_scene(800, 0);
        assert!(projection.aspect.is_finite());
    }

    #[test]
    fn looking_at_faces_the_target() {
        let camera = Camera::looking_at((0.0, 1.0, 4.0), (0.0, 0.0, 0.0));
        assert_near(camera.direction(), Vector3::new(0.0, -1.0, -4.0).normalize());

        let level = Camera::looking_at((0.0, 0.0, 4.0), (0.0, 0.0, 0.0));
        assert_near(level.direction(), -Vector3::unit_z());
    }

    #[test]
    fn looking_at_itself_faces_forward() {
        let camera = Camera::looking_at((1.0, 2.0, 3.0), (1.0, 2.0, 3.0));
        assert_near(camera.direction(), -Vector3::unit_z());
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let camera = Camera::looking_at((0.0, 1.0, 4.0), (0.0, 0.0, 0.0));
        let projection = Projection::for_scene(100, 100);
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera, &projection);
        let clip = Matrix4::from(uniform.view_proj) * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..1.0).contains(&ndc.z));
        assert_eq!(uniform.view_position, [0.0, 1.0, 4.0, 1.0]);
    }
}
