use chessboard_common::Viewport;
use glam::{Mat4, Vec3};

/// Perspective camera looking from `position` at `target`.
///
/// Only the aspect ratio changes after construction. The projection matrix
/// is cached and rebuilt by [`PerspectiveCamera::update_projection`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    fov_degrees: f32,
    aspect: f32,
    near: f32,
    far: f32,
    position: Vec3,
    target: Vec3,
    projection: Mat4,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(45.0, 16.0 / 9.0, 0.1, 1000.0)
            .looking_at(Vec3::new(0.0, 200.0, 300.0), Vec3::ZERO)
    }
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov_degrees,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection();
        camera
    }

    pub fn looking_at(mut self, position: Vec3, target: Vec3) -> Self {
        self.position = position;
        self.target = target;
        self
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Match the aspect ratio to a viewport and rebuild the projection.
    pub fn set_aspect(&mut self, viewport: Viewport) {
        self.aspect = viewport.aspect_ratio();
        self.update_projection();
    }

    pub fn update_projection(&mut self) {
        self.projection =
            Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far);
    }

    /// World up, or -Z when looking straight up or down.
    fn up(&self) -> Vec3 {
        let forward = self.target - self.position;
        if forward.cross(Vec3::Y).length_squared() <= 1e-6 * forward.length_squared() {
            Vec3::NEG_Z
        } else {
            Vec3::Y
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up())
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
