use glam::{Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Perspective camera with OpenGL-style clip space (NDC z in `[-1, 1]`).
///
/// The browser scene graph this mirrors uses the same convention, so a
/// pointer unprojected at depth `0.5` lands at the same world point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub rotation: Quat,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect_ratio: f32,
    pub near_plane: f32,
    pub far_plane: f32,
}

impl Camera {
    pub fn new_perspective(fov_y: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_y,
            aspect_ratio,
            near_plane: near,
            far_plane: far,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, self.aspect_ratio, self.near_plane, self.far_plane)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// World point -> normalized device coordinates (with perspective divide).
    pub fn project(&self, world: Vec3) -> Vec3 {
        self.view_projection_matrix().project_point3(world)
    }

    /// Normalized device coordinates -> world point.
    pub fn unproject(&self, ndc: Vec3) -> Vec3 {
        self.view_projection_matrix().inverse().project_point3(ndc)
    }

    /// Ray through a pointer position given in NDC. Returns `(origin, direction)`
    /// with a unit direction.
    pub fn ray_through(&self, pointer: Vec2) -> (Vec3, Vec3) {
        let far = self.unproject(pointer.extend(0.5));
        (self.position, (far - self.position).normalize())
    }

    /// The drag target used while a body follows the pointer: unproject at depth
    /// `0.5`, then push the point away from the camera by the camera's distance to
    /// the world origin.
    pub fn pointer_target(&self, pointer: Vec2) -> Vec3 {
        let point = self.unproject(pointer.extend(0.5));
        let dir = (point - self.position).normalize();
        point + dir * self.position.length()
    }
}

impl Default for Camera {
    /// Matches the scene's stock camera: 25° vertical FOV, 13 units back on +Z.
    fn default() -> Self {
        Self::new_perspective(25f32.to_radians(), 16.0 / 9.0, 0.1, 1000.0)
            .with_position(Vec3::new(0.0, 0.0, 13.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unproject_inverts_project() {
        let camera = Camera::default();
        let world = Vec3::new(1.5, 2.0, -0.5);
        let ndc = camera.project(world);
        let back = camera.unproject(ndc);
        assert!(back.abs_diff_eq(world, 1e-3), "{back:?} != {world:?}");
    }

    #[test]
    fn center_ray_points_down_negative_z() {
        let camera = Camera::default();
        let (origin, dir) = camera.ray_through(Vec2::ZERO);
        assert_eq!(origin, camera.position);
        assert!(dir.abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }

    #[test]
    fn pointer_target_at_center_reaches_origin_plane() {
        // Depth 0.5 with near=0.1/far=1000 unprojects ~0.4 units in front of the
        // camera; pushing it 13 more lands just behind the origin plane.
        let camera = Camera::default();
        let target = camera.pointer_target(Vec2::ZERO);
        approx::assert_abs_diff_eq!(target.x, 0.0, epsilon = 1e-4);
        approx::assert_abs_diff_eq!(target.y, 0.0, epsilon = 1e-4);
        approx::assert_abs_diff_eq!(target.z, -0.4, epsilon = 0.01);
    }

    #[test]
    fn project_centers_origin() {
        let camera = Camera::default();
        let ndc = camera.project(Vec3::ZERO);
        approx::assert_abs_diff_eq!(ndc.x, 0.0, epsilon = 1e-6);
        approx::assert_abs_diff_eq!(ndc.y, 0.0, epsilon = 1e-6);
    }
}
