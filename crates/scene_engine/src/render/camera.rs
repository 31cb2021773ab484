//! # 3D Camera
//!
//! Produces the view (V) and projection (P) matrices handed to
//! [`crate::scene::Scene::render`]. Right-handed, Y-up, OpenGL clip space
//! (depth -1..1).

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

/// Perspective camera
///
/// Matrices are computed on demand from the public fields; nothing is cached.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector (typically +Y)
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Viewport width / height
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a perspective camera looking at the origin
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    ///
    /// # Example
    /// ```rust
    /// use scene_engine::foundation::math::Vec3;
    /// use scene_engine::render::Camera;
    ///
    /// let camera = Camera::perspective(Vec3::new(4.0, 3.0, 3.0), 45.0, 4.0 / 3.0, 0.1, 100.0);
    /// assert_eq!(camera.target, Vec3::zeros());
    /// ```
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Move the camera, keeping its target
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Change the look-at point
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        log::trace!("Camera target updated to: {:?}", target);
    }

    /// Set target and up vector together
    ///
    /// `up` need not be perpendicular to the view direction; the view matrix
    /// orthonormalises it.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        self.target = target;
        self.up = up;
        log::trace!("Camera look_at updated - target: {:?}, up: {:?}", target, up);
    }

    /// Update the aspect ratio after a framebuffer resize
    pub fn set_aspect(&mut self, aspect: f32) {
        // Resizes arrive every frame while dragging; only log real changes
        if (self.aspect - aspect).abs() > 0.01 {
            log::info!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// World-to-camera matrix (V)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }

    /// Perspective projection matrix (P)
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far)
    }

    /// P · V
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Default for Camera {
    /// 45° camera at (4, 3, 3) looking at the origin, 4:3, planes 0.1..100
    fn default() -> Self {
        Self::perspective(Vec3::new(4.0, 3.0, 3.0), 45.0, 4.0 / 3.0, 0.1, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec4;
    use approx::assert_relative_eq;

    #[test]
    fn test_view_matrix_moves_target_onto_negative_z() {
        let camera = Camera::perspective(Vec3::new(0.0, 0.0, 5.0), 45.0, 1.0, 0.1, 100.0);
        let target = camera.view_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(target, Vec4::new(0.0, 0.0, -5.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_projection_maps_planes_to_ndc_depth() {
        let camera = Camera::perspective(Vec3::new(0.0, 0.0, 5.0), 60.0, 1.5, 1.0, 10.0);
        let p = camera.projection_matrix();

        let near = p * Vec4::new(0.0, 0.0, -1.0, 1.0);
        let far = p * Vec4::new(0.0, 0.0, -10.0, 1.0);
        assert_relative_eq!(near.z / near.w, -1.0, epsilon = 1e-5);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_set_aspect() {
        let mut camera = Camera::default();
        camera.set_aspect(2.0);
        assert_relative_eq!(camera.aspect, 2.0);
        assert_relative_eq!(camera.projection_matrix()[(0, 0)] * 2.0, camera.projection_matrix()[(1, 1)], epsilon = 1e-5);
    }

    #[test]
    fn test_view_projection_order() {
        let camera = Camera::default();
        assert_relative_eq!(
            camera.view_projection_matrix(),
            camera.projection_matrix() * camera.view_matrix(),
            epsilon = 1e-6
        );
    }
}
