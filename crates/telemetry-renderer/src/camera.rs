use telemetry_config::CameraConfig;
use telemetry_math::{Matrix4, Vector3};

/// Fixed camera for the orientation scene.
///
/// Position and target never change at runtime; only the aspect ratio follows
/// the window size.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Eye position in world space.
    pub pos: Vector3,
    /// Point the camera looks at.
    pub center: Vector3,
    /// World up direction.
    pub up: Vector3,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Aspect ratio (width / height).
    pub aspect_ratio: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
}

impl Camera {
    pub fn from_config(config: &CameraConfig, aspect_ratio: f32) -> Self {
        Self {
            pos: config.position,
            center: config.center,
            up: config.up,
            fov_y_degrees: config.fov_y_degrees,
            aspect_ratio,
            near: config.near,
            far: config.far,
        }
    }

    /// View matrix (world to eye space).
    pub fn view_matrix(&self) -> Matrix4 {
        Matrix4::look_at(self.pos, self.center, self.up)
    }

    /// Perspective projection matrix.
    pub fn projection_matrix(&self) -> Matrix4 {
        Matrix4::perspective(self.fov_y_degrees, self.aspect_ratio, self.near, self.far)
    }

    /// Combined `projection * view`, computed once per camera change.
    pub fn pv_matrix(&self) -> Matrix4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_origin_projects_to_screen_center() {
        let camera = Camera::from_config(&CameraConfig::default(), 4.0 / 3.0);
        let clip = camera.pv_matrix().transform([0.0, 0.0, 0.0, 1.0]);
        assert!(clip[3] > 0.0);
        assert!((clip[0] / clip[3]).abs() < 1e-5);
        assert!((clip[1] / clip[3]).abs() < 1e-5);
        let depth = clip[2] / clip[3];
        assert!((-1.0..=1.0).contains(&depth));
    }

    #[test]
    fn viewport_updates_aspect_and_ignores_zero_size() {
        let mut camera = Camera::from_config(&CameraConfig::default(), 1.0);
        camera.set_viewport(1600, 900);
        assert!((camera.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
        camera.set_viewport(0, 900);
        assert!((camera.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
    }
}
