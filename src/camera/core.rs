use glam::{Mat4, Vec3};

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Camera {
    /// Build the combined view-projection matrix.
    pub fn build_matrix(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target, self.up);
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        let proj = Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        );
        proj * view
    }

    /// Normalized view direction from eye toward target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_projection_maps_target_in_front_of_eye() {
        let camera = Camera {
            eye: Vec3::new(0.0, 0.0, -100.0),
            target: Vec3::new(0.0, 0.0, 800.0),
            up: Vec3::Y,
            aspect: 16.0 / 9.0,
            fovy: 45.0,
            znear: 1.0,
            zfar: 4000.0,
        };
        let clip = camera.build_matrix() * Vec3::new(0.0, 0.0, 500.0).extend(1.0);
        let ndc = clip / clip.w;
        // On the view axis: centered in x/y, inside the depth range.
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn forward_points_at_target() {
        let camera = Camera {
            eye: Vec3::ZERO,
            target: Vec3::new(0.0, 0.0, 10.0),
            up: Vec3::Y,
            aspect: 1.0,
            fovy: 45.0,
            znear: 1.0,
            zfar: 100.0,
        };
        assert!((camera.forward() - Vec3::Z).length() < 1e-6);
    }
}
