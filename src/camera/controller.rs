use std::f32::consts::PI;

use glam::{Quat, Vec2, Vec3};

use super::core::Camera;
use crate::options::CameraOptions;

/// Orbital camera controller.
///
/// Maintains a quaternion orientation, a focus point, and a distance; the
/// eye position is derived from the three. The default pose sits behind the
/// respawn threshold looking down the corridor toward +z, where instances
/// stream from.
pub struct CameraController {
    orientation: Quat,
    distance: f32,
    focus_point: Vec3,

    /// Derived perspective camera, rebuilt on every state change.
    pub camera: Camera,

    rotate_speed: f32,
    pan_speed: f32,
    zoom_speed: f32,
}

impl CameraController {
    /// Controller with the default corridor-facing pose.
    #[must_use]
    pub fn new(options: &CameraOptions, aspect: f32) -> Self {
        let focus_point = Vec3::new(0.0, 0.0, 800.0);
        let distance = 900.0;
        // Half-turn about Y: eye sits at focus - Z * distance, looking +z.
        let orientation = Quat::from_rotation_y(PI);

        let camera = Camera {
            eye: focus_point + (orientation * Vec3::Z) * distance,
            target: focus_point,
            up: orientation * Vec3::Y,
            aspect,
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        };

        Self {
            orientation,
            distance,
            focus_point,
            camera,
            rotate_speed: 0.01 * options.rotate_speed,
            pan_speed: 0.5 * options.pan_speed,
            zoom_speed: options.zoom_speed,
        }
    }

    fn update_camera_pos(&mut self) {
        let dir = self.orientation * Vec3::Z;
        self.camera.eye = self.focus_point + dir * self.distance;
        self.camera.target = self.focus_point;
        self.camera.up = self.orientation * Vec3::Y;
    }

    /// Update the viewport aspect ratio after a resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.camera.aspect = width as f32 / height as f32;
        }
    }

    /// Orbit around the focus point by a screen-space drag delta.
    pub fn rotate(&mut self, delta: Vec2) {
        let up = self.orientation * Vec3::Y;
        let horizontal =
            Quat::from_axis_angle(up, -delta.x * self.rotate_speed);
        self.orientation = horizontal * self.orientation;

        let right = self.orientation * Vec3::X;
        let vertical =
            Quat::from_axis_angle(right, -delta.y * self.rotate_speed);
        self.orientation = vertical * self.orientation;

        self.update_camera_pos();
    }

    /// Translate the focus point in the camera plane.
    pub fn pan(&mut self, delta: Vec2) {
        let right = self.orientation * Vec3::X;
        let up = self.orientation * Vec3::Y;
        self.focus_point +=
            (right * delta.x + up * delta.y) * self.pan_speed;
        self.update_camera_pos();
    }

    /// Move the eye toward (positive delta) or away from the focus point.
    pub fn zoom(&mut self, delta: f32) {
        self.distance =
            (self.distance * (1.0 - delta * self.zoom_speed)).max(1.0);
        self.update_camera_pos();
    }

    /// Current orbit distance.
    pub fn distance(&self) -> f32 {
        self.distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> CameraController {
        CameraController::new(&CameraOptions::default(), 16.0 / 9.0)
    }

    #[test]
    fn default_pose_faces_down_the_corridor() {
        let c = controller();
        let forward = c.camera.forward();
        assert!(forward.z > 0.99, "camera must look toward +z");
        assert!(c.camera.eye.z < c.camera.target.z);
    }

    #[test]
    fn zoom_never_crosses_the_focus_point() {
        let mut c = controller();
        for _ in 0..200 {
            c.zoom(5.0);
        }
        assert!(c.distance() >= 1.0);
    }

    #[test]
    fn rotation_preserves_distance() {
        let mut c = controller();
        let before = c.distance();
        c.rotate(Vec2::new(35.0, -12.0));
        let eye_to_focus = (c.camera.eye - c.camera.target).length();
        assert!((eye_to_focus - before).abs() < 1e-3);
    }
}
