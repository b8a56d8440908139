//! Camera for 3D orbit view.

use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

/// Orbit camera looking at the tree.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Closest allowed zoom.
    pub min_distance: f32,
    /// Farthest allowed zoom.
    pub max_distance: f32,
    /// Auto-rotate speed; `0.5` is one turn every two minutes.
    pub auto_rotate_speed: f32,
}

impl Camera {
    /// Camera on the +Z axis, level with the origin.
    pub fn new(config: &CameraConfig) -> Self {
        let min_distance = config.min_distance.max(0.1);
        let max_distance = config.max_distance.max(min_distance);
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: config.distance.clamp(min_distance, max_distance),
            target: Vec3::ZERO,
            fov_degrees: config.fov_degrees,
            min_distance,
            max_distance,
            auto_rotate_speed: config.auto_rotate_speed,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Perspective projection for the given aspect ratio.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
        Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, 0.1, 200.0)
    }

    /// Drag by a pixel delta.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * 0.005;
        self.pitch = (self.pitch + dy * 0.005).clamp(-1.5, 1.5);
    }

    /// Zoom by wheel lines; positive moves closer.
    pub fn zoom(&mut self, lines: f32) {
        self.distance = (self.distance - lines * 1.5).clamp(self.min_distance, self.max_distance);
    }

    /// Slow turntable spin, matching three.js OrbitControls at 60 Hz.
    pub fn auto_rotate(&mut self, delta: f32) {
        if delta.is_finite() && delta > 0.0 {
            self.yaw += std::f32::consts::TAU / 60.0 * self.auto_rotate_speed * delta;
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera_looks_down_z() {
        let camera = Camera::default();
        let pos = camera.position();
        assert!((pos - Vec3::new(0.0, 0.0, 35.0)).length() < 1e-4);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = Camera::default();
        camera.zoom(1000.0);
        assert_eq!(camera.distance, camera.min_distance);
        camera.zoom(-1000.0);
        assert_eq!(camera.distance, camera.max_distance);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = Camera::default();
        camera.orbit(0.0, 10_000.0);
        assert_eq!(camera.pitch, 1.5);
    }

    #[test]
    fn test_auto_rotate_period() {
        let mut camera = Camera::default();
        camera.auto_rotate_speed = 2.0;
        for _ in 0..60 * 30 {
            camera.auto_rotate(1.0 / 60.0);
        }
        // Speed 2.0 is one full turn every 30 seconds.
        assert!((camera.yaw - std::f32::consts::TAU).abs() < 1e-2);
    }
}
