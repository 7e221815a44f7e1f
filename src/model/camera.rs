use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

/// Free-fly camera: a position plus horizontal/vertical angles in radians.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub horizontal_angle: f32,
    pub vertical_angle: f32,
    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig, width: u32, height: u32) -> Self {
        Self {
            eye: Vec3::from_array(config.position),
            horizontal_angle: config.horizontal_angle_degrees.to_radians(),
            vertical_angle: config.vertical_angle_degrees.to_radians(),
            fov_y: config.fov_degrees.to_radians(),
            aspect: aspect_of(width, height),
            z_near: config.z_near,
            z_far: config.z_far,
        }
    }

    pub fn forward(&self) -> Vec3 {
        let (h, v) = (self.horizontal_angle, self.vertical_angle);
        Vec3::new(v.cos() * h.sin(), v.sin(), v.cos() * h.cos())
    }

    pub fn right(&self) -> Vec3 {
        let h = self.horizontal_angle - std::f32::consts::FRAC_PI_2;
        Vec3::new(h.sin(), 0.0, h.cos())
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    pub fn target(&self) -> Vec3 {
        self.eye + self.forward()
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = aspect_of(width, height);
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target(), self.up())
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far)
    }
}

fn aspect_of(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_default_camera_looks_down_negative_z() {
        let cam = Camera::new(&CameraConfig::default(), 1024, 768);
        assert!(cam.forward().abs_diff_eq(Vec3::NEG_Z, EPS));
        assert!(cam.up().abs_diff_eq(Vec3::Y, EPS));
        assert!(cam.right().abs_diff_eq(Vec3::X, EPS));
        assert!((cam.aspect - 4.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let mut cam = Camera::new(&CameraConfig::default(), 800, 600);
        cam.horizontal_angle = 0.7;
        cam.vertical_angle = -0.3;
        let (f, r, u) = (cam.forward(), cam.right(), cam.up());
        assert!((f.length() - 1.0).abs() < EPS);
        assert!(f.dot(r).abs() < EPS);
        assert!(f.dot(u).abs() < EPS);
        assert!(r.dot(u).abs() < EPS);
    }

    #[test]
    fn test_view_maps_eye_to_origin() {
        let cam = Camera::new(&CameraConfig::default(), 1024, 768);
        let p = cam.view().transform_point3(cam.eye);
        assert!(p.abs_diff_eq(Vec3::ZERO, 1e-4));
        // a point straight ahead lands on the -Z axis in view space
        let ahead = cam.view().transform_point3(cam.eye + cam.forward() * 10.0);
        assert!(ahead.abs_diff_eq(Vec3::new(0.0, 0.0, -10.0), 1e-4));
    }

    #[test]
    fn test_zero_sized_window_keeps_finite_aspect() {
        let mut cam = Camera::new(&CameraConfig::default(), 1024, 768);
        cam.set_aspect(0, 0);
        assert!(cam.aspect.is_finite());
    }
}
