use glam::Vec3;

use crate::config::CameraConfig;
use crate::controller::input::{InputState, KeyBindings};
use crate::model::Camera;

/// Highest vertical angle the mouse can reach, just short of straight up/down
const MAX_VERTICAL_ANGLE: f32 = 89f32 * std::f32::consts::PI / 180.0;

/// Handles camera movement and orientation
#[derive(Debug, Clone)]
pub struct CameraController {
    pub move_speed: f32,
    pub mouse_sensitivity: f32,
}

impl CameraController {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            move_speed: config.move_speed,
            mouse_sensitivity: config.mouse_speed,
        }
    }

    /// Apply mouse look delta (pixels) to camera
    pub fn apply_look(&self, camera: &mut Camera, dx: f32, dy: f32) {
        camera.horizontal_angle -= dx * self.mouse_sensitivity;
        camera.vertical_angle = (camera.vertical_angle - dy * self.mouse_sensitivity)
            .clamp(-MAX_VERTICAL_ANGLE, MAX_VERTICAL_ANGLE);
    }

    /// Update camera position based on pressed keys
    pub fn update_movement(&self, camera: &mut Camera, input: &InputState, bindings: &KeyBindings, dt: f32) {
        let mut cam_move = Vec3::ZERO;

        if bindings.is_any_pressed(input, &bindings.forward) {
            cam_move += camera.forward();
        }
        if bindings.is_any_pressed(input, &bindings.backward) {
            cam_move -= camera.forward();
        }
        if bindings.is_any_pressed(input, &bindings.right) {
            cam_move += camera.right();
        }
        if bindings.is_any_pressed(input, &bindings.left) {
            cam_move -= camera.right();
        }

        if cam_move.length_squared() > 0.0 {
            camera.eye += cam_move.normalize() * self.move_speed * dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::input::InputEvent;
    use winit::keyboard::KeyCode;

    fn setup() -> (Camera, CameraController) {
        let config = CameraConfig::default();
        (Camera::new(&config, 1024, 768), CameraController::new(&config))
    }

    #[test]
    fn test_forward_moves_along_view_direction() {
        let (mut cam, controller) = setup();
        let mut input = InputState::new();
        input.process_event(&InputEvent::KeyDown(KeyCode::ArrowUp));

        let start = cam.eye;
        controller.update_movement(&mut cam, &input, &KeyBindings::default(), 0.5);
        let moved = cam.eye - start;
        assert!(moved.abs_diff_eq(Vec3::new(0.0, 0.0, -15.0), 1e-3));
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let (mut cam, controller) = setup();
        let mut input = InputState::new();
        input.process_event(&InputEvent::KeyDown(KeyCode::KeyA));
        input.process_event(&InputEvent::KeyDown(KeyCode::KeyD));

        let start = cam.eye;
        controller.update_movement(&mut cam, &input, &KeyBindings::default(), 1.0);
        assert_eq!(cam.eye, start);
    }

    #[test]
    fn test_vertical_look_is_clamped() {
        let (mut cam, controller) = setup();
        controller.apply_look(&mut cam, 0.0, -100_000.0);
        assert!((cam.vertical_angle - MAX_VERTICAL_ANGLE).abs() < 1e-6);
        controller.apply_look(&mut cam, 0.0, 100_000.0);
        assert!((cam.vertical_angle + MAX_VERTICAL_ANGLE).abs() < 1e-6);
    }

    #[test]
    fn test_mouse_right_turns_right() {
        let (mut cam, controller) = setup();
        let right_before = cam.right();
        controller.apply_look(&mut cam, 50.0, 0.0);
        // after turning right the new forward leans toward the old right vector
        assert!(cam.forward().dot(right_before) > 0.0);
    }
}
