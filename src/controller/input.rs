//! Keyboard and mouse state collected between frames
use std::collections::HashSet;
use winit::keyboard::KeyCode;

/// Window-system independent input events
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    /// Raw pointer motion in pixels
    MouseMove { dx: f32, dy: f32 },
    FocusLost,
}

#[derive(Debug, Default)]
pub struct InputState {
    pressed_keys: HashSet<KeyCode>,
    /// Keys pressed since they were last polled; survives a release
    latched_keys: HashSet<KeyCode>,
    look_delta: (f32, f32),
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown(key) => {
                self.pressed_keys.insert(*key);
                self.latched_keys.insert(*key);
            }
            InputEvent::KeyUp(key) => {
                self.pressed_keys.remove(key);
            }
            InputEvent::MouseMove { dx, dy } => {
                self.look_delta.0 += dx;
                self.look_delta.1 += dy;
            }
            InputEvent::FocusLost => {
                self.clear_keys();
            }
        }
    }

    /// Level query: is the key held right now.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Sticky query: true if the key is held, or was pressed at any point
    /// since the previous poll of the same key. Clears the latch.
    pub fn poll_key(&mut self, key: KeyCode) -> bool {
        let latched = self.latched_keys.remove(&key);
        latched || self.pressed_keys.contains(&key)
    }

    pub fn clear_keys(&mut self) {
        self.pressed_keys.clear();
        self.latched_keys.clear();
    }

    pub fn consume_look(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.look_delta)
    }
}

/// Key mapping configuration
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub start: KeyCode,
    pub exit: KeyCode,
    pub forward: [KeyCode; 2],
    pub backward: [KeyCode; 2],
    pub left: [KeyCode; 2],
    pub right: [KeyCode; 2],
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            start: KeyCode::Space,
            exit: KeyCode::Escape,
            forward: [KeyCode::ArrowUp, KeyCode::KeyW],
            backward: [KeyCode::ArrowDown, KeyCode::KeyS],
            left: [KeyCode::ArrowLeft, KeyCode::KeyA],
            right: [KeyCode::ArrowRight, KeyCode::KeyD],
        }
    }
}

impl KeyBindings {
    pub fn is_any_pressed(&self, input: &InputState, keys: &[KeyCode]) -> bool {
        keys.iter().any(|key| input.is_key_pressed(*key))
    }
}

pub mod native {
    use super::*;
    use winit::event::{ElementState, KeyEvent};
    use winit::keyboard::PhysicalKey;

    pub fn keyboard_event_to_input(event: &KeyEvent) -> Option<InputEvent> {
        let PhysicalKey::Code(code) = event.physical_key else {
            return None;
        };
        match event.state {
            ElementState::Pressed if !event.repeat => Some(InputEvent::KeyDown(code)),
            ElementState::Pressed => None,
            ElementState::Released => Some(InputEvent::KeyUp(code)),
        }
    }

    pub fn mouse_motion_to_input(delta: (f64, f64)) -> InputEvent {
        InputEvent::MouseMove {
            dx: delta.0 as f32,
            dy: delta.1 as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_key_polls_every_frame() {
        let mut input = InputState::new();
        input.process_event(&InputEvent::KeyDown(KeyCode::Space));
        assert!(input.poll_key(KeyCode::Space));
        assert!(input.poll_key(KeyCode::Space));
        assert!(input.is_key_pressed(KeyCode::Space));
    }

    #[test]
    fn test_tap_between_frames_is_seen_once() {
        let mut input = InputState::new();
        input.process_event(&InputEvent::KeyDown(KeyCode::Space));
        input.process_event(&InputEvent::KeyUp(KeyCode::Space));

        assert!(!input.is_key_pressed(KeyCode::Space));
        assert!(input.poll_key(KeyCode::Space));
        assert!(!input.poll_key(KeyCode::Space));
    }

    #[test]
    fn test_latch_is_per_key() {
        let mut input = InputState::new();
        input.process_event(&InputEvent::KeyDown(KeyCode::KeyW));
        input.process_event(&InputEvent::KeyUp(KeyCode::KeyW));
        assert!(!input.poll_key(KeyCode::Space));
        assert!(input.poll_key(KeyCode::KeyW));
    }

    #[test]
    fn test_focus_loss_releases_everything() {
        let mut input = InputState::new();
        input.process_event(&InputEvent::KeyDown(KeyCode::ArrowUp));
        input.process_event(&InputEvent::FocusLost);
        assert!(!input.is_key_pressed(KeyCode::ArrowUp));
        assert!(!input.poll_key(KeyCode::ArrowUp));
    }

    #[test]
    fn test_look_delta_accumulates_until_consumed() {
        let mut input = InputState::new();
        input.process_event(&InputEvent::MouseMove { dx: 3.0, dy: -1.0 });
        input.process_event(&InputEvent::MouseMove { dx: 2.0, dy: 4.0 });
        assert_eq!(input.consume_look(), (5.0, 3.0));
        assert_eq!(input.consume_look(), (0.0, 0.0));
    }

    #[test]
    fn test_bindings_accept_arrows_and_wasd() {
        let bindings = KeyBindings::default();
        let mut input = InputState::new();
        input.process_event(&InputEvent::KeyDown(KeyCode::KeyA));
        assert!(bindings.is_any_pressed(&input, &bindings.left));
        assert!(!bindings.is_any_pressed(&input, &bindings.right));
        assert_eq!(bindings.exit, KeyCode::Escape);
    }
}
