// CONTROLLER: Input, camera control and the per-frame update
pub mod input;
pub mod camera_controller;
pub mod frame_loop;

pub use input::{InputEvent, InputState, KeyBindings};
pub use camera_controller::CameraController;
pub use frame_loop::{FrameLoop, FrameOutput};
