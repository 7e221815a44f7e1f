use glam::Mat4;
use tracing::info;

use crate::config::AppConfig;
use crate::config::SceneConfig;
use crate::controller::camera_controller::CameraController;
use crate::controller::input::{InputState, KeyBindings};
use crate::model::transform::{build_model_matrices, mvp};
use crate::model::{Camera, Drawable, SceneState, Transition};

/// Matrices for one drawable in one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectTransform {
    pub drawable: Drawable,
    pub model: Mat4,
    pub mvp: Mat4,
}

/// Everything the renderer needs from one update
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub projection: Mat4,
    pub view: Mat4,
    pub objects: [ObjectTransform; 4],
    pub exit_requested: bool,
}

/// Per-frame update: input, ship animation, camera and transforms
pub struct FrameLoop {
    pub scene: SceneConfig,
    pub state: SceneState,
    pub camera: Camera,
    pub camera_controller: CameraController,
    pub bindings: KeyBindings,
}

impl FrameLoop {
    pub fn new(config: &AppConfig, width: u32, height: u32) -> Self {
        Self {
            scene: config.scene.clone(),
            state: SceneState::new(&config.scene),
            camera: Camera::new(&config.camera, width, height),
            camera_controller: CameraController::new(&config.camera),
            bindings: KeyBindings::default(),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
    }

    /// Advance one frame
    pub fn update(&mut self, input: &mut InputState, dt: f32) -> FrameOutput {
        let exit_requested = input.poll_key(self.bindings.exit);

        // Ship animation
        let start_pressed = input.poll_key(self.bindings.start);
        if let Some(transition) = self.state.step(start_pressed) {
            log_transition(transition, &self.state);
        }

        // Camera from input
        let (dx, dy) = input.consume_look();
        self.camera_controller.apply_look(&mut self.camera, dx, dy);
        self.camera_controller
            .update_movement(&mut self.camera, input, &self.bindings, dt);

        let projection = self.camera.projection();
        let view = self.camera.view();

        let objects = build_model_matrices(&self.state, &self.scene).map(|(drawable, model)| ObjectTransform {
            drawable,
            model,
            mvp: mvp(projection, view, model),
        });

        FrameOutput {
            projection,
            view,
            objects,
            exit_requested,
        }
    }
}

fn log_transition(transition: Transition, state: &SceneState) {
    let [ship1, ship2] = &state.ships;
    match transition {
        Transition::Started => info!(
            "Ships departing (ship 1 at {:.1}, ship 2 at {:.1})",
            ship1.position, ship2.position
        ),
        Transition::Arrived => info!(
            "Ships arrived and turned (ship 1 at {:.1}, ship 2 at {:.1})",
            ship1.position, ship2.position
        ),
        Transition::Reset => info!("Ships reset to their home hangars"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::input::InputEvent;
    use crate::model::AnimationPhase;
    use winit::keyboard::KeyCode;

    fn frame_loop() -> FrameLoop {
        FrameLoop::new(&AppConfig::default(), 1024, 768)
    }

    #[test]
    fn test_update_yields_all_drawables_in_order() {
        let mut fl = frame_loop();
        let mut input = InputState::new();
        let out = fl.update(&mut input, 0.016);

        let order: Vec<Drawable> = out.objects.iter().map(|o| o.drawable).collect();
        assert_eq!(order, Drawable::ALL.to_vec());
        for object in &out.objects {
            assert_eq!(object.mvp, out.projection * out.view * object.model);
        }
        assert!(!out.exit_requested);
    }

    #[test]
    fn test_start_key_moves_ships() {
        let mut fl = frame_loop();
        let mut input = InputState::new();
        input.process_event(&InputEvent::KeyDown(KeyCode::Space));
        input.process_event(&InputEvent::KeyUp(KeyCode::Space));

        fl.update(&mut input, 0.016);
        assert_eq!(fl.state.phase(), AnimationPhase::Moving);
        for _ in 0..9 {
            fl.update(&mut input, 0.016);
        }
        assert_eq!(fl.state.ships[0].position, -295.0);
        assert_eq!(fl.state.ships[1].position, 295.0);
    }

    #[test]
    fn test_escape_requests_exit() {
        let mut fl = frame_loop();
        let mut input = InputState::new();
        input.process_event(&InputEvent::KeyDown(KeyCode::Escape));
        assert!(fl.update(&mut input, 0.016).exit_requested);
    }

    #[test]
    fn test_ship_transforms_track_state() {
        let mut fl = frame_loop();
        let mut input = InputState::new();
        input.process_event(&InputEvent::KeyDown(KeyCode::Space));
        let first = fl.update(&mut input, 0.016);
        let second = fl.update(&mut input, 0.016);

        // hangars are static, ships move
        assert_eq!(first.objects[0].model, second.objects[0].model);
        assert_eq!(first.objects[1].model, second.objects[1].model);
        assert_ne!(first.objects[2].model, second.objects[2].model);
        assert_ne!(first.objects[3].model, second.objects[3].model);
    }
}
