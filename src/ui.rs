use egui::Context;

use crate::model::{AnimationPhase, Camera, SceneState, ShipAnimation};

const CONTROLS: [&str; 4] = [
    "Space - Start / reset ships",
    "Arrows / WASD - Move",
    "Mouse - Look",
    "Esc - Quit",
];

/// Frames per second, averaged over one-second windows
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    frame_count: u32,
    timer: f32,
    fps: f32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, dt: f32) {
        self.frame_count += 1;
        self.timer += dt;
        if self.timer >= 1.0 {
            self.fps = self.frame_count as f32 / self.timer;
            self.frame_count = 0;
            self.timer = 0.0;
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

pub fn phase_label(phase: AnimationPhase) -> &'static str {
    match phase {
        AnimationPhase::Idle => "Idle (press Space)",
        AnimationPhase::Moving => "Moving",
        AnimationPhase::Arrived => "Arrived (press Space to reset)",
    }
}

fn ship_line(index: usize, ship: &ShipAnimation) -> String {
    format!(
        "Ship {}: x {:.1} {} from {:.0}{}",
        index + 1,
        ship.position,
        if ship.heading() > 0.0 { "->" } else { "<-" },
        ship.start(),
        if ship.rotated { " (turned)" } else { "" }
    )
}

/// Overlay with FPS, ship state and controls
pub fn draw_hud(ctx: &Context, fps: f32, state: &SceneState, camera: &Camera) {
    egui::Window::new("Naves")
        .default_pos([8.0, 8.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(format!("FPS: {:.0}", fps)).small());
            ui.label(egui::RichText::new(format!("Phase: {}", phase_label(state.phase()))).small());
            ui.label(egui::RichText::new(format!("Speed: {:.2} / frame", state.step_distance())).small());
            for (i, ship) in state.ships.iter().enumerate() {
                ui.label(egui::RichText::new(ship_line(i, ship)).small());
            }
            let eye = camera.eye;
            ui.label(egui::RichText::new(format!("Camera: {:.1}, {:.1}, {:.1}", eye.x, eye.y, eye.z)).small());
            ui.separator();
            ui.label(egui::RichText::new("Controls:").small());
            for line in CONTROLS {
                ui.label(egui::RichText::new(line).small());
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_counter_updates_every_second() {
        let mut counter = FpsCounter::new();
        for _ in 0..59 {
            counter.tick(1.0 / 60.0);
        }
        assert_eq!(counter.fps(), 0.0);
        counter.tick(1.0 / 60.0 + 0.001);
        assert!((counter.fps() - 60.0).abs() < 0.5);
    }

    #[test]
    fn test_ship_line_marks_turned_ships() {
        let mut ship = ShipAnimation::new(1.0, 300.0);
        assert_eq!(ship_line(0, &ship), "Ship 1: x -300.0 -> from -300");
        ship.rotated = true;
        ship.position = 300.0;
        assert_eq!(ship_line(0, &ship), "Ship 1: x 300.0 -> from -300 (turned)");

        let ship = ShipAnimation::new(-1.0, 300.0);
        assert_eq!(ship_line(1, &ship), "Ship 2: x 300.0 <- from 300");
    }

    #[test]
    fn test_hud_runs_headless() {
        let ctx = Context::default();
        let state = SceneState::new(&crate::config::SceneConfig::default());
        let camera = Camera::new(&crate::config::CameraConfig::default(), 1024, 768);
        for _ in 0..2 {
            let _ = ctx.run(egui::RawInput::default(), |ctx| draw_hud(ctx, 60.0, &state, &camera));
        }
        assert_eq!(phase_label(state.phase()), "Idle (press Space)");
    }
}
