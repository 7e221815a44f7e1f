//! Model matrices for the four drawables.
//!
//! Every matrix is composed left to right from identity: scale, then
//! translate, then rotate (`M = S * T * R`). The translation is therefore
//! scaled as well, so an object placed at `x = -300` with scale `0.1` ends up
//! at `x = -30` in world space.

use glam::{Mat4, Vec3};

use crate::config::SceneConfig;
use crate::model::animation::SceneState;
use crate::model::scene::Drawable;

const HALF_TURN: f32 = std::f32::consts::PI;

pub fn model_matrix(drawable: Drawable, state: &SceneState, scene: &SceneConfig) -> Mat4 {
    let mut model = Mat4::IDENTITY;
    model *= Mat4::from_scale(Vec3::splat(scene.uniform_scale));

    match drawable {
        Drawable::HangarA => {
            model *= Mat4::from_translation(Vec3::new(-scene.hangar_distance, 0.0, 0.0));
        }
        Drawable::HangarB => {
            model *= Mat4::from_translation(Vec3::new(scene.hangar_distance, 0.0, 0.0));
            model *= Mat4::from_rotation_y(HALF_TURN);
        }
        Drawable::Ship1 | Drawable::Ship2 => {
            let index = drawable.ship_index().unwrap_or_default();
            let ship = &state.ships[index];
            let placement = scene.ship_placement(index);

            model *= Mat4::from_translation(Vec3::new(ship.position, placement.height, placement.depth));
            if placement.base_yaw_degrees != 0.0 {
                model *= Mat4::from_rotation_y(placement.base_yaw_degrees.to_radians());
            }
            // turn around once arrived
            if ship.rotated {
                model *= Mat4::from_rotation_y(HALF_TURN);
            }
        }
    }

    model
}

/// Model matrices for all drawables, in draw order.
pub fn build_model_matrices(state: &SceneState, scene: &SceneConfig) -> [(Drawable, Mat4); 4] {
    Drawable::ALL.map(|drawable| (drawable, model_matrix(drawable, state, scene)))
}

pub fn mvp(projection: Mat4, view: Mat4, model: Mat4) -> Mat4 {
    projection * view * model
}
