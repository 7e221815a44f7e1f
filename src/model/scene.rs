use glam::Vec3;

use crate::config::{SceneConfig, ShipPlacement};
use crate::model::mesh::MeshId;

/// The four drawable instances, in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Drawable {
    HangarA,
    HangarB,
    Ship1,
    Ship2,
}

impl Drawable {
    pub const ALL: [Drawable; 4] = [
        Drawable::HangarA,
        Drawable::HangarB,
        Drawable::Ship1,
        Drawable::Ship2,
    ];

    pub fn mesh(self) -> MeshId {
        match self {
            Drawable::HangarA | Drawable::HangarB => MeshId::Hangar,
            Drawable::Ship1 => MeshId::Torpedo,
            Drawable::Ship2 => MeshId::Bola,
        }
    }

    /// Index into per-object uniform slots
    pub fn slot(self) -> u32 {
        self as u32
    }

    /// Index into [`crate::model::SceneState::ships`]
    pub fn ship_index(self) -> Option<usize> {
        match self {
            Drawable::Ship1 => Some(0),
            Drawable::Ship2 => Some(1),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Drawable::HangarA => "hangar_a",
            Drawable::HangarB => "hangar_b",
            Drawable::Ship1 => "ship_1",
            Drawable::Ship2 => "ship_2",
        }
    }
}

impl SceneConfig {
    pub fn ship_placement(&self, ship_index: usize) -> &ShipPlacement {
        if ship_index == 0 {
            &self.ship1
        } else {
            &self.ship2
        }
    }

    /// `LightPositionHangar1`, inside hangar A (unscaled coordinates)
    pub fn hangar_a_light(&self) -> Vec3 {
        Vec3::new(-self.hangar_distance, self.hangar_light_height, 0.0)
    }

    /// `LightPositionHangar2`, inside hangar B (unscaled coordinates)
    pub fn hangar_b_light(&self) -> Vec3 {
        Vec3::new(self.hangar_distance, self.hangar_light_height, 0.0)
    }

    pub fn world_light(&self) -> Vec3 {
        Vec3::from_array(self.world_light)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hangars_share_one_mesh() {
        assert_eq!(Drawable::HangarA.mesh(), Drawable::HangarB.mesh());
        assert_ne!(Drawable::Ship1.mesh(), Drawable::Ship2.mesh());
    }

    #[test]
    fn test_slots_follow_draw_order() {
        for (i, drawable) in Drawable::ALL.iter().enumerate() {
            assert_eq!(drawable.slot() as usize, i);
        }
        assert_eq!(Drawable::HangarB.ship_index(), None);
        assert_eq!(Drawable::Ship2.ship_index(), Some(1));
    }

    #[test]
    fn test_lights_sit_inside_hangars() {
        let scene = SceneConfig::default();
        assert_eq!(scene.hangar_a_light(), Vec3::new(-300.0, 10.0, 0.0));
        assert_eq!(scene.hangar_b_light(), Vec3::new(300.0, 10.0, 0.0));
        assert_eq!(scene.world_light(), Vec3::ZERO);
    }
}
