// MODEL: Scene data, animation state and transforms
pub mod animation;
pub mod camera;
pub mod mesh;
pub mod scene;
pub mod transform;

pub use animation::{AnimationPhase, SceneState, ShipAnimation, Transition};
pub use camera::Camera;
pub use mesh::{Mesh, MeshId, MeshStore};
pub use scene::Drawable;
