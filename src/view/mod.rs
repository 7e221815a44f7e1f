// VIEW: Rendering and graphics
pub mod buffers;
pub mod gpu_init;
pub mod render;
pub mod submit;
pub mod uniforms;

pub use buffers::{GpuBufferSet, GpuMeshStore};
pub use gpu_init::GpuContext;
pub use render::SceneRenderer;
pub use submit::RenderSubmitter;
pub use uniforms::{UniformName, UniformTable};
