use std::path::PathBuf;

/// Errors raised while reading an OBJ file into a [`crate::model::Mesh`].
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("failed to read mesh '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse mesh '{path}' at line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("mesh '{path}' has a face corner without a {attribute} index")]
    MissingAttribute {
        path: PathBuf,
        attribute: &'static str,
    },

    #[error("mesh '{path}' references {attribute} #{index} but only {len} exist")]
    IndexOutOfRange {
        path: PathBuf,
        attribute: &'static str,
        index: usize,
        len: usize,
    },

    #[error("mesh '{path}' contains no triangles")]
    Empty { path: PathBuf },
}

/// Errors raised while loading the TOML configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config value {field} = {value}: must be finite and greater than zero")]
    Invalid { field: &'static str, value: f32 },
}

#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("shader does not declare uniform '{0}'")]
    MissingUniform(&'static str),

    #[error("shader declares uniform '{later}' before '{earlier}'")]
    MemberOrder {
        earlier: &'static str,
        later: &'static str,
    },
}

/// Anything that can stop the application before its first frame.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to open window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface is not supported by the selected adapter")]
    UnsupportedSurface,

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Shader(#[from] ShaderError),
}
