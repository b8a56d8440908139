//! Error types for Tinsel.
//!
//! GPU initialization, configuration loading, attribute assembly and the
//! viewer loop each get their own error type. Rendering itself has no
//! recoverable errors beyond surface loss, which the viewer handles in place.

use std::fmt;

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur while loading or saving a [`SceneConfig`](crate::SceneConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read or write the file.
    Io(std::io::Error),
    /// The file is not valid TOML for the config schema.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to access config file: {}", e),
            ConfigError::Parse(msg) => write!(f, "Invalid scene config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

/// Errors raised when assembling a particle attribute set by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeError {
    /// One attribute array does not share the length of the scatter array.
    LengthMismatch {
        /// Name of the offending attribute.
        field: &'static str,
        /// Length of the scatter position array.
        expected: usize,
        /// Length that was provided.
        actual: usize,
    },
}

impl fmt::Display for AttributeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeError::LengthMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "Attribute `{}` has {} entries but the set holds {} particles",
                field, actual, expected
            ),
        }
    }
}

impl std::error::Error for AttributeError {}

/// Errors that can occur when running the scene viewer.
#[derive(Debug)]
pub enum SceneError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// Configuration could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            SceneError::Window(e) => write!(f, "Failed to create window: {}", e),
            SceneError::Gpu(e) => write!(f, "GPU error: {}", e),
            SceneError::Config(e) => write!(f, "Config error: {}", e),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::EventLoop(e) => Some(e),
            SceneError::Window(e) => Some(e),
            SceneError::Gpu(e) => Some(e),
            SceneError::Config(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for SceneError {
    fn from(e: winit::error::EventLoopError) -> Self {
        SceneError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for SceneError {
    fn from(e: winit::error::OsError) -> Self {
        SceneError::Window(e)
    }
}

impl From<GpuError> for SceneError {
    fn from(e: GpuError) -> Self {
        SceneError::Gpu(e)
    }
}

impl From<ConfigError> for SceneError {
    fn from(e: ConfigError) -> Self {
        SceneError::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_message() {
        let err = AttributeError::LengthMismatch {
            field: "seed",
            expected: 4,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "Attribute `seed` has 3 entries but the set holds 4 particles"
        );
    }

    #[test]
    fn test_scene_error_source_chain() {
        let err = SceneError::from(GpuError::NoAdapter);
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source, Some(GpuError::NoAdapter.to_string()));
    }
}
