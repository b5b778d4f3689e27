use std::fmt;
use std::path::PathBuf;

use crate::config::ConfigError;
use crate::model::ObjError;

/// Fatal start-up failures. Nothing here is recoverable: the caller logs the
/// error and exits with a non-zero status.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    EventLoop(winit::error::EventLoopError),
    Window(winit::error::OsError),
    Surface(wgpu::CreateSurfaceError),
    Adapter(wgpu::RequestAdapterError),
    Device(wgpu::RequestDeviceError),
    Mesh { path: PathBuf, source: ObjError },
    Texture { path: PathBuf, source: image::ImageError },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "invalid configuration: {e}"),
            AppError::EventLoop(e) => write!(f, "failed to run the event loop: {e}"),
            AppError::Window(e) => write!(f, "failed to open window: {e}"),
            AppError::Surface(e) => write!(f, "failed to create surface: {e}"),
            AppError::Adapter(e) => write!(f, "no suitable GPU adapter: {e}"),
            AppError::Device(e) => write!(f, "failed to request device: {e}"),
            AppError::Mesh { path, source } => {
                write!(f, "failed to load mesh {}: {source}", path.display())
            }
            AppError::Texture { path, source } => {
                write!(f, "failed to load texture {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(e) => Some(e),
            AppError::EventLoop(e) => Some(e),
            AppError::Window(e) => Some(e),
            AppError::Surface(e) => Some(e),
            AppError::Adapter(e) => Some(e),
            AppError::Device(e) => Some(e),
            AppError::Mesh { source, .. } => Some(source),
            AppError::Texture { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e)
    }
}

impl From<winit::error::EventLoopError> for AppError {
    fn from(e: winit::error::EventLoopError) -> Self {
        AppError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for AppError {
    fn from(e: winit::error::OsError) -> Self {
        AppError::Window(e)
    }
}

impl From<wgpu::CreateSurfaceError> for AppError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        AppError::Surface(e)
    }
}

impl From<wgpu::RequestAdapterError> for AppError {
    fn from(e: wgpu::RequestAdapterError) -> Self {
        AppError::Adapter(e)
    }
}

impl From<wgpu::RequestDeviceError> for AppError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        AppError::Device(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_mesh_error_names_path() {
        let err = AppError::Mesh {
            path: PathBuf::from("assets/objects/sphere.obj"),
            source: ObjError::Parse { line: 7, message: "invalid number 'x'".into() },
        };
        let text = err.to_string();
        assert!(text.contains("sphere.obj"));
        assert!(text.contains("line 7"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_config_error_converts() {
        let err: AppError = ConfigError::RestitutionOutOfRange(2.0).into();
        assert!(err.to_string().starts_with("invalid configuration"));
    }
}
