/// Startup errors: everything that can stop the window from coming up.
/// Nothing in here is produced once a session is running.

use std::fmt;

#[derive(Debug)]
pub enum TermError {
    Io(std::io::Error),
    Font(String),
    Graphics(String),
    EventLoop(winit::error::EventLoopError),
}

impl fmt::Display for TermError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermError::Io(e) => write!(f, "IO error: {}", e),
            TermError::Font(msg) => write!(f, "Font error: {}", msg),
            TermError::Graphics(msg) => write!(f, "Graphics error: {}", msg),
            TermError::EventLoop(e) => write!(f, "Event loop error: {}", e),
        }
    }
}

impl std::error::Error for TermError {}

impl From<std::io::Error> for TermError {
    fn from(e: std::io::Error) -> Self {
        TermError::Io(e)
    }
}

impl From<winit::error::EventLoopError> for TermError {
    fn from(e: winit::error::EventLoopError) -> Self {
        TermError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for TermError {
    fn from(e: winit::error::OsError) -> Self {
        TermError::Graphics(format!("window creation failed: {}", e))
    }
}

impl From<wgpu::CreateSurfaceError> for TermError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        TermError::Graphics(e.to_string())
    }
}

impl From<wgpu::RequestDeviceError> for TermError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        TermError::Graphics(e.to_string())
    }
}
