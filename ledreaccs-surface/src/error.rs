//! Surface error types

use thiserror::Error;

/// Errors that can occur while writing to a pixel surface
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// Pixel index outside `[0, len)`
    #[error("Pixel index {index} out of range (strip has {len} pixels)")]
    OutOfRange { index: usize, len: usize },

    /// Hardware I/O failure while flushing a frame
    #[error("Device error: {0}")]
    Device(String),
}

impl From<std::io::Error> for SurfaceError {
    fn from(e: std::io::Error) -> Self {
        SurfaceError::Device(e.to_string())
    }
}
