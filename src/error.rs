//! Error types for the reaction engine

use ledreaccs_surface::SurfaceError;
use thiserror::Error;

/// Errors surfaced to callers of the registry, configuration and controller.
///
/// Failures inside a running effect are not in here: the controller logs them
/// and reports them in the playback report instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Effect name not present in the registry
    #[error("Unknown effect: {0}")]
    UnknownEffect(String),

    /// Unmapped event, malformed override, or invalid configuration file
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Surface setup failure (opening a device, etc.)
    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
