//! Pixel surface abstraction for small linear LED strips
//!
//! This crate is the only boundary between the effect engine and physical
//! LEDs. Any driver implementing [`PixelSurface`] can be substituted:
//!
//! - [`MemorySurface`] (simulated, for tests and dry runs)
//! - [`StreamSurface`] (raw RGB frames to a device node, FIFO or stdout)
//! - [`FailureGuard`] (wraps another surface, tolerates transient flush errors)

pub mod error;
pub mod frame;
pub mod guard;
pub mod memory;
pub mod stream;
pub mod surface;

pub use error::SurfaceError;
pub use frame::{
    clamp_channel, clamp_unit, FrameBuffer, Pixel, DEFAULT_BRIGHTNESS, DEFAULT_LUMINANCE,
    DEFAULT_PIXEL_COUNT,
};
pub use guard::{FailureGuard, DEFAULT_MAX_CONSECUTIVE_FAILURES};
pub use memory::MemorySurface;
pub use stream::{pack_frame, StreamSurface};
pub use surface::PixelSurface;
