//! The `PixelSurface` contract.
//!
//! Implementors only provide frame storage and `flush`; every drawing
//! operation is a provided method so clamping and range checks behave
//! identically across drivers.

use crate::error::SurfaceError;
use crate::frame::{FrameBuffer, Pixel, DEFAULT_LUMINANCE};

/// A linear strip of pixels backed by some output device.
pub trait PixelSurface: Send {
    /// Current in-memory frame.
    fn frame(&self) -> &FrameBuffer;

    /// Mutable access to the in-memory frame.
    fn frame_mut(&mut self) -> &mut FrameBuffer;

    /// Push the current frame to the device.
    fn flush(&mut self) -> Result<(), SurfaceError>;

    /// Number of pixel slots.
    fn len(&self) -> usize {
        self.frame().len()
    }

    fn is_empty(&self) -> bool {
        self.frame().is_empty()
    }

    /// Set one pixel. Channels are clamped to `0..=255`, luminance to `[0, 1]`.
    fn set_pixel(
        &mut self,
        index: usize,
        r: i32,
        g: i32,
        b: i32,
        luminance: f32,
    ) -> Result<(), SurfaceError> {
        let len = self.len();
        if self
            .frame_mut()
            .set(index, Pixel::clamped(r, g, b, luminance))
        {
            Ok(())
        } else {
            Err(SurfaceError::OutOfRange { index, len })
        }
    }

    /// Set one pixel at the default luminance.
    fn set_rgb(&mut self, index: usize, r: i32, g: i32, b: i32) -> Result<(), SurfaceError> {
        self.set_pixel(index, r, g, b, DEFAULT_LUMINANCE)
    }

    /// Set every pixel to the same value.
    fn set_all(&mut self, r: i32, g: i32, b: i32, luminance: f32) {
        self.frame_mut().fill(Pixel::clamped(r, g, b, luminance));
    }

    /// Turn every pixel off. Global brightness is left unchanged.
    fn clear(&mut self) {
        self.frame_mut().fill(Pixel::OFF);
    }

    /// Set the global brightness multiplier, clamped to `[0, 1]`.
    fn set_brightness(&mut self, level: f32) {
        self.frame_mut().set_brightness(level);
    }

    /// Flush the in-memory frame. Safe to call repeatedly with unchanged state.
    fn show(&mut self) -> Result<(), SurfaceError> {
        self.flush()
    }

    fn pixel(&self, index: usize) -> Option<Pixel> {
        self.frame().pixel(index)
    }

    fn brightness(&self) -> f32 {
        self.frame().brightness()
    }

    fn is_cleared(&self) -> bool {
        self.frame().is_cleared()
    }
}

impl<S: PixelSurface + ?Sized> PixelSurface for Box<S> {
    fn frame(&self) -> &FrameBuffer {
        (**self).frame()
    }

    fn frame_mut(&mut self) -> &mut FrameBuffer {
        (**self).frame_mut()
    }

    fn flush(&mut self) -> Result<(), SurfaceError> {
        (**self).flush()
    }
}
