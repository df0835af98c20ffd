//! Simulated surface that keeps frames in memory.

use crate::error::SurfaceError;
use crate::frame::{FrameBuffer, DEFAULT_PIXEL_COUNT};
use crate::surface::PixelSurface;

/// A surface with no hardware behind it.
///
/// Remembers the last flushed frame and how many flushes happened, which is
/// what tests and dry runs need to observe.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    frame: FrameBuffer,
    shown: Option<FrameBuffer>,
    flushes: u64,
}

impl MemorySurface {
    pub fn new(len: usize) -> Self {
        Self {
            frame: FrameBuffer::new(len),
            shown: None,
            flushes: 0,
        }
    }

    /// Number of successful `show` calls so far.
    pub fn flush_count(&self) -> u64 {
        self.flushes
    }

    /// The frame as of the last `show`, if any.
    pub fn last_shown(&self) -> Option<&FrameBuffer> {
        self.shown.as_ref()
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new(DEFAULT_PIXEL_COUNT)
    }
}

impl PixelSurface for MemorySurface {
    fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut FrameBuffer {
        &mut self.frame
    }

    fn flush(&mut self) -> Result<(), SurfaceError> {
        self.shown = Some(self.frame.clone());
        self.flushes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_records_frame() {
        let mut s = MemorySurface::new(4);
        s.set_rgb(2, 10, 20, 30).unwrap();
        s.show().unwrap();
        s.show().unwrap();
        assert_eq!(s.flush_count(), 2);
        let shown = s.last_shown().unwrap();
        assert_eq!(shown.pixel(2).unwrap().g, 20);
    }

    #[test]
    fn test_clear_keeps_brightness() {
        let mut s = MemorySurface::new(4);
        s.set_brightness(0.3);
        s.set_all(255, 255, 255, 1.0);
        s.clear();
        assert!(s.is_cleared());
        assert_eq!(s.brightness(), 0.3);
    }

    #[test]
    fn test_out_of_range() {
        let mut s = MemorySurface::new(16);
        let err = s.set_rgb(16, 1, 2, 3).unwrap_err();
        assert_eq!(err, SurfaceError::OutOfRange { index: 16, len: 16 });
    }
}
