//! Byte-stream driver.
//!
//! Each flush packs the frame into `3 × len` bytes (R, G, B per pixel, with
//! luminance and brightness already applied) and writes them in one go. Works
//! with anything that accepts bytes: a serial device, a FIFO read by a
//! hardware bridge, or stdout.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::error::SurfaceError;
use crate::frame::FrameBuffer;
use crate::surface::PixelSurface;

/// Surface that streams raw RGB frames to a writer.
pub struct StreamSurface<W: Write + Send> {
    frame: FrameBuffer,
    writer: W,
}

impl<W: Write + Send> StreamSurface<W> {
    pub fn new(writer: W, len: usize) -> Self {
        Self {
            frame: FrameBuffer::new(len),
            writer,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl StreamSurface<File> {
    /// Open a device node or FIFO for writing.
    pub fn open_device(path: &Path, len: usize) -> Result<Self, SurfaceError> {
        let file = OpenOptions::new().write(true).open(path).map_err(|e| {
            SurfaceError::Device(format!("open {}: {e}", path.display()))
        })?;
        debug!("Opened LED stream device {}", path.display());
        Ok(Self::new(file, len))
    }
}

/// Pack a frame into its wire representation.
pub fn pack_frame(frame: &FrameBuffer) -> Vec<u8> {
    let mut data = Vec::with_capacity(frame.len() * 3);
    for (r, g, b) in frame.scaled() {
        data.extend_from_slice(&[r, g, b]);
    }
    data
}

impl<W: Write + Send> PixelSurface for StreamSurface<W> {
    fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut FrameBuffer {
        &mut self.frame
    }

    fn flush(&mut self) -> Result<(), SurfaceError> {
        let data = pack_frame(&self.frame);
        self.writer.write_all(&data)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_layout() {
        let mut s = StreamSurface::new(Vec::new(), 3);
        s.set_pixel(0, 255, 0, 0, 1.0).unwrap();
        s.set_pixel(2, 0, 0, 200, 0.5).unwrap();
        s.show().unwrap();
        assert_eq!(s.get_ref().as_slice(), &[255, 0, 0, 0, 0, 0, 0, 0, 100]);
    }

    #[test]
    fn test_brightness_applied() {
        let mut s = StreamSurface::new(Vec::new(), 1);
        s.set_brightness(0.5);
        s.set_rgb(0, 255, 255, 255).unwrap();
        s.show().unwrap();
        assert_eq!(s.into_inner(), vec![127, 127, 127]);
    }

    #[test]
    fn test_every_show_writes_a_frame() {
        let mut s = StreamSurface::new(Vec::new(), 2);
        s.show().unwrap();
        s.show().unwrap();
        assert_eq!(s.get_ref().len(), 12);
    }
}
