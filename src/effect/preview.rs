//! Terminal preview surface using crossterm.
//!
//! Renders the strip as one row of true-color cells, redrawn in place on
//! every flush. Pixels are shown after global brightness and luminance
//! scaling, the way a physical strip would show them.

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor,
    style::{self, Color, Stylize},
    terminal, QueueableCommand,
};
use ledreaccs_surface::{FrameBuffer, PixelSurface, SurfaceError};

/// Width of each pixel cell in characters.
const CELL_W: usize = 3;
/// Outline for pixels that are off.
const DIM: Color = Color::Rgb {
    r: 40,
    g: 40,
    b: 40,
};

/// A `PixelSurface` drawn into a terminal.
pub struct TerminalSurface<W: Write + Send = Stdout> {
    out: W,
    frame: FrameBuffer,
    label: String,
    frames: u64,
}

impl TerminalSurface<Stdout> {
    /// Preview on stdout.
    pub fn stdout(len: usize) -> Self {
        Self::new(io::stdout(), len)
    }
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(out: W, len: usize) -> Self {
        Self {
            out,
            frame: FrameBuffer::new(len),
            label: String::new(),
            frames: 0,
        }
    }

    /// Text shown after the pixel row, e.g. the effect being played.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    fn draw(&mut self) -> io::Result<()> {
        self.out.queue(cursor::MoveToColumn(0))?;
        for (r, g, b) in self.frame.scaled() {
            let cell = " ".repeat(CELL_W);
            let content = if (r, g, b) == (0, 0, 0) {
                cell.on(DIM)
            } else {
                cell.on(Color::Rgb { r, g, b })
            };
            self.out.queue(style::PrintStyledContent(content))?;
            self.out.queue(style::Print(" "))?;
        }
        self.out.queue(style::PrintStyledContent(
            format!(" {:3.0}% {}", self.frame.brightness() * 100.0, self.label).with(Color::Grey),
        ))?;
        self.out
            .queue(terminal::Clear(terminal::ClearType::UntilNewLine))?;
        self.out.flush()
    }
}

impl<W: Write + Send> PixelSurface for TerminalSurface<W> {
    fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut FrameBuffer {
        &mut self.frame
    }

    fn flush(&mut self) -> Result<(), SurfaceError> {
        self.draw()?;
        self.frames += 1;
        Ok(())
    }
}

impl<W: Write + Send> Drop for TerminalSurface<W> {
    fn drop(&mut self) {
        if self.frames > 0 {
            let _ = self.out.write_all(b"\n");
            let _ = self.out.flush();
        }
    }
}
