//! In-memory frame state shared by every surface implementation.
//!
//! A frame is an ordered row of pixel slots plus one global brightness
//! scalar. Every write is clamped here, so drivers only ever see values in
//! their valid ranges.

/// Number of pixels on a Pimoroni LED SHIM.
pub const DEFAULT_PIXEL_COUNT: usize = 16;

/// Luminance used by `set_rgb` when the caller does not pass one.
pub const DEFAULT_LUMINANCE: f32 = 1.0;

/// Global brightness of a freshly created surface.
pub const DEFAULT_BRIGHTNESS: f32 = 1.0;

/// One pixel slot: color plus per-pixel luminance.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub luminance: f32,
}

impl Pixel {
    pub const OFF: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        luminance: 0.0,
    };

    /// Build a pixel from unclamped inputs.
    pub fn clamped(r: i32, g: i32, b: i32, luminance: f32) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
            luminance: clamp_unit(luminance),
        }
    }

    pub fn is_off(&self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0 && self.luminance == 0.0
    }

    /// Channel values after applying luminance and global brightness.
    ///
    /// Truncates, never rounds: full white at brightness 0.5 is 127.
    pub fn scaled(&self, brightness: f32) -> (u8, u8, u8) {
        let f = self.luminance * clamp_unit(brightness);
        (
            (self.r as f32 * f) as u8,
            (self.g as f32 * f) as u8,
            (self.b as f32 * f) as u8,
        )
    }
}

/// Clamp a color channel to `0..=255`.
pub fn clamp_channel(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Clamp a luminance or brightness to `[0.0, 1.0]`. NaN maps to 0.
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Pixel slots plus global brightness.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    pixels: Vec<Pixel>,
    brightness: f32,
}

impl FrameBuffer {
    /// Create a cleared frame with `len` pixels.
    pub fn new(len: usize) -> Self {
        Self {
            pixels: vec![Pixel::OFF; len],
            brightness: DEFAULT_BRIGHTNESS,
        }
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixel(&self, index: usize) -> Option<Pixel> {
        self.pixels.get(index).copied()
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    /// Returns `false` if `index` is out of range; the slot is untouched.
    pub(crate) fn set(&mut self, index: usize, pixel: Pixel) -> bool {
        match self.pixels.get_mut(index) {
            Some(slot) => {
                *slot = pixel;
                true
            }
            None => false,
        }
    }

    pub(crate) fn fill(&mut self, pixel: Pixel) {
        self.pixels.fill(pixel);
    }

    pub(crate) fn set_brightness(&mut self, level: f32) {
        self.brightness = clamp_unit(level);
    }

    /// True when every slot is (0, 0, 0, 0.0).
    pub fn is_cleared(&self) -> bool {
        self.pixels.iter().all(Pixel::is_off)
    }

    /// Hardware-ready RGB values, one tuple per pixel.
    pub fn scaled(&self) -> Vec<(u8, u8, u8)> {
        self.pixels
            .iter()
            .map(|p| p.scaled(self.brightness))
            .collect()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_PIXEL_COUNT)
    }
}
