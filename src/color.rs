// Color conversion utilities

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// RGB color tuple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels widened for surface writes.
    pub fn channels(self) -> (i32, i32, i32) {
        (self.r as i32, self.g as i32, self.b as i32)
    }

    /// Parse a color string: "#RRGGBB", "red", "green", etc.
    pub fn parse(s: &str) -> Option<Self> {
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() == 6 && hex.is_ascii() {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                return Some(Self::new(r, g, b));
            }
            return None;
        }
        match s.to_ascii_lowercase().as_str() {
            "black" | "off" => Some(Self::BLACK),
            "red" => Some(Self::new(255, 0, 0)),
            "green" => Some(Self::new(0, 255, 0)),
            "blue" => Some(Self::new(0, 0, 255)),
            "yellow" => Some(Self::new(255, 255, 0)),
            "cyan" => Some(Self::new(0, 255, 255)),
            "magenta" | "pink" => Some(Self::new(255, 0, 255)),
            "white" => Some(Self::new(255, 255, 255)),
            "orange" => Some(Self::new(255, 165, 0)),
            "purple" => Some(Self::new(128, 0, 255)),
            "lilac" => Some(Self::new(180, 150, 200)),
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// Config files may spell a color as "#RRGGBB", a name, or [r, g, b].
impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RgbRepr {
            Text(String),
            Triple([u8; 3]),
        }

        match RgbRepr::deserialize(d)? {
            RgbRepr::Text(s) => Rgb::parse(&s)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid color: {s}"))),
            RgbRepr::Triple([r, g, b]) => Ok(Rgb::new(r, g, b)),
        }
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_hex())
    }
}

/// Convert HSV to RGB
/// h: hue in turns (0-1, wraps)
/// s: saturation (0-1)
/// v: value/brightness (0-1)
///
/// Channels are scaled by 255 and truncated, not rounded.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);
    if s == 0.0 {
        return to_rgb(v, v, v);
    }

    let h = h.rem_euclid(1.0);
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match sector as u8 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    to_rgb(r, g, b)
}

fn to_rgb(r: f64, g: f64, b: f64) -> Rgb {
    Rgb {
        r: (r * 255.0) as u8,
        g: (g * 255.0) as u8,
        b: (b * 255.0) as u8,
    }
}
