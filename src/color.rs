//! RGB colors as exchanged with the UI (`#rrggbb` strings).
//!
//! The UI color picker and the default shape colors are hex strings; the
//! renderer wants float channels it can interpolate. [`Rgb`] is both.

use crate::error::ColorError;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// RGB color with channels in the 0.0-1.0 range.
///
/// Serializes as a lowercase `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Create a new color from float channels (0.0-1.0).
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create from a hex integer (0xRRGGBB).
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
        }
    }

    /// Convert to a hex integer, rounding each channel to the nearest byte.
    pub fn to_hex(&self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Linear interpolation toward `target`.
    ///
    /// `t` is not clamped here; callers decide whether overshoot is allowed.
    #[inline]
    pub fn lerp(&self, target: &Rgb, t: f32) -> Self {
        Self {
            r: self.r + (target.r - self.r) * t,
            g: self.g + (target.g - self.g) * t,
            b: self.b + (target.b - self.b) * t,
        }
    }

    #[inline]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    /// Parse `#rrggbb` or the short `#rgb` form. The leading `#` is optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::Format(s.to_string()));
        }

        let hex = match digits.len() {
            6 => u32::from_str_radix(digits, 16).map_err(|_| ColorError::Format(s.to_string()))?,
            3 => {
                let short = u32::from_str_radix(digits, 16)
                    .map_err(|_| ColorError::Format(s.to_string()))?;
                let (r, g, b) = ((short >> 8) & 0xF, (short >> 4) & 0xF, short & 0xF);
                ((r * 0x11) << 16) | ((g * 0x11) << 8) | (b * 0x11)
            }
            _ => return Err(ColorError::Format(s.to_string())),
        };

        Ok(Rgb::from_hex(hex))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_string()
    }
}
