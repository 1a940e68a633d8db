//! RGB color values and their packed hex form.
//!
//! Provides:
//! - `RgbColor` with channel-wise comparison helpers
//! - `RgbHex`, the packed `0xRRGGBB` integer used by the pixel model
//! - `#rrggbb` rendering for the binding boundary

use serde::{Deserialize, Serialize};

/// RGB color value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Packed color: the lower 24 bits hold red, green and blue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RgbHex(pub u32);

impl RgbColor {
    pub const BLACK: RgbColor = RgbColor { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pack into `0xRRGGBB`.
    pub const fn to_hex(self) -> RgbHex {
        RgbHex(((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32)
    }

    /// Render as `#rrggbb` (lowercase, zero padded).
    pub fn to_hex_string(self) -> String {
        self.to_hex().to_string()
    }

    /// Create color from hex string (e.g., "#ff0000" or "FF0000").
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Self { r, g, b })
    }

    /// Sum of absolute per-channel differences.
    pub fn difference(&self, other: &RgbColor) -> u32 {
        let dr = (self.r as i32 - other.r as i32).unsigned_abs();
        let dg = (self.g as i32 - other.g as i32).unsigned_abs();
        let db = (self.b as i32 - other.b as i32).unsigned_abs();
        dr + dg + db
    }

    /// Check if this color matches another within a tolerance.
    /// Tolerance is the maximum allowed sum of channel differences.
    pub fn matches(&self, other: &RgbColor, tolerance: u32) -> bool {
        self.difference(other) <= tolerance
    }
}

impl RgbHex {
    /// Unpack into channels. Bits above the lower 24 are ignored.
    pub const fn to_rgb(self) -> RgbColor {
        RgbColor {
            r: ((self.0 >> 16) & 0xFF) as u8,
            g: ((self.0 >> 8) & 0xFF) as u8,
            b: (self.0 & 0xFF) as u8,
        }
    }
}

impl From<RgbColor> for RgbHex {
    fn from(color: RgbColor) -> Self {
        color.to_hex()
    }
}

impl From<RgbHex> for RgbColor {
    fn from(hex: RgbHex) -> Self {
        hex.to_rgb()
    }
}

impl std::fmt::Display for RgbHex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06x}", self.0 & 0x00FF_FFFF)
    }
}

impl std::fmt::Display for RgbColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.to_hex(), f)
    }
}
