//! Pixel query results in the shape handed to the host runtime.

use crate::color::RgbColor;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Result of a pixel or mouse-color query.
///
/// A degraded read carries black and `has_error: true` instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelReport {
    pub x: i32,
    pub y: i32,
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub hex: String,
    pub has_error: bool,
}

/// How a successful color is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorFormat {
    /// `"#rrggbb"`
    #[default]
    Hex,
    /// `{ "r": .., "g": .., "b": .. }`
    Rgb,
}

impl ColorFormat {
    pub fn from_as_rgb(as_rgb: bool) -> Self {
        if as_rgb {
            ColorFormat::Rgb
        } else {
            ColorFormat::Hex
        }
    }
}

impl PixelReport {
    pub fn ok(x: i32, y: i32, color: RgbColor) -> Self {
        Self {
            x,
            y,
            r: color.r,
            g: color.g,
            b: color.b,
            hex: color.to_hex_string(),
            has_error: false,
        }
    }

    pub fn degraded(x: i32, y: i32) -> Self {
        Self {
            has_error: true,
            ..Self::ok(x, y, RgbColor::BLACK)
        }
    }

    pub fn color(&self) -> RgbColor {
        RgbColor::new(self.r, self.g, self.b)
    }

    /// Binding-boundary value: the requested format on success, the whole
    /// report (with `hasError`) when degraded.
    pub fn render(&self, format: ColorFormat) -> Value {
        if self.has_error {
            return serde_json::to_value(self).unwrap_or(Value::Null);
        }
        match format {
            ColorFormat::Hex => Value::String(self.hex.clone()),
            ColorFormat::Rgb => json!({ "r": self.r, "g": self.g, "b": self.b }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_report_shape() {
        let report = PixelReport::degraded(5, 5);
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({"x": 5, "y": 5, "r": 0, "g": 0, "b": 0, "hex": "#000000", "hasError": true})
        );
        assert_eq!(report.render(ColorFormat::Hex), serde_json::to_value(&report).unwrap());
        assert_eq!(report.render(ColorFormat::Rgb)["hasError"], true);
    }

    #[test]
    fn test_render_success() {
        let report = PixelReport::ok(1, 2, RgbColor::new(255, 16, 0));
        assert_eq!(report.render(ColorFormat::Hex), json!("#ff1000"));
        assert_eq!(report.render(ColorFormat::Rgb), json!({"r": 255, "g": 16, "b": 0}));
        assert_eq!(report.color(), RgbColor::new(255, 16, 0));
    }

    #[test]
    fn test_format_from_flag() {
        assert_eq!(ColorFormat::from_as_rgb(true), ColorFormat::Rgb);
        assert_eq!(ColorFormat::from_as_rgb(false), ColorFormat::Hex);
    }
}
