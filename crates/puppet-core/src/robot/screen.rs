//! Screen reads: pixel color, capture, display enumeration.
//!
//! All of these pass through the resource coordinator. Single-pixel reads
//! degrade to a black `PixelReport` with `has_error` set; bulk capture and
//! enumeration surface the failure instead.

use super::Robot;
use crate::bitmap::{Bitmap, BitmapDescriptor};
use crate::color::RgbColor;
use crate::error::{ArgumentError, Error, Result};
use crate::geometry::{Point, Rect};
use crate::platform::{Platform, PlatformError};
use crate::report::{ColorFormat, PixelReport};
use crate::screens::{ScreenEnumerator, ScreenInfo, ScreenSize};
use crate::validate::{check, safe_get_pixel};
use serde_json::Value;
use tracing::{debug, warn};

impl<P: Platform> Robot<P> {
    /// Current pointer position.
    pub fn mouse_position(&self) -> Result<Point> {
        let _guard = self.gate()?;
        Ok(self.platform.cursor_position()?)
    }

    /// Color of the pixel at `(x, y)`. Never fails; see [`PixelReport`].
    pub fn pixel_color(&self, x: i32, y: i32) -> PixelReport {
        let Ok(_guard) = self.coordinator.begin() else {
            return PixelReport::degraded(x, y);
        };
        self.read_pixel(Point::new(x, y))
    }

    /// `pixel_color` rendered for the host: a hex string, an `{r, g, b}`
    /// object, or the full report when the read degraded.
    pub fn get_pixel_color(&self, x: i32, y: i32, as_rgb: bool) -> Value {
        self.pixel_color(x, y).render(ColorFormat::from_as_rgb(as_rgb))
    }

    /// Whether the pixel at `(x, y)` is within `tolerance` of `expected`.
    /// A degraded read never matches.
    pub fn pixel_matches(&self, x: i32, y: i32, expected: RgbColor, tolerance: u32) -> bool {
        let report = self.pixel_color(x, y);
        !report.has_error && report.color().matches(&expected, tolerance)
    }

    /// Color under the pointer.
    pub fn mouse_color(&self) -> PixelReport {
        let Ok(_guard) = self.coordinator.begin() else {
            return PixelReport::degraded(0, 0);
        };
        let pos = match self.platform.cursor_position() {
            Ok(pos) => pos,
            Err(e) => {
                warn!(error = %e, "cursor query failed");
                return PixelReport::degraded(0, 0);
            }
        };
        if pos.x < 0 || pos.y < 0 {
            return PixelReport::degraded(pos.x, pos.y);
        }
        // Teardown may have started while the cursor was queried.
        if !self.coordinator.is_valid() {
            return PixelReport::degraded(pos.x, pos.y);
        }
        self.read_pixel(pos)
    }

    /// Capture `rect`, or the main display when `None`.
    pub fn capture_screen(&self, rect: Option<Rect>) -> Result<BitmapDescriptor> {
        let _guard = self.gate()?;
        let rect = match rect {
            Some(rect) => rect,
            None => Rect {
                origin: Point::new(0, 0),
                size: self.platform.main_display_size()?,
            },
        };
        if rect.size.is_empty() {
            return Err(ArgumentError::OutOfRange {
                name: "size",
                value: format!("{}x{}", rect.width(), rect.height()),
            }
            .into());
        }

        let bitmap = self.platform.capture_rect(rect)?;
        if let Err(reason) = check(&bitmap, self.settings.pixel_format) {
            warn!(?rect, %reason, "captured bitmap rejected");
            return Err(PlatformError::CaptureFailed(reason.to_string()).into());
        }
        debug!(?rect, "captured screen");
        Ok(bitmap.to_descriptor())
    }

    /// Hex color of `(x, y)` in a caller-supplied bitmap. No native call.
    pub fn get_color_from_supplied_bitmap(
        &self,
        descriptor: &BitmapDescriptor,
        x: i32,
        y: i32,
    ) -> Result<String> {
        let bitmap = Bitmap::from_descriptor(descriptor, self.platform.channel_order());
        check(&bitmap, self.settings.pixel_format).map_err(|reason| ArgumentError::Invalid {
            name: "bitmap",
            reason: reason.to_string(),
        })?;
        if !bitmap.contains(x, y) {
            return Err(ArgumentError::OutOfRange {
                name: "coordinates",
                value: format!("({x}, {y}) outside {}x{}", bitmap.width, bitmap.height),
            }
            .into());
        }
        Ok(safe_get_pixel(&bitmap, x, y, self.settings.pixel_format).to_hex_string())
    }

    /// Every display with its id and primary flag.
    pub fn list_screens(&self) -> Result<Vec<ScreenInfo>> {
        let _guard = self.gate()?;
        Ok(ScreenEnumerator::new(&self.platform).info_with_ids()?)
    }

    /// Size of screen `index` (1-based); `0` or `None` for the virtual screen.
    pub fn screen_size(&self, index: Option<i64>) -> Result<ScreenSize> {
        let _guard = self.gate()?;
        let lookup = ScreenEnumerator::new(&self.platform).screen_size(index.unwrap_or(0))?;
        lookup.map_err(Error::from)
    }

    pub fn screen_count(&self) -> Result<usize> {
        let _guard = self.gate()?;
        Ok(ScreenEnumerator::new(&self.platform).count()?)
    }

    pub fn main_display_id(&self) -> Result<u32> {
        let _guard = self.gate()?;
        Ok(ScreenEnumerator::new(&self.platform).main_display_id()?)
    }

    /// Capture a 1x1 rect and decode it; caller holds the operation guard.
    fn read_pixel(&self, at: Point) -> PixelReport {
        let bitmap = match self.platform.capture_rect(Rect::new(at.x, at.y, 1, 1)) {
            Ok(bitmap) => bitmap,
            Err(e) => {
                warn!(x = at.x, y = at.y, error = %e, "pixel capture failed");
                return PixelReport::degraded(at.x, at.y);
            }
        };
        if let Err(reason) = check(&bitmap, self.settings.pixel_format) {
            debug!(x = at.x, y = at.y, %reason, "pixel bitmap rejected");
            return PixelReport::degraded(at.x, at.y);
        }
        let color = safe_get_pixel(&bitmap, 0, 0, self.settings.pixel_format);
        PixelReport::ok(at.x, at.y, color)
    }
}
