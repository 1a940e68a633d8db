//! Headless platform: accepts input, has no displays.

use puppet_core::{
    Bitmap, DisplayRecord, KeyCode, KeyFlags, MouseButton, Platform, PlatformError,
    PlatformResult, Point, Rect, Size,
};
use std::sync::Mutex;
use tracing::debug;

/// Minimal no-op platform for headless runs and testing.
///
/// Input calls are logged and dropped; the cursor position is remembered so
/// smooth moves still have a start point. The display probe fails, so a
/// `Robot` over this platform never reaches `Valid`.
#[derive(Default)]
pub struct NoopPlatform {
    cursor: Mutex<Point>,
}

impl Platform for NoopPlatform {
    fn move_cursor_to(&self, point: Point) -> PlatformResult<()> {
        debug!(?point, "NoopPlatform: would move cursor");
        if let Ok(mut cursor) = self.cursor.lock() {
            *cursor = point;
        }
        Ok(())
    }

    fn cursor_position(&self) -> PlatformResult<Point> {
        Ok(self.cursor.lock().map(|p| *p).unwrap_or_default())
    }

    fn post_button_event(&self, button: MouseButton, down: bool) -> PlatformResult<()> {
        debug!(?button, down, "NoopPlatform: would post button");
        Ok(())
    }

    fn post_scroll(&self, dx: i32, dy: i32) -> PlatformResult<()> {
        debug!(dx, dy, "NoopPlatform: would scroll");
        Ok(())
    }

    fn post_key_event(&self, code: KeyCode, down: bool, flags: KeyFlags) -> PlatformResult<()> {
        debug!(?code, down, ?flags, "NoopPlatform: would post key");
        Ok(())
    }

    fn capture_rect(&self, _rect: Rect) -> PlatformResult<Bitmap> {
        Err(PlatformError::Unsupported("headless platform has no display".into()))
    }

    fn enumerate_displays(&self) -> PlatformResult<Vec<DisplayRecord>> {
        Ok(Vec::new())
    }

    fn main_display_size(&self) -> PlatformResult<Size> {
        Err(PlatformError::Unsupported("headless platform has no display".into()))
    }

    fn primary_display_id(&self) -> PlatformResult<u32> {
        Err(PlatformError::Unsupported("headless platform has no display".into()))
    }

    fn probe_display(&self) -> bool {
        false
    }
}
