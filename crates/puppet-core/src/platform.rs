//! Capability interface implemented once per operating system.
//!
//! The dispatcher only ever talks to a `Platform`; it never checks which OS it
//! runs on.

use crate::bitmap::{Bitmap, ChannelOrder};
use crate::geometry::{Point, Rect, Size};
use crate::keys::{KeyCode, KeyFlags, MouseButton};
use thiserror::Error;

/// Platform-level errors.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("not implemented")]
    NotImplemented,
    #[error("unsupported on this platform: {0}")]
    Unsupported(String),
    #[error("injection failed: {0}")]
    InjectionFailed(String),
    #[error("capture failed: {0}")]
    CaptureFailed(String),
    #[error("display enumeration failed: {0}")]
    EnumerationFailed(String),
}

/// Result type for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;

/// One display as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayRecord {
    pub id: u32,
    pub rect: Rect,
}

/// Native primitives consumed by the dispatcher.
pub trait Platform: Send + Sync {
    /// Warp the pointer to an absolute screen position.
    fn move_cursor_to(&self, point: Point) -> PlatformResult<()>;

    fn cursor_position(&self) -> PlatformResult<Point>;

    fn post_button_event(&self, button: MouseButton, down: bool) -> PlatformResult<()>;

    /// Positive `dy` scrolls down, positive `dx` scrolls right.
    fn post_scroll(&self, dx: i32, dy: i32) -> PlatformResult<()>;

    /// Post a key event. Modifiers in `flags` are pressed before a key-down and
    /// released after a key-up.
    fn post_key_event(&self, code: KeyCode, down: bool, flags: KeyFlags) -> PlatformResult<()>;

    /// Key and modifiers that produce `ch`.
    fn char_key(&self, ch: char) -> (KeyCode, KeyFlags) {
        (KeyCode::Char(ch), KeyFlags::NONE)
    }

    fn capture_rect(&self, rect: Rect) -> PlatformResult<Bitmap>;

    /// All active displays, in platform order. An empty list means no displays.
    fn enumerate_displays(&self) -> PlatformResult<Vec<DisplayRecord>>;

    fn main_display_size(&self) -> PlatformResult<Size>;

    fn primary_display_id(&self) -> PlatformResult<u32>;

    /// Whether the display connection can be opened right now.
    fn probe_display(&self) -> bool;

    /// Re-read DPI and display metrics.
    fn refresh_metrics(&self) -> PlatformResult<()> {
        Ok(())
    }

    /// Channel order of bitmaps this platform produces.
    fn channel_order(&self) -> ChannelOrder {
        ChannelOrder::Bgra
    }

    /// Name of the X display in use, e.g. `":0"`. X11 only.
    fn x_display_name(&self) -> PlatformResult<String> {
        Err(PlatformError::Unsupported("X display selection".into()))
    }

    /// Point later input, enumeration and capture at another X display.
    fn set_x_display_name(&self, _name: &str) -> PlatformResult<()> {
        Err(PlatformError::Unsupported("X display selection".into()))
    }
}
