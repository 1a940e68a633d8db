//! The native `Platform`: enigo for input, OS APIs for displays.

use crate::{display, dpi, keymap};
use enigo::{Axis, Button, Coordinate, Direction, Enigo, Keyboard, Mouse, Settings};
use puppet_core::{
    Bitmap, ChannelOrder, DisplayRecord, KeyCode, KeyFlags, MouseButton, Platform, PlatformError,
    PlatformResult, Point, Rect, Size,
};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

/// Real input injection and capture for the current OS.
pub struct NativePlatform {
    enigo: Mutex<Enigo>,
}

impl NativePlatform {
    pub fn new() -> PlatformResult<Self> {
        dpi::set_dpi_aware();
        let enigo = Enigo::new(&Settings::default()).map_err(|e| {
            PlatformError::InjectionFailed(format!("failed to create Enigo: {e}"))
        })?;
        Ok(Self {
            enigo: Mutex::new(enigo),
        })
    }

    fn enigo(&self) -> PlatformResult<MutexGuard<'_, Enigo>> {
        self.enigo
            .lock()
            .map_err(|_| PlatformError::InjectionFailed("input device lock poisoned".into()))
    }
}

fn injection(e: impl std::fmt::Display) -> PlatformError {
    PlatformError::InjectionFailed(e.to_string())
}

fn to_enigo_button(button: MouseButton) -> Button {
    match button {
        MouseButton::Left => Button::Left,
        MouseButton::Right => Button::Right,
        MouseButton::Middle => Button::Middle,
    }
}

fn direction(down: bool) -> Direction {
    if down {
        Direction::Press
    } else {
        Direction::Release
    }
}

impl Platform for NativePlatform {
    fn move_cursor_to(&self, point: Point) -> PlatformResult<()> {
        self.enigo()?
            .move_mouse(point.x, point.y, Coordinate::Abs)
            .map_err(injection)
    }

    fn cursor_position(&self) -> PlatformResult<Point> {
        let (x, y) = self.enigo()?.location().map_err(injection)?;
        Ok(Point::new(x, y))
    }

    fn post_button_event(&self, button: MouseButton, down: bool) -> PlatformResult<()> {
        debug!(?button, down, "injecting button");
        self.enigo()?
            .button(to_enigo_button(button), direction(down))
            .map_err(injection)
    }

    fn post_scroll(&self, dx: i32, dy: i32) -> PlatformResult<()> {
        debug!(dx, dy, "injecting scroll");
        let mut enigo = self.enigo()?;
        if dy != 0 {
            enigo.scroll(dy, Axis::Vertical).map_err(injection)?;
        }
        if dx != 0 {
            enigo.scroll(dx, Axis::Horizontal).map_err(injection)?;
        }
        Ok(())
    }

    fn post_key_event(&self, code: KeyCode, down: bool, flags: KeyFlags) -> PlatformResult<()> {
        let key = keymap::to_enigo(code)?;
        let modifiers = keymap::modifier_keys(flags);
        debug!(?code, down, ?flags, "injecting key");

        let mut enigo = self.enigo()?;
        if down {
            for m in &modifiers {
                enigo.key(*m, Direction::Press).map_err(injection)?;
            }
            enigo.key(key, Direction::Press).map_err(injection)?;
        } else {
            enigo.key(key, Direction::Release).map_err(injection)?;
            for m in modifiers.iter().rev() {
                enigo.key(*m, Direction::Release).map_err(injection)?;
            }
        }
        Ok(())
    }

    fn capture_rect(&self, rect: Rect) -> PlatformResult<Bitmap> {
        display::capture(rect).inspect_err(|e| warn!(?rect, error = %e, "capture failed"))
    }

    fn enumerate_displays(&self) -> PlatformResult<Vec<DisplayRecord>> {
        display::displays()
    }

    fn main_display_size(&self) -> PlatformResult<Size> {
        display::main_size()
    }

    fn primary_display_id(&self) -> PlatformResult<u32> {
        display::primary_id()
    }

    fn probe_display(&self) -> bool {
        display::probe()
    }

    fn refresh_metrics(&self) -> PlatformResult<()> {
        dpi::refresh();
        Ok(())
    }

    fn channel_order(&self) -> ChannelOrder {
        display::CHANNEL_ORDER
    }

    fn x_display_name(&self) -> PlatformResult<String> {
        display::display_name()
    }

    /// Reconnects the input device to `name` as well as the capture side.
    fn set_x_display_name(&self, name: &str) -> PlatformResult<()> {
        display::set_display_name(name)?;
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            let settings = Settings {
                x11_display: Some(name.to_string()),
                ..Settings::default()
            };
            let enigo = Enigo::new(&settings).map_err(|e| {
                PlatformError::InjectionFailed(format!("failed to open X display {name}: {e}"))
            })?;
            *self.enigo()? = enigo;
        }
        Ok(())
    }
}
