//! Mouse and keyboard commands.
//!
//! Every command resolves and validates all of its arguments before the
//! first platform call, so a bad argument never leaves a half-applied action.

use super::Robot;
use crate::error::{ArgumentError, Result};
use crate::geometry::Point;
use crate::keys::{
    resolve_button, resolve_flags_value, resolve_key, resolve_toggle_state, KeyCode, KeyFlags,
    MouseButton,
};
use crate::path::{synthesize_path, Speed};
use crate::platform::Platform;
use serde_json::Value;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::debug;

impl<P: Platform> Robot<P> {
    /// Warp the pointer to `(x, y)` in one step.
    pub fn move_to(&self, x: i32, y: i32) -> Result<()> {
        self.platform.move_cursor_to(Point::new(x, y))?;
        self.pause(self.mouse_delay());
        Ok(())
    }

    /// Move the pointer along a synthesized path, sleeping between steps.
    pub fn move_smooth(&self, x: i32, y: i32, speed: Option<f64>) -> Result<()> {
        let speed = self.resolve_speed(speed)?;
        self.travel(Point::new(x, y), speed)?;
        self.pause(self.mouse_delay());
        Ok(())
    }

    /// Press `button` (unless already held), move smoothly to `(x, y)`, release.
    ///
    /// The button is released even when the move fails part way.
    pub fn drag(&self, x: i32, y: i32, button: Option<&str>, speed: Option<f64>) -> Result<()> {
        let button = resolve_button(button)?;
        let speed = self.resolve_speed(speed)?;

        if !self.is_pressed(button) {
            self.press(button, true)?;
        }
        let travelled = self.travel(Point::new(x, y), speed);
        let released = self.press(button, false);
        travelled?;
        released?;
        self.pause(self.mouse_delay());
        Ok(())
    }

    pub fn click(&self, button: Option<&str>, double: bool) -> Result<()> {
        let button = resolve_button(button)?;

        self.press(button, true)?;
        self.press(button, false)?;
        if double {
            self.pause(Duration::from_millis(self.settings.input.double_click_interval_ms));
            self.press(button, true)?;
            self.press(button, false)?;
        }
        self.pause(self.mouse_delay());
        Ok(())
    }

    /// Press or release a mouse button. `state` is `"down"` or `"up"`.
    pub fn mouse_toggle(&self, state: Option<&str>, button: Option<&str>) -> Result<()> {
        let state = resolve_toggle_state(state)?;
        let button = resolve_button(button)?;

        self.press(button, state.is_down())?;
        self.pause(self.mouse_delay());
        Ok(())
    }

    /// Positive `dy` scrolls down, positive `dx` scrolls right.
    pub fn scroll(&self, dx: i32, dy: i32) -> Result<()> {
        self.platform.post_scroll(dx, dy)?;
        self.pause(self.mouse_delay());
        Ok(())
    }

    /// Press and release a key with optional modifiers.
    pub fn key_tap(&self, key: Option<&str>, modifiers: Option<&Value>) -> Result<()> {
        let (code, flags) = self.resolve_key_event(key, modifiers)?;

        self.platform.post_key_event(code, true, flags)?;
        self.pause(self.keyboard_delay());
        self.platform.post_key_event(code, false, flags)?;
        self.pause(self.keyboard_delay());
        Ok(())
    }

    /// Post a single key-down or key-up. `state` is `"down"` or `"up"`.
    pub fn key_toggle(
        &self,
        key: Option<&str>,
        state: Option<&str>,
        modifiers: Option<&Value>,
    ) -> Result<()> {
        let (code, flags) = self.resolve_key_event(key, modifiers)?;
        let state = resolve_toggle_state(state)?;

        self.platform.post_key_event(code, state.is_down(), flags)?;
        self.pause(self.keyboard_delay());
        Ok(())
    }

    /// Type `text` one character at a time.
    ///
    /// With a positive `chars_per_minute` the pause between characters is
    /// `60_000_000 / chars_per_minute` microseconds; otherwise the keyboard
    /// delay is used.
    pub fn type_text(&self, text: &str, chars_per_minute: Option<u32>) -> Result<()> {
        let delay = match chars_per_minute {
            Some(cpm) if cpm > 0 => Duration::from_micros(60_000_000 / u64::from(cpm)),
            _ => self.keyboard_delay(),
        };
        debug!(chars = text.chars().count(), ?delay, "typing text");

        for (i, ch) in text.chars().enumerate() {
            if i > 0 {
                self.pause(delay);
            }
            let (code, flags) = self.platform.char_key(ch);
            self.platform.post_key_event(code, true, flags)?;
            self.platform.post_key_event(code, false, flags)?;
        }
        Ok(())
    }

    fn resolve_speed(&self, speed: Option<f64>) -> Result<Speed> {
        let value = speed.unwrap_or(self.settings.input.default_smooth_speed);
        Speed::new(value).ok_or_else(|| {
            ArgumentError::OutOfRange {
                name: "speed",
                value: value.to_string(),
            }
            .into()
        })
    }

    fn resolve_key_event(
        &self,
        key: Option<&str>,
        modifiers: Option<&Value>,
    ) -> Result<(KeyCode, KeyFlags)> {
        let code = resolve_key(key)?;
        let flags = match modifiers {
            Some(value) => resolve_flags_value(value)?,
            None => KeyFlags::NONE,
        };
        Ok(match code {
            KeyCode::Char(ch) => {
                let (code, implied) = self.platform.char_key(ch);
                (code, flags | implied)
            }
            code => (code, flags),
        })
    }

    /// Follow a synthesized path from the current cursor position.
    fn travel(&self, target: Point, speed: Speed) -> Result<()> {
        let start = self.platform.cursor_position()?;
        let steps = {
            let mut rng = self.lock_rng();
            synthesize_path(start, target, speed, &self.settings.path, &mut *rng)
        };
        debug!(?start, ?target, steps = steps.len(), "smooth move");

        for step in steps {
            self.platform.move_cursor_to(step.point)?;
            self.pause(step.delay());
        }
        Ok(())
    }

    fn is_pressed(&self, button: MouseButton) -> bool {
        self.pressed.load(Ordering::SeqCst) & button.bit() != 0
    }

    fn press(&self, button: MouseButton, down: bool) -> Result<()> {
        self.platform.post_button_event(button, down)?;
        if down {
            self.pressed.fetch_or(button.bit(), Ordering::SeqCst);
        } else {
            self.pressed.fetch_and(!button.bit(), Ordering::SeqCst);
        }
        Ok(())
    }
}
