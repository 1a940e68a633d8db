//! Mouse buttons, key codes, modifier flags and their name tables.
//!
//! Name lookup is exact-match against immutable tables built once on first
//! use. Any single-character string resolves to `KeyCode::Char`.

use crate::error::{ArgumentError, Error, IdentifierKind, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub(crate) const fn bit(self) -> u8 {
        match self {
            MouseButton::Left => 0b001,
            MouseButton::Right => 0b010,
            MouseButton::Middle => 0b100,
        }
    }
}

/// Logical key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,
    Up,
    Down,
    Right,
    Left,
    Home,
    End,
    PageUp,
    PageDown,
    /// Function keys F1..=F24.
    Function(u8),
    CapsLock,
    Command,
    Alt,
    RightAlt,
    Control,
    LeftControl,
    RightControl,
    Shift,
    RightShift,
    Space,
    PrintScreen,
    Insert,
    Menu,
    AudioMute,
    AudioVolumeDown,
    AudioVolumeUp,
    AudioPlay,
    AudioStop,
    AudioPause,
    AudioPrev,
    AudioNext,
    AudioRewind,
    AudioForward,
    AudioRepeat,
    AudioRandom,
    NumpadLock,
    /// Numpad digits 0..=9.
    Numpad(u8),
    NumpadPlus,
    NumpadMinus,
    NumpadMultiply,
    NumpadDivide,
    NumpadDecimal,
    LightsMonitorUp,
    LightsMonitorDown,
    LightsKeyboardToggle,
    LightsKeyboardUp,
    LightsKeyboardDown,
    /// The key producing this character; the platform decides which
    /// physical key and modifiers that takes.
    Char(char),
}

/// Modifier bitset. Flags combine with `|`; the empty set means no modifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyFlags(u8);

impl KeyFlags {
    pub const NONE: KeyFlags = KeyFlags(0);
    pub const ALT: KeyFlags = KeyFlags(0b0001);
    pub const COMMAND: KeyFlags = KeyFlags(0b0010);
    pub const CONTROL: KeyFlags = KeyFlags(0b0100);
    pub const SHIFT: KeyFlags = KeyFlags(0b1000);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: KeyFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for KeyFlags {
    type Output = KeyFlags;

    fn bitor(self, rhs: KeyFlags) -> KeyFlags {
        KeyFlags(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for KeyFlags {
    fn bitor_assign(&mut self, rhs: KeyFlags) {
        self.0 |= rhs.0;
    }
}

/// Requested direction of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToggleState {
    Down,
    Up,
}

impl ToggleState {
    pub fn is_down(self) -> bool {
        matches!(self, ToggleState::Down)
    }
}

fn key_table() -> &'static HashMap<&'static str, KeyCode> {
    static TABLE: OnceLock<HashMap<&'static str, KeyCode>> = OnceLock::new();
    TABLE.get_or_init(|| {
        use KeyCode::*;
        let mut m: HashMap<&'static str, KeyCode> = HashMap::from([
            ("backspace", Backspace),
            ("delete", Delete),
            ("enter", Enter),
            ("tab", Tab),
            ("escape", Escape),
            ("up", Up),
            ("down", Down),
            ("right", Right),
            ("left", Left),
            ("home", Home),
            ("end", End),
            ("pageup", PageUp),
            ("pagedown", PageDown),
            ("capslock", CapsLock),
            ("command", Command),
            ("alt", Alt),
            ("right_alt", RightAlt),
            ("control", Control),
            ("left_control", LeftControl),
            ("right_control", RightControl),
            ("shift", Shift),
            ("right_shift", RightShift),
            ("space", Space),
            ("printscreen", PrintScreen),
            ("insert", Insert),
            ("menu", Menu),
            ("audio_mute", AudioMute),
            ("audio_vol_down", AudioVolumeDown),
            ("audio_vol_up", AudioVolumeUp),
            ("audio_play", AudioPlay),
            ("audio_stop", AudioStop),
            ("audio_pause", AudioPause),
            ("audio_prev", AudioPrev),
            ("audio_next", AudioNext),
            ("audio_rewind", AudioRewind),
            ("audio_forward", AudioForward),
            ("audio_repeat", AudioRepeat),
            ("audio_random", AudioRandom),
            ("numpad_lock", NumpadLock),
            ("numpad_+", NumpadPlus),
            ("numpad_-", NumpadMinus),
            ("numpad_*", NumpadMultiply),
            ("numpad_/", NumpadDivide),
            ("numpad_.", NumpadDecimal),
            ("lights_mon_up", LightsMonitorUp),
            ("lights_mon_down", LightsMonitorDown),
            ("lights_kbd_toggle", LightsKeyboardToggle),
            ("lights_kbd_up", LightsKeyboardUp),
            ("lights_kbd_down", LightsKeyboardDown),
        ]);

        const FUNCTION_NAMES: [&str; 24] = [
            "f1", "f2", "f3", "f4", "f5", "f6", "f7", "f8", "f9", "f10", "f11", "f12", "f13",
            "f14", "f15", "f16", "f17", "f18", "f19", "f20", "f21", "f22", "f23", "f24",
        ];
        for (i, name) in FUNCTION_NAMES.iter().enumerate() {
            m.insert(*name, Function(i as u8 + 1));
        }

        const NUMPAD_NAMES: [&str; 10] = [
            "numpad_0", "numpad_1", "numpad_2", "numpad_3", "numpad_4", "numpad_5", "numpad_6",
            "numpad_7", "numpad_8", "numpad_9",
        ];
        for (i, name) in NUMPAD_NAMES.iter().enumerate() {
            m.insert(*name, Numpad(i as u8));
        }
        m
    })
}

fn flag_table() -> &'static HashMap<&'static str, KeyFlags> {
    static TABLE: OnceLock<HashMap<&'static str, KeyFlags>> = OnceLock::new();
    TABLE.get_or_init(|| {
        HashMap::from([
            ("alt", KeyFlags::ALT),
            ("right_alt", KeyFlags::ALT),
            ("command", KeyFlags::COMMAND),
            ("control", KeyFlags::CONTROL),
            ("left_control", KeyFlags::CONTROL),
            ("right_control", KeyFlags::CONTROL),
            ("shift", KeyFlags::SHIFT),
            ("right_shift", KeyFlags::SHIFT),
            ("none", KeyFlags::NONE),
        ])
    })
}

/// Resolve a mouse button name. A missing name means the left button.
pub fn resolve_button(name: Option<&str>) -> Result<MouseButton> {
    match name {
        None => Ok(MouseButton::Left),
        Some("left") => Ok(MouseButton::Left),
        Some("right") => Ok(MouseButton::Right),
        Some("middle") => Ok(MouseButton::Middle),
        Some(other) => Err(Error::unrecognized(IdentifierKind::MouseButton, other)),
    }
}

/// Resolve a key name, or a single character to `KeyCode::Char`.
pub fn resolve_key(name: Option<&str>) -> Result<KeyCode> {
    let name = name.ok_or(ArgumentError::Missing("key"))?;

    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }

    key_table()
        .get(name)
        .copied()
        .ok_or_else(|| Error::unrecognized(IdentifierKind::Key, name))
}

/// Resolve a single modifier name.
pub fn resolve_flag(name: &str) -> Result<KeyFlags> {
    flag_table()
        .get(name)
        .copied()
        .ok_or_else(|| Error::unrecognized(IdentifierKind::KeyFlag, name))
}

/// Resolve an ordered list of modifier names, OR-combined.
///
/// Any unknown entry fails the whole resolution.
pub fn resolve_flags<'a, I>(names: I) -> Result<KeyFlags>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .try_fold(KeyFlags::NONE, |acc, name| Ok(acc | resolve_flag(name)?))
}

/// Resolve modifiers as passed by the host: a string or an array of strings.
pub fn resolve_flags_value(value: &Value) -> Result<KeyFlags> {
    match value {
        Value::Null => Err(ArgumentError::Null("modifier").into()),
        Value::String(name) => resolve_flag(name),
        Value::Array(items) => {
            let mut flags = KeyFlags::NONE;
            for item in items {
                let name = item.as_str().ok_or(ArgumentError::WrongType {
                    name: "modifier",
                    expected: "a string",
                })?;
                flags |= resolve_flag(name)?;
            }
            Ok(flags)
        }
        _ => Err(ArgumentError::WrongType {
            name: "modifier",
            expected: "a string or an array of strings",
        }
        .into()),
    }
}

/// Resolve `"down"` / `"up"`. A missing state means up.
pub fn resolve_toggle_state(name: Option<&str>) -> Result<ToggleState> {
    match name {
        None | Some("up") => Ok(ToggleState::Up),
        Some("down") => Ok(ToggleState::Down),
        Some(other) => Err(Error::unrecognized(IdentifierKind::ToggleState, other)),
    }
}
