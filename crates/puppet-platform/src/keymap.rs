//! Mapping from logical key codes to `enigo` keys.
//!
//! Keys enigo names on every platform map directly. The rest go through
//! `Key::Other` with the native code: virtual-key codes on Windows, keysyms on
//! X11 and `kVK_*` codes on macOS.

use enigo::Key;
use puppet_core::{KeyCode, KeyFlags, PlatformError, PlatformResult};

/// Convert a logical key into the key enigo should post.
pub(crate) fn to_enigo(code: KeyCode) -> PlatformResult<Key> {
    let key = match code {
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Enter => Key::Return,
        KeyCode::Tab => Key::Tab,
        KeyCode::Escape => Key::Escape,
        KeyCode::Up => Key::UpArrow,
        KeyCode::Down => Key::DownArrow,
        KeyCode::Left => Key::LeftArrow,
        KeyCode::Right => Key::RightArrow,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Function(n) => function_key(n)?,
        KeyCode::CapsLock => Key::CapsLock,
        KeyCode::Command => Key::Meta,
        KeyCode::Alt => Key::Alt,
        KeyCode::Control => Key::Control,
        KeyCode::Shift => Key::Shift,
        KeyCode::Space => Key::Space,
        KeyCode::Char(ch) => Key::Unicode(ch),
        other => Key::Other(native::code(other).ok_or_else(|| unsupported(other))?),
    };
    Ok(key)
}

/// Modifier keys for `flags`, in press order.
pub(crate) fn modifier_keys(flags: KeyFlags) -> Vec<Key> {
    [
        (KeyFlags::COMMAND, Key::Meta),
        (KeyFlags::CONTROL, Key::Control),
        (KeyFlags::ALT, Key::Alt),
        (KeyFlags::SHIFT, Key::Shift),
    ]
    .into_iter()
    .filter(|(flag, _)| flags.contains(*flag))
    .map(|(_, key)| key)
    .collect()
}

fn function_key(n: u8) -> PlatformResult<Key> {
    let key = match n {
        1 => Key::F1,
        2 => Key::F2,
        3 => Key::F3,
        4 => Key::F4,
        5 => Key::F5,
        6 => Key::F6,
        7 => Key::F7,
        8 => Key::F8,
        9 => Key::F9,
        10 => Key::F10,
        11 => Key::F11,
        12 => Key::F12,
        _ => {
            let code = KeyCode::Function(n);
            Key::Other(native::code(code).ok_or_else(|| unsupported(code))?)
        }
    };
    Ok(key)
}

fn unsupported(code: KeyCode) -> PlatformError {
    PlatformError::Unsupported(format!("key {code:?}"))
}

#[cfg(windows)]
mod native {
    use puppet_core::KeyCode;

    pub fn code(code: KeyCode) -> Option<u32> {
        let vk = match code {
            // VK_F13..=VK_F24
            KeyCode::Function(n @ 13..=24) => 0x7C + u32::from(n - 13),
            KeyCode::RightAlt => 0xA5,
            KeyCode::LeftControl => 0xA2,
            KeyCode::RightControl => 0xA3,
            KeyCode::RightShift => 0xA1,
            KeyCode::PrintScreen => 0x2C,
            KeyCode::Insert => 0x2D,
            KeyCode::Menu => 0x5D,
            KeyCode::AudioMute => 0xAD,
            KeyCode::AudioVolumeDown => 0xAE,
            KeyCode::AudioVolumeUp => 0xAF,
            KeyCode::AudioNext => 0xB0,
            KeyCode::AudioPrev => 0xB1,
            KeyCode::AudioStop => 0xB2,
            KeyCode::AudioPlay | KeyCode::AudioPause => 0xB3,
            KeyCode::NumpadLock => 0x90,
            KeyCode::Numpad(n @ 0..=9) => 0x60 + u32::from(n),
            KeyCode::NumpadMultiply => 0x6A,
            KeyCode::NumpadPlus => 0x6B,
            KeyCode::NumpadMinus => 0x6D,
            KeyCode::NumpadDecimal => 0x6E,
            KeyCode::NumpadDivide => 0x6F,
            _ => return None,
        };
        Some(vk)
    }
}

#[cfg(target_os = "macos")]
mod native {
    use puppet_core::KeyCode;

    pub fn code(code: KeyCode) -> Option<u32> {
        let kvk = match code {
            KeyCode::Function(13) => 0x69,
            KeyCode::Function(14) => 0x6B,
            KeyCode::Function(15) => 0x71,
            KeyCode::Function(16) => 0x6A,
            KeyCode::Function(17) => 0x40,
            KeyCode::Function(18) => 0x4F,
            KeyCode::Function(19) => 0x50,
            KeyCode::Function(20) => 0x5A,
            KeyCode::RightAlt => 0x3D,
            KeyCode::LeftControl => 0x3B,
            KeyCode::RightControl => 0x3E,
            KeyCode::RightShift => 0x3C,
            // kVK_Help sits where Insert is on PC keyboards.
            KeyCode::Insert => 0x72,
            KeyCode::AudioMute => 0x4A,
            KeyCode::AudioVolumeDown => 0x49,
            KeyCode::AudioVolumeUp => 0x48,
            KeyCode::NumpadLock => 0x47,
            KeyCode::Numpad(n @ 0..=7) => 0x52 + u32::from(n),
            KeyCode::Numpad(8) => 0x5B,
            KeyCode::Numpad(9) => 0x5C,
            KeyCode::NumpadMultiply => 0x43,
            KeyCode::NumpadPlus => 0x45,
            KeyCode::NumpadMinus => 0x4E,
            KeyCode::NumpadDecimal => 0x41,
            KeyCode::NumpadDivide => 0x4B,
            _ => return None,
        };
        Some(kvk)
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
mod native {
    use puppet_core::KeyCode;

    pub fn code(code: KeyCode) -> Option<u32> {
        let keysym = match code {
            // XK_F13..=XK_F24
            KeyCode::Function(n @ 13..=24) => 0xFFCA + u32::from(n - 13),
            KeyCode::RightAlt => 0xFFEA,
            KeyCode::LeftControl => 0xFFE3,
            KeyCode::RightControl => 0xFFE4,
            KeyCode::RightShift => 0xFFE2,
            KeyCode::PrintScreen => 0xFF61,
            KeyCode::Insert => 0xFF63,
            KeyCode::Menu => 0xFF67,
            KeyCode::AudioMute => 0x1008_FF12,
            KeyCode::AudioVolumeDown => 0x1008_FF11,
            KeyCode::AudioVolumeUp => 0x1008_FF13,
            KeyCode::AudioPlay => 0x1008_FF14,
            KeyCode::AudioStop => 0x1008_FF15,
            KeyCode::AudioPrev => 0x1008_FF16,
            KeyCode::AudioNext => 0x1008_FF17,
            KeyCode::AudioPause => 0x1008_FF31,
            KeyCode::AudioRewind => 0x1008_FF3E,
            KeyCode::AudioForward => 0x1008_FF97,
            KeyCode::AudioRepeat => 0x1008_FF98,
            KeyCode::AudioRandom => 0x1008_FF99,
            KeyCode::NumpadLock => 0xFF7F,
            KeyCode::Numpad(n @ 0..=9) => 0xFFB0 + u32::from(n),
            KeyCode::NumpadMultiply => 0xFFAA,
            KeyCode::NumpadPlus => 0xFFAB,
            KeyCode::NumpadMinus => 0xFFAD,
            KeyCode::NumpadDecimal => 0xFFAE,
            KeyCode::NumpadDivide => 0xFFAF,
            KeyCode::LightsMonitorUp => 0x1008_FF02,
            KeyCode::LightsMonitorDown => 0x1008_FF03,
            KeyCode::LightsKeyboardToggle => 0x1008_FF04,
            KeyCode::LightsKeyboardUp => 0x1008_FF05,
            KeyCode::LightsKeyboardDown => 0x1008_FF06,
            _ => return None,
        };
        Some(keysym)
    }
}

#[cfg(not(any(windows, unix)))]
mod native {
    use puppet_core::KeyCode;

    pub fn code(_code: KeyCode) -> Option<u32> {
        None
    }
}
