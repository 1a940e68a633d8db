//! Display enumeration and screen capture.
//!
//! Platform implementations:
//! - Windows: GDI (`windows.rs`)
//! - macOS: Core Graphics (`macos.rs`)
//! - X11: `xcap` (`linux.rs`)

use puppet_core::{Bitmap, ChannelOrder, DisplayRecord, PlatformResult, Rect, Size};
#[cfg(not(all(unix, not(target_os = "macos"))))]
use puppet_core::PlatformError;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
use windows as imp;

#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "macos")]
use macos as imp;

#[cfg(all(unix, not(target_os = "macos")))]
mod linux;
#[cfg(all(unix, not(target_os = "macos")))]
use linux as imp;

#[cfg(not(any(windows, unix)))]
mod imp {
    use puppet_core::{
        Bitmap, ChannelOrder, DisplayRecord, PlatformError, PlatformResult, Rect, Size,
    };

    pub const CHANNEL_ORDER: ChannelOrder = ChannelOrder::Bgra;

    pub fn displays() -> PlatformResult<Vec<DisplayRecord>> {
        Err(PlatformError::NotImplemented)
    }

    pub fn primary_id() -> PlatformResult<u32> {
        Err(PlatformError::NotImplemented)
    }

    pub fn main_size() -> PlatformResult<Size> {
        Err(PlatformError::NotImplemented)
    }

    pub fn probe() -> bool {
        false
    }

    pub fn capture(_rect: Rect) -> PlatformResult<Bitmap> {
        Err(PlatformError::NotImplemented)
    }
}

/// Channel order of bitmaps returned by [`capture`].
pub(crate) const CHANNEL_ORDER: ChannelOrder = imp::CHANNEL_ORDER;

pub(crate) fn displays() -> PlatformResult<Vec<DisplayRecord>> {
    imp::displays()
}

pub(crate) fn primary_id() -> PlatformResult<u32> {
    imp::primary_id()
}

pub(crate) fn main_size() -> PlatformResult<Size> {
    imp::main_size()
}

/// Whether the display connection is usable right now.
pub(crate) fn probe() -> bool {
    imp::probe()
}

pub(crate) fn capture(rect: Rect) -> PlatformResult<Bitmap> {
    imp::capture(rect)
}

/// Current X display name.
#[cfg(all(unix, not(target_os = "macos")))]
pub(crate) fn display_name() -> PlatformResult<String> {
    imp::display_name()
}

/// Select the X display used by later enumeration and capture.
#[cfg(all(unix, not(target_os = "macos")))]
pub(crate) fn set_display_name(name: &str) -> PlatformResult<()> {
    imp::set_display_name(name);
    Ok(())
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
pub(crate) fn display_name() -> PlatformResult<String> {
    Err(PlatformError::Unsupported("X display selection".into()))
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
pub(crate) fn set_display_name(_name: &str) -> PlatformResult<()> {
    Err(PlatformError::Unsupported("X display selection".into()))
}
