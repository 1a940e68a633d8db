//! puppet-platform: the native side of puppet.
//!
//! This crate provides:
//! - `NativePlatform`: input injection via `enigo`, display enumeration and
//!   capture via GDI (Windows), Core Graphics (macOS) or `xcap` (X11)
//! - `NoopPlatform` for headless runs
//! - DPI awareness helpers
//! - Logging setup
//!
//! ## Module Structure
//!
//! - `native` - the `Platform` implementation
//! - `keymap` - logical keys to enigo keys
//! - `display` - per-OS enumeration and capture
//! - `dpi` - DPI scaling utilities

mod display;
mod dpi;
mod keymap;
mod logging;
mod native;
mod noop;

pub use dpi::{primary_scale_factor, set_dpi_aware};
pub use logging::init_logging;
pub use native::NativePlatform;
pub use noop::NoopPlatform;

use puppet_core::{PlatformResult, Robot, Settings};

/// A `Robot` over the native platform, configured from the settings file.
pub fn native_robot() -> PlatformResult<Robot<NativePlatform>> {
    Ok(Robot::new(NativePlatform::new()?, Settings::load_or_default()))
}
