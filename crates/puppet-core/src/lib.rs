//! puppet-core: input synthesis and screen capture, platform-agnostic.
//!
//! Design goal: keep this crate free of OS calls. The native primitives live
//! behind the [`Platform`] trait, implemented in `puppet-platform`.
//!
//! - `geometry`, `color` - value types
//! - `bitmap`, `validate` - pixel buffers and the checks that gate every read
//! - `screens` - display enumeration and index lookup
//! - `path` - smooth pointer trajectories
//! - `keys` - button, key and modifier name tables
//! - `coordinator` - resource-validity state machine
//! - `robot` - the dispatcher tying it all together

mod bitmap;
mod color;
mod config;
mod coordinator;
mod error;
mod geometry;
mod keys;
mod path;
mod platform;
mod report;
mod robot;
mod screens;
mod validate;

#[cfg(test)]
mod mock;

pub use bitmap::{Bitmap, BitmapDescriptor, ChannelOrder};
pub use color::{RgbColor, RgbHex};
pub use config::{
    config_dir, settings_file_path, ConfigError, ConfigResult, InputSettings, ResourceSettings,
    Settings,
};
pub use coordinator::{OperationGuard, ResourceCoordinator, ResourceState, TeardownOutcome};
pub use error::{ArgumentError, Error, IdentifierKind, Result};
pub use geometry::{Point, Rect, Size};
pub use keys::{
    resolve_button, resolve_flag, resolve_flags, resolve_flags_value, resolve_key,
    resolve_toggle_state, KeyCode, KeyFlags, MouseButton, ToggleState,
};
pub use path::{synthesize_path, PathConfig, PathStep, Speed};
pub use platform::{DisplayRecord, Platform, PlatformError, PlatformResult};
pub use report::{ColorFormat, PixelReport};
pub use robot::{Robot, Sleeper};
pub use screens::{
    virtual_bounds, ScreenEnumerator, ScreenInfo, ScreenLookupError, ScreenSize, VirtualScreen,
};
pub use validate::{check as check_bitmap, is_valid as is_bitmap_valid, safe_get_pixel};
pub use validate::{InvalidBitmap, PixelFormatPolicy};
