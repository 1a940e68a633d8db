//! DPI awareness and scale factor.
//!
//! On Windows the process is switched to Per-Monitor V2 DPI awareness, once,
//! so GDI capture and enigo both work in physical pixels. The scale factor is
//! queried live from the primary monitor. Other platforms handle scaling
//! themselves.

#[cfg(windows)]
mod imp {
    use std::sync::Once;
    use tracing::{info, warn};

    static INIT: Once = Once::new();

    pub fn set_dpi_aware() {
        INIT.call_once(|| unsafe {
            const DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2: isize = -4;

            #[link(name = "user32")]
            extern "system" {
                fn SetProcessDpiAwarenessContext(value: isize) -> i32;
            }

            if SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2) != 0 {
                info!("Set Per-Monitor V2 DPI awareness");
            } else {
                warn!("Failed to set Per-Monitor V2 DPI awareness, coordinates may be scaled");
            }
        });
    }

    /// Effective DPI of the primary monitor, read fresh on every call.
    pub fn primary_scale_factor() -> f64 {
        use windows_sys::Win32::Foundation::POINT;
        use windows_sys::Win32::Graphics::Gdi::{MonitorFromPoint, MONITOR_DEFAULTTOPRIMARY};

        const MDT_EFFECTIVE_DPI: i32 = 0;

        #[link(name = "shcore")]
        extern "system" {
            fn GetDpiForMonitor(monitor: isize, kind: i32, dpi_x: *mut u32, dpi_y: *mut u32) -> i32;
        }

        unsafe {
            let monitor = MonitorFromPoint(POINT { x: 0, y: 0 }, MONITOR_DEFAULTTOPRIMARY);
            let (mut dpi_x, mut dpi_y) = (0u32, 0u32);
            if GetDpiForMonitor(monitor as isize, MDT_EFFECTIVE_DPI, &mut dpi_x, &mut dpi_y) != 0
                || dpi_x == 0
            {
                warn!("GetDpiForMonitor failed, assuming 96 DPI");
                return 1.0;
            }
            f64::from(dpi_x) / 96.0
        }
    }
}

#[cfg(not(windows))]
mod imp {
    pub fn set_dpi_aware() {}

    pub fn primary_scale_factor() -> f64 {
        1.0
    }
}

pub use imp::{primary_scale_factor, set_dpi_aware};

/// Make sure DPI awareness is set, then re-read the primary monitor's
/// current scale factor.
pub(crate) fn refresh() -> f64 {
    set_dpi_aware();
    let scale = primary_scale_factor();
    tracing::debug!(scale, "screen metrics refreshed");
    scale
}
