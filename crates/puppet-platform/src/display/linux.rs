//! X11 implementation using `xcap`.
//!
//! A capture is cut out of the monitor containing the rect's origin and is
//! clipped to that monitor. Pixels are RGBA.
//!
//! xcap connects to `$DISPLAY` on every call, so selecting another X display
//! means rewriting that variable.

use puppet_core::{
    Bitmap, ChannelOrder, DisplayRecord, PlatformError, PlatformResult, Point, Rect, Size,
};
use tracing::{debug, info};
use xcap::Monitor;

pub const CHANNEL_ORDER: ChannelOrder = ChannelOrder::Rgba;

const DISPLAY_VAR: &str = "DISPLAY";

pub fn display_name() -> PlatformResult<String> {
    std::env::var(DISPLAY_VAR)
        .map_err(|_| PlatformError::EnumerationFailed("DISPLAY is not set".into()))
}

pub fn set_display_name(name: &str) {
    std::env::set_var(DISPLAY_VAR, name);
    info!(name, "Switched X display");
}

fn monitors() -> PlatformResult<Vec<Monitor>> {
    Monitor::all().map_err(|e| PlatformError::EnumerationFailed(format!("Failed to get monitors: {e}")))
}

fn monitor_rect(monitor: &Monitor) -> Rect {
    Rect::new(
        monitor.x().unwrap_or(0),
        monitor.y().unwrap_or(0),
        monitor.width().unwrap_or(0) as i32,
        monitor.height().unwrap_or(0) as i32,
    )
}

pub fn displays() -> PlatformResult<Vec<DisplayRecord>> {
    Ok(monitors()?
        .iter()
        .enumerate()
        .map(|(i, m)| DisplayRecord {
            id: m.id().unwrap_or(i as u32),
            rect: monitor_rect(m),
        })
        .collect())
}

fn primary() -> PlatformResult<Monitor> {
    let mut all = monitors()?;
    let index = all
        .iter()
        .position(|m| m.is_primary().unwrap_or(false))
        .unwrap_or(0);
    if index < all.len() {
        Ok(all.swap_remove(index))
    } else {
        Err(PlatformError::EnumerationFailed("no monitors".into()))
    }
}

pub fn primary_id() -> PlatformResult<u32> {
    let monitor = primary()?;
    monitor
        .id()
        .map_err(|e| PlatformError::EnumerationFailed(format!("monitor id: {e}")))
}

pub fn main_size() -> PlatformResult<Size> {
    Ok(monitor_rect(&primary()?).size)
}

pub fn probe() -> bool {
    Monitor::all().map(|m| !m.is_empty()).unwrap_or(false)
}

pub fn capture(rect: Rect) -> PlatformResult<Bitmap> {
    let monitor = monitors()?
        .into_iter()
        .find(|m| monitor_rect(m).contains(rect.origin))
        .ok_or_else(|| PlatformError::CaptureFailed(format!("no monitor at {:?}", rect.origin)))?;
    let bounds = monitor_rect(&monitor);

    let full = monitor
        .capture_image()
        .map_err(|e| PlatformError::CaptureFailed(format!("Failed to capture screen: {e}")))?;

    let local = Point::new(rect.x() - bounds.x(), rect.y() - bounds.y());
    let crop = crop_rgba(full.as_raw(), full.width() as i32, full.height() as i32, local, rect.size)?;
    debug!(?rect, width = crop.width, height = crop.height, "captured region");
    Ok(crop)
}

/// Copy a `size` block starting at `at` out of a packed RGBA frame.
fn crop_rgba(frame: &[u8], frame_w: i32, frame_h: i32, at: Point, size: Size) -> PlatformResult<Bitmap> {
    let w = size.width.min(frame_w - at.x);
    let h = size.height.min(frame_h - at.y);
    if at.x < 0 || at.y < 0 || w <= 0 || h <= 0 {
        return Err(PlatformError::CaptureFailed("region outside monitor".into()));
    }

    let src_stride = frame_w as usize * 4;
    let row_len = w as usize * 4;
    let mut out = Vec::with_capacity(row_len * h as usize);
    for row in at.y as usize..(at.y + h) as usize {
        let start = row * src_stride + at.x as usize * 4;
        let line = frame
            .get(start..start + row_len)
            .ok_or_else(|| PlatformError::CaptureFailed("short frame".into()))?;
        out.extend_from_slice(line);
    }
    Ok(Bitmap::packed(out, w, h, 4, CHANNEL_ORDER))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(w: i32, h: i32) -> Vec<u8> {
        (0..h)
            .flat_map(|y| (0..w).flat_map(move |x| [x as u8, y as u8, 0, 255]))
            .collect()
    }

    #[test]
    fn test_display_name_follows_env() {
        let previous = std::env::var(DISPLAY_VAR).ok();
        set_display_name(":7");
        assert_eq!(display_name().unwrap(), ":7");
        match previous {
            Some(v) => std::env::set_var(DISPLAY_VAR, v),
            None => std::env::remove_var(DISPLAY_VAR),
        }
    }

    #[test]
    fn test_crop_copies_block() {
        let f = frame(4, 3);
        let bmp = crop_rgba(&f, 4, 3, Point::new(1, 1), Size::new(2, 2)).unwrap();
        assert_eq!((bmp.width, bmp.height, bmp.byte_width), (2, 2, 8));
        let image = bmp.image.unwrap();
        assert_eq!(&image[..4], &[1, 1, 0, 255]);
        assert_eq!(&image[12..], &[2, 2, 0, 255]);
    }

    #[test]
    fn test_crop_is_clipped_to_frame() {
        let f = frame(4, 3);
        let bmp = crop_rgba(&f, 4, 3, Point::new(3, 2), Size::new(10, 10)).unwrap();
        assert_eq!((bmp.width, bmp.height), (1, 1));
        assert!(crop_rgba(&f, 4, 3, Point::new(4, 0), Size::new(1, 1)).is_err());
        assert!(crop_rgba(&f, 4, 3, Point::new(-1, 0), Size::new(1, 1)).is_err());
    }
}
