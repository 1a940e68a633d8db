//! macOS implementation using Core Graphics.
//!
//! Display ids are `CGDirectDisplayID`s. Geometry is in points, the unit
//! `image_for_rect` takes. Captures come back as the system's native BGRA
//! image, which may be larger than the requested rect on Retina displays.

use core_foundation::data::CFData;
use core_graphics::display::CGDisplay;
use core_graphics::geometry::{CGPoint, CGRect, CGSize};
use puppet_core::{
    Bitmap, ChannelOrder, DisplayRecord, PlatformError, PlatformResult, Rect, Size,
};
use tracing::debug;

pub const CHANNEL_ORDER: ChannelOrder = ChannelOrder::Bgra;

pub fn displays() -> PlatformResult<Vec<DisplayRecord>> {
    let ids = CGDisplay::active_displays()
        .map_err(|e| PlatformError::EnumerationFailed(format!("CGGetActiveDisplayList: {e}")))?;
    Ok(ids
        .into_iter()
        .map(|id| {
            let b = CGDisplay::new(id).bounds();
            DisplayRecord {
                id,
                rect: Rect::new(
                    b.origin.x as i32,
                    b.origin.y as i32,
                    b.size.width as i32,
                    b.size.height as i32,
                ),
            }
        })
        .collect())
}

pub fn primary_id() -> PlatformResult<u32> {
    Ok(CGDisplay::main().id)
}

pub fn main_size() -> PlatformResult<Size> {
    Ok(logical_size(CGDisplay::main().bounds().size))
}

fn logical_size(size: CGSize) -> Size {
    Size::new(size.width as i32, size.height as i32)
}

pub fn probe() -> bool {
    CGDisplay::active_displays()
        .map(|ids| !ids.is_empty())
        .unwrap_or(false)
}

pub fn capture(rect: Rect) -> PlatformResult<Bitmap> {
    let bounds = CGRect::new(
        &CGPoint::new(f64::from(rect.x()), f64::from(rect.y())),
        &CGSize::new(f64::from(rect.width()), f64::from(rect.height())),
    );
    let image = CGDisplay::main()
        .image_for_rect(bounds)
        .ok_or_else(|| PlatformError::CaptureFailed("CGDisplayCreateImageForRect returned null".into()))?;

    let data: CFData = image.data();
    let bytes_per_pixel = (image.bits_per_pixel() / 8) as i32;
    let mut bytes = data.bytes().to_vec();
    bytes.truncate(image.bytes_per_row() * image.height());
    let bitmap = Bitmap {
        image: Some(bytes),
        width: image.width() as i32,
        height: image.height() as i32,
        byte_width: image.bytes_per_row() as i32,
        bits_per_pixel: image.bits_per_pixel() as i32,
        bytes_per_pixel,
        channel_order: CHANNEL_ORDER,
    };
    debug!(
        width = bitmap.width,
        height = bitmap.height,
        stride = bitmap.byte_width,
        "captured display rect"
    );
    Ok(bitmap)
}
