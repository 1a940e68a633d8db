//! Owned pixel buffers and format-aware pixel decoding.
//!
//! A `Bitmap` is produced either by a platform capture or by copying a
//! caller-supplied `BitmapDescriptor`. Its metadata is NOT trusted: the
//! validator in `crate::validate` must accept a bitmap before any pixel is read.

use crate::color::RgbColor;
use serde::{Deserialize, Serialize};

/// Byte order of the color channels inside one pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    /// Blue first (`B G R [A]`). GDI DIBs and CoreGraphics captures.
    #[default]
    Bgra,
    /// Red first (`R G B [A]`). X11 captures.
    Rgba,
}

/// A captured or supplied image.
///
/// Exclusively owned by whoever holds it; crossing the binding boundary
/// always goes through an explicit copy (`to_descriptor` / `from_descriptor`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Raw pixel rows. `None` when the platform handed back no buffer.
    pub image: Option<Vec<u8>>,
    pub width: i32,
    pub height: i32,
    /// Stride: bytes from one row start to the next.
    pub byte_width: i32,
    pub bits_per_pixel: i32,
    pub bytes_per_pixel: i32,
    pub channel_order: ChannelOrder,
}

/// Wire form of a bitmap as exchanged with the host runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BitmapDescriptor {
    pub width: i32,
    pub height: i32,
    pub byte_width: i32,
    pub bits_per_pixel: i32,
    pub bytes_per_pixel: i32,
    #[serde(default)]
    pub image: Option<Vec<u8>>,
}

impl Bitmap {
    /// Build a tightly packed bitmap (stride = width * bytes per pixel).
    pub fn packed(
        image: Vec<u8>,
        width: i32,
        height: i32,
        bytes_per_pixel: i32,
        channel_order: ChannelOrder,
    ) -> Self {
        Self {
            image: Some(image),
            width,
            height,
            byte_width: width.saturating_mul(bytes_per_pixel),
            bits_per_pixel: bytes_per_pixel.saturating_mul(8),
            bytes_per_pixel,
            channel_order,
        }
    }

    /// Copy a caller-supplied descriptor into an owned bitmap.
    pub fn from_descriptor(descriptor: &BitmapDescriptor, channel_order: ChannelOrder) -> Self {
        Self {
            image: descriptor.image.clone(),
            width: descriptor.width,
            height: descriptor.height,
            byte_width: descriptor.byte_width,
            bits_per_pixel: descriptor.bits_per_pixel,
            bytes_per_pixel: descriptor.bytes_per_pixel,
            channel_order,
        }
    }

    /// Copy this bitmap out as a wire descriptor.
    pub fn to_descriptor(&self) -> BitmapDescriptor {
        BitmapDescriptor {
            width: self.width,
            height: self.height,
            byte_width: self.byte_width,
            bits_per_pixel: self.bits_per_pixel,
            bytes_per_pixel: self.bytes_per_pixel,
            image: self.image.clone(),
        }
    }

    /// `byte_width * height` as declared by the metadata, if it fits in `usize`.
    pub fn declared_len(&self) -> Option<usize> {
        let stride = usize::try_from(self.byte_width).ok()?;
        let rows = usize::try_from(self.height).ok()?;
        stride.checked_mul(rows)
    }

    /// Whether `(x, y)` is inside the declared pixel grid.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    /// Byte offset of pixel `(x, y)`, computed with overflow checks.
    pub fn pixel_offset(&self, x: i32, y: i32) -> Option<usize> {
        let stride = usize::try_from(self.byte_width).ok()?;
        let bpp = usize::try_from(self.bytes_per_pixel).ok()?;
        let row = usize::try_from(y).ok()?;
        let col = usize::try_from(x).ok()?;
        stride.checked_mul(row)?.checked_add(col.checked_mul(bpp)?)
    }

    /// Decode the pixel starting at `offset`.
    ///
    /// Returns `None` if the bytes are not all present; callers are expected
    /// to have validated the bitmap first.
    pub(crate) fn decode_at(&self, offset: usize) -> Option<RgbColor> {
        let bpp = usize::try_from(self.bytes_per_pixel).ok()?;
        let bytes = self.image.as_deref()?.get(offset..offset.checked_add(bpp)?)?;
        decode_pixel(bytes, self.channel_order)
    }
}

/// Map one pixel's bytes to RGB.
///
/// - 2 bytes: RGB565, little endian (channel order does not apply)
/// - 3..=5 bytes: 8 bits per channel
/// - 6..=8 bytes: 16 bits per channel, little endian, high byte kept
fn decode_pixel(bytes: &[u8], order: ChannelOrder) -> Option<RgbColor> {
    let (r, g, b) = match bytes.len() {
        2 => {
            let v = u16::from_le_bytes([bytes[0], bytes[1]]);
            let r5 = ((v >> 11) & 0x1F) as u32;
            let g6 = ((v >> 5) & 0x3F) as u32;
            let b5 = (v & 0x1F) as u32;
            return Some(RgbColor::new(
                ((r5 * 255 + 15) / 31) as u8,
                ((g6 * 255 + 31) / 63) as u8,
                ((b5 * 255 + 15) / 31) as u8,
            ));
        }
        3..=5 => (bytes[0], bytes[1], bytes[2]),
        6..=8 => (bytes[1], bytes[3], bytes[5]),
        _ => return None,
    };

    Some(match order {
        ChannelOrder::Bgra => RgbColor::new(b, g, r),
        ChannelOrder::Rgba => RgbColor::new(r, g, b),
    })
}
