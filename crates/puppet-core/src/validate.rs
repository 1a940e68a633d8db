//! Defensive bitmap validation and gated pixel reads.
//!
//! Every pixel read goes through `safe_get_pixel`, which rejects malformed
//! metadata and out-of-range coordinates by returning black instead of
//! touching the buffer.

use crate::bitmap::Bitmap;
use crate::color::RgbColor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which pixel formats a bitmap may declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormatPolicy {
    /// 24 or 32 bits per pixel, and bytes per pixel must equal bits / 8.
    #[default]
    Strict,
    /// 16..=64 bits per pixel and 2..=8 bytes per pixel, independently.
    Lenient,
}

/// Why a bitmap was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidBitmap {
    #[error("no image buffer")]
    MissingBuffer,
    #[error("non-positive dimensions {width}x{height}")]
    BadDimensions { width: i32, height: i32 },
    #[error("non-positive stride {0}")]
    BadStride(i32),
    #[error("stride {stride} shorter than a {row}-byte row")]
    StrideTooSmall { stride: i32, row: i64 },
    #[error("unsupported bits per pixel {0}")]
    BadBitsPerPixel(i32),
    #[error("bytes per pixel {bytes} inconsistent with {bits} bits per pixel")]
    BadBytesPerPixel { bits: i32, bytes: i32 },
    #[error("empty buffer size")]
    EmptyBuffer,
    #[error("buffer holds {actual} bytes, metadata declares {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

impl PixelFormatPolicy {
    fn check(self, bits: i32, bytes: i32) -> Result<(), InvalidBitmap> {
        match self {
            PixelFormatPolicy::Strict => {
                if bits != 24 && bits != 32 {
                    return Err(InvalidBitmap::BadBitsPerPixel(bits));
                }
                if bytes != bits / 8 {
                    return Err(InvalidBitmap::BadBytesPerPixel { bits, bytes });
                }
            }
            PixelFormatPolicy::Lenient => {
                if !(16..=64).contains(&bits) {
                    return Err(InvalidBitmap::BadBitsPerPixel(bits));
                }
                if !(2..=8).contains(&bytes) {
                    return Err(InvalidBitmap::BadBytesPerPixel { bits, bytes });
                }
            }
        }
        Ok(())
    }
}

/// Check that a bitmap's metadata is internally consistent and its buffer
/// is exactly `byte_width * height` bytes. Never reads pixel data.
pub fn check(bitmap: &Bitmap, policy: PixelFormatPolicy) -> Result<(), InvalidBitmap> {
    let Some(image) = bitmap.image.as_ref() else {
        return Err(InvalidBitmap::MissingBuffer);
    };
    if bitmap.width <= 0 || bitmap.height <= 0 {
        return Err(InvalidBitmap::BadDimensions {
            width: bitmap.width,
            height: bitmap.height,
        });
    }
    if bitmap.byte_width <= 0 {
        return Err(InvalidBitmap::BadStride(bitmap.byte_width));
    }
    policy.check(bitmap.bits_per_pixel, bitmap.bytes_per_pixel)?;

    let row = i64::from(bitmap.width) * i64::from(bitmap.bytes_per_pixel);
    if i64::from(bitmap.byte_width) < row {
        return Err(InvalidBitmap::StrideTooSmall {
            stride: bitmap.byte_width,
            row,
        });
    }

    let expected = bitmap.declared_len().unwrap_or(0);
    if expected == 0 {
        return Err(InvalidBitmap::EmptyBuffer);
    }
    if image.len() != expected {
        return Err(InvalidBitmap::LengthMismatch {
            expected,
            actual: image.len(),
        });
    }
    Ok(())
}

/// Boolean form of [`check`].
pub fn is_valid(bitmap: &Bitmap, policy: PixelFormatPolicy) -> bool {
    check(bitmap, policy).is_ok()
}

/// Read the pixel at `(x, y)`, degrading to black on any rejection.
pub fn safe_get_pixel(bitmap: &Bitmap, x: i32, y: i32, policy: PixelFormatPolicy) -> RgbColor {
    if let Err(reason) = check(bitmap, policy) {
        tracing::debug!(%reason, "bitmap rejected, returning default color");
        return RgbColor::BLACK;
    }
    if !bitmap.contains(x, y) {
        return RgbColor::BLACK;
    }

    let (Some(offset), Some(limit)) = (bitmap.pixel_offset(x, y), bitmap.declared_len()) else {
        return RgbColor::BLACK;
    };
    // bytes_per_pixel is positive once `check` passed
    let bpp = bitmap.bytes_per_pixel as usize;
    match offset.checked_add(bpp) {
        Some(end) if end <= limit => bitmap.decode_at(offset).unwrap_or(RgbColor::BLACK),
        _ => RgbColor::BLACK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::ChannelOrder;

    fn bgra(width: i32, height: i32, stride: i32) -> Bitmap {
        let len = (stride * height) as usize;
        let mut image = vec![0u8; len];
        for y in 0..height {
            for x in 0..width {
                let off = (stride * y + x * 4) as usize;
                image[off] = x as u8; // blue
                image[off + 1] = y as u8; // green
                image[off + 2] = 200; // red
                image[off + 3] = 255;
            }
        }
        Bitmap {
            image: Some(image),
            width,
            height,
            byte_width: stride,
            bits_per_pixel: 32,
            bytes_per_pixel: 4,
            channel_order: ChannelOrder::Bgra,
        }
    }

    #[test]
    fn test_valid_bitmap_reads_pixels() {
        let bmp = bgra(4, 3, 16);
        assert!(is_valid(&bmp, PixelFormatPolicy::Strict));
        assert_eq!(safe_get_pixel(&bmp, 2, 1, PixelFormatPolicy::Strict), RgbColor::new(200, 1, 2));
    }

    #[test]
    fn test_padded_stride_is_respected() {
        // 3 pixels wide, 4 bytes of row padding.
        let bmp = bgra(3, 2, 16);
        assert_eq!(safe_get_pixel(&bmp, 2, 1, PixelFormatPolicy::Strict), RgbColor::new(200, 1, 2));
    }

    #[test]
    fn test_rejections() {
        let policy = PixelFormatPolicy::Strict;

        let mut bmp = bgra(2, 2, 8);
        bmp.image = None;
        assert_eq!(check(&bmp, policy), Err(InvalidBitmap::MissingBuffer));

        let mut bmp = bgra(2, 2, 8);
        bmp.width = 0;
        assert!(matches!(check(&bmp, policy), Err(InvalidBitmap::BadDimensions { .. })));

        let mut bmp = bgra(2, 2, 8);
        bmp.height = -3;
        assert!(matches!(check(&bmp, policy), Err(InvalidBitmap::BadDimensions { .. })));

        let mut bmp = bgra(2, 2, 8);
        bmp.byte_width = 0;
        assert_eq!(check(&bmp, policy), Err(InvalidBitmap::BadStride(0)));

        let mut bmp = bgra(2, 2, 8);
        bmp.bits_per_pixel = 16;
        assert_eq!(check(&bmp, policy), Err(InvalidBitmap::BadBitsPerPixel(16)));

        let mut bmp = bgra(2, 2, 8);
        bmp.bytes_per_pixel = 3;
        assert!(matches!(check(&bmp, policy), Err(InvalidBitmap::BadBytesPerPixel { .. })));

        let mut bmp = bgra(2, 2, 8);
        bmp.image = Some(vec![0; 12]);
        assert_eq!(
            check(&bmp, policy),
            Err(InvalidBitmap::LengthMismatch { expected: 16, actual: 12 })
        );

        let mut bmp = bgra(2, 2, 8);
        bmp.image = Some(vec![0; 20]);
        assert_eq!(
            check(&bmp, policy),
            Err(InvalidBitmap::LengthMismatch { expected: 16, actual: 20 })
        );
    }

    #[test]
    fn test_lenient_policy_accepts_wider_formats() {
        let mut bmp = bgra(2, 2, 16);
        bmp.bits_per_pixel = 64;
        bmp.bytes_per_pixel = 8;
        assert!(!is_valid(&bmp, PixelFormatPolicy::Strict));
        assert!(is_valid(&bmp, PixelFormatPolicy::Lenient));

        bmp.bytes_per_pixel = 9;
        assert!(!is_valid(&bmp, PixelFormatPolicy::Lenient));

        bmp.bytes_per_pixel = 8;
        bmp.bits_per_pixel = 72;
        assert!(!is_valid(&bmp, PixelFormatPolicy::Lenient));
    }

    #[test]
    fn test_out_of_bounds_reads_degrade() {
        let bmp = bgra(4, 3, 16);
        let p = PixelFormatPolicy::Strict;
        assert_eq!(safe_get_pixel(&bmp, -1, 0, p), RgbColor::BLACK);
        assert_eq!(safe_get_pixel(&bmp, 0, -1, p), RgbColor::BLACK);
        assert_eq!(safe_get_pixel(&bmp, 4, 0, p), RgbColor::BLACK);
        assert_eq!(safe_get_pixel(&bmp, 0, 3, p), RgbColor::BLACK);
        assert_eq!(safe_get_pixel(&bmp, i32::MAX, i32::MAX, p), RgbColor::BLACK);
    }

    #[test]
    fn test_stride_shorter_than_row_is_rejected() {
        // Metadata claims 4 pixels per row but the stride only holds 2.
        let mut bmp = bgra(2, 2, 8);
        bmp.width = 4;
        let p = PixelFormatPolicy::Strict;
        assert_eq!(
            check(&bmp, p),
            Err(InvalidBitmap::StrideTooSmall { stride: 8, row: 16 })
        );
        // (2, 0) would alias into row 1.
        assert_eq!(safe_get_pixel(&bmp, 2, 0, p), RgbColor::BLACK);
        assert_eq!(safe_get_pixel(&bmp, 3, 1, p), RgbColor::BLACK);
    }

    #[test]
    fn test_every_in_grid_read_stays_below_declared_len() {
        for (w, h, stride) in [(1, 1, 4), (3, 2, 12), (3, 2, 16), (5, 5, 20)] {
            let bmp = bgra(w, h, stride);
            let limit = bmp.declared_len().unwrap();
            for y in 0..h {
                for x in 0..w {
                    let off = bmp.pixel_offset(x, y).unwrap();
                    assert!(off + 4 <= limit);
                }
            }
        }
    }

    #[test]
    fn test_malformed_bitmap_without_buffer_returns_black() {
        let bmp = Bitmap {
            image: None,
            width: 10,
            height: 10,
            byte_width: 40,
            bits_per_pixel: 32,
            bytes_per_pixel: 4,
            channel_order: ChannelOrder::Bgra,
        };
        assert_eq!(safe_get_pixel(&bmp, 0, 0, PixelFormatPolicy::Lenient), RgbColor::BLACK);
    }
}
