//! Windows implementation using GDI.
//!
//! Display ids are enumeration indices. Captures are top-down 32 bpp BGRA DIBs.

use puppet_core::{
    Bitmap, ChannelOrder, DisplayRecord, PlatformError, PlatformResult, Rect, Size,
};
use std::ptr;
use windows_sys::Win32::Foundation::{BOOL, LPARAM, RECT, TRUE};
use windows_sys::Win32::Graphics::Gdi::{
    BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject,
    EnumDisplayMonitors, GetDC, GetDIBits, GetMonitorInfoW, ReleaseDC, SelectObject, BITMAPINFO,
    BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS, HDC, HMONITOR, MONITORINFO, RGBQUAD, SRCCOPY,
};
use windows_sys::Win32::UI::WindowsAndMessaging::{GetSystemMetrics, SM_CXSCREEN, SM_CYSCREEN};

pub const CHANNEL_ORDER: ChannelOrder = ChannelOrder::Bgra;

const MONITORINFOF_PRIMARY: u32 = 1;

struct Monitor {
    rect: Rect,
    primary: bool,
}

fn monitors() -> Vec<Monitor> {
    let mut out: Vec<Monitor> = Vec::new();
    unsafe {
        EnumDisplayMonitors(
            ptr::null_mut(),
            ptr::null(),
            Some(enum_monitor_callback),
            &mut out as *mut Vec<Monitor> as LPARAM,
        );
    }
    out
}

unsafe extern "system" fn enum_monitor_callback(
    monitor: HMONITOR,
    _hdc: HDC,
    _clip: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    let out = &mut *(lparam as *mut Vec<Monitor>);

    let mut info: MONITORINFO = std::mem::zeroed();
    info.cbSize = std::mem::size_of::<MONITORINFO>() as u32;
    if GetMonitorInfoW(monitor, &mut info) != 0 {
        let r = info.rcMonitor;
        out.push(Monitor {
            rect: Rect::new(r.left, r.top, r.right - r.left, r.bottom - r.top),
            primary: info.dwFlags & MONITORINFOF_PRIMARY != 0,
        });
    }

    TRUE
}

pub fn displays() -> PlatformResult<Vec<DisplayRecord>> {
    Ok(monitors()
        .into_iter()
        .enumerate()
        .map(|(i, m)| DisplayRecord {
            id: i as u32,
            rect: m.rect,
        })
        .collect())
}

pub fn primary_id() -> PlatformResult<u32> {
    let monitors = monitors();
    if monitors.is_empty() {
        return Err(PlatformError::EnumerationFailed("no monitors".into()));
    }
    let index = monitors
        .iter()
        .position(|m| m.primary)
        .or_else(|| monitors.iter().position(|m| m.rect.x() == 0 && m.rect.y() == 0))
        .unwrap_or(0);
    Ok(index as u32)
}

pub fn main_size() -> PlatformResult<Size> {
    let (w, h) = unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };
    if w <= 0 || h <= 0 {
        return Err(PlatformError::EnumerationFailed(format!("screen metrics {w}x{h}")));
    }
    Ok(Size::new(w, h))
}

pub fn probe() -> bool {
    unsafe {
        let hdc = GetDC(ptr::null_mut());
        if hdc.is_null() {
            return false;
        }
        ReleaseDC(ptr::null_mut(), hdc);
        true
    }
}

pub fn capture(rect: Rect) -> PlatformResult<Bitmap> {
    let (w, h) = (rect.width(), rect.height());
    let failed = |what: &str| PlatformError::CaptureFailed(format!("{what} failed"));

    unsafe {
        let hdc_screen = GetDC(ptr::null_mut());
        if hdc_screen.is_null() {
            return Err(failed("GetDC"));
        }

        let hdc_mem = CreateCompatibleDC(hdc_screen);
        if hdc_mem.is_null() {
            ReleaseDC(ptr::null_mut(), hdc_screen);
            return Err(failed("CreateCompatibleDC"));
        }

        let hbitmap = CreateCompatibleBitmap(hdc_screen, w, h);
        if hbitmap.is_null() {
            DeleteDC(hdc_mem);
            ReleaseDC(ptr::null_mut(), hdc_screen);
            return Err(failed("CreateCompatibleBitmap"));
        }

        let old_bitmap = SelectObject(hdc_mem, hbitmap);
        let copied = BitBlt(hdc_mem, 0, 0, w, h, hdc_screen, rect.x(), rect.y(), SRCCOPY);

        let mut bmi = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: w,
                biHeight: -h, // Top-down
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB,
                biSizeImage: 0,
                biXPelsPerMeter: 0,
                biYPelsPerMeter: 0,
                biClrUsed: 0,
                biClrImportant: 0,
            },
            bmiColors: [RGBQUAD {
                rgbBlue: 0,
                rgbGreen: 0,
                rgbRed: 0,
                rgbReserved: 0,
            }],
        };

        let mut pixels = vec![0u8; (w as usize) * (h as usize) * 4];
        let lines = if copied != 0 {
            GetDIBits(
                hdc_mem,
                hbitmap,
                0,
                h as u32,
                pixels.as_mut_ptr() as *mut _,
                &mut bmi,
                DIB_RGB_COLORS,
            )
        } else {
            0
        };

        SelectObject(hdc_mem, old_bitmap);
        DeleteObject(hbitmap);
        DeleteDC(hdc_mem);
        ReleaseDC(ptr::null_mut(), hdc_screen);

        if copied == 0 {
            return Err(failed("BitBlt"));
        }
        if lines == 0 {
            return Err(failed("GetDIBits"));
        }

        Ok(Bitmap::packed(pixels, w, h, 4, CHANNEL_ORDER))
    }
}
