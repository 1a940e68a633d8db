//! Recording platform for dispatcher tests.

use crate::bitmap::{Bitmap, ChannelOrder};
use crate::color::RgbColor;
use crate::geometry::{Point, Rect, Size};
use crate::keys::{KeyCode, KeyFlags, MouseButton};
use crate::platform::{DisplayRecord, Platform, PlatformError, PlatformResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Move(Point),
    Button(MouseButton, bool),
    Scroll(i32, i32),
    Key(KeyCode, bool, KeyFlags),
    Capture(Rect),
    Sleep(Duration),
    RefreshMetrics,
}

pub(crate) type CallLog = Arc<Mutex<Vec<Call>>>;

pub(crate) struct MockPlatform {
    pub log: CallLog,
    pub cursor: Mutex<Point>,
    pub displays: Vec<DisplayRecord>,
    pub primary: u32,
    pub pixel: RgbColor,
    pub fail_capture: bool,
    /// Claim 32 bpp but hand back a 3-byte-per-pixel buffer.
    pub malformed_capture: bool,
    pub probe_ok: bool,
    /// Fail the n-th (1-based) cursor move.
    pub fail_move_at: Option<usize>,
    moves: AtomicUsize,
    pub x_display_name: Mutex<Option<String>>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            cursor: Mutex::new(Point::new(0, 0)),
            displays: vec![
                DisplayRecord {
                    id: 1,
                    rect: Rect::new(0, 0, 1920, 1080),
                },
                DisplayRecord {
                    id: 2,
                    rect: Rect::new(1920, 0, 1280, 1024),
                },
            ],
            primary: 1,
            pixel: RgbColor::new(0x12, 0x34, 0x56),
            fail_capture: false,
            malformed_capture: false,
            probe_ok: true,
            fail_move_at: None,
            moves: AtomicUsize::new(0),
            x_display_name: Mutex::new(None),
        }
    }

    /// Sleep hook that appends to this platform's call log.
    pub fn sleeper(&self) -> impl Fn(Duration) + Send + Sync + 'static {
        let log = Arc::clone(&self.log);
        move |d| log.lock().unwrap().push(Call::Sleep(d))
    }

    fn record(&self, call: Call) {
        self.log.lock().unwrap().push(call);
    }
}

pub(crate) fn calls(log: &CallLog) -> Vec<Call> {
    log.lock().unwrap().clone()
}

pub(crate) fn clear(log: &CallLog) {
    log.lock().unwrap().clear();
}

impl Platform for MockPlatform {
    fn move_cursor_to(&self, point: Point) -> PlatformResult<()> {
        let n = self.moves.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_move_at == Some(n) {
            return Err(PlatformError::InjectionFailed("mock move disabled".into()));
        }
        *self.cursor.lock().unwrap() = point;
        self.record(Call::Move(point));
        Ok(())
    }

    fn cursor_position(&self) -> PlatformResult<Point> {
        Ok(*self.cursor.lock().unwrap())
    }

    fn post_button_event(&self, button: MouseButton, down: bool) -> PlatformResult<()> {
        self.record(Call::Button(button, down));
        Ok(())
    }

    fn post_scroll(&self, dx: i32, dy: i32) -> PlatformResult<()> {
        self.record(Call::Scroll(dx, dy));
        Ok(())
    }

    fn post_key_event(&self, code: KeyCode, down: bool, flags: KeyFlags) -> PlatformResult<()> {
        self.record(Call::Key(code, down, flags));
        Ok(())
    }

    fn char_key(&self, ch: char) -> (KeyCode, KeyFlags) {
        if ch.is_ascii_uppercase() {
            (KeyCode::Char(ch.to_ascii_lowercase()), KeyFlags::SHIFT)
        } else {
            (KeyCode::Char(ch), KeyFlags::NONE)
        }
    }

    fn capture_rect(&self, rect: Rect) -> PlatformResult<Bitmap> {
        self.record(Call::Capture(rect));
        if self.fail_capture {
            return Err(PlatformError::CaptureFailed("mock capture disabled".into()));
        }
        let (w, h) = (rect.width(), rect.height());
        let pixels = (w * h) as usize;
        if self.malformed_capture {
            let mut bmp = Bitmap::packed(vec![0; pixels * 3], w, h, 3, ChannelOrder::Bgra);
            bmp.bits_per_pixel = 32;
            return Ok(bmp);
        }
        let px = [self.pixel.b, self.pixel.g, self.pixel.r, 0xFF];
        let image = px.iter().copied().cycle().take(pixels * 4).collect();
        Ok(Bitmap::packed(image, w, h, 4, ChannelOrder::Bgra))
    }

    fn enumerate_displays(&self) -> PlatformResult<Vec<DisplayRecord>> {
        Ok(self.displays.clone())
    }

    fn main_display_size(&self) -> PlatformResult<Size> {
        self.displays
            .iter()
            .find(|d| d.id == self.primary)
            .map(|d| d.rect.size)
            .ok_or_else(|| PlatformError::EnumerationFailed("no primary display".into()))
    }

    fn primary_display_id(&self) -> PlatformResult<u32> {
        Ok(self.primary)
    }

    fn probe_display(&self) -> bool {
        self.probe_ok
    }

    fn refresh_metrics(&self) -> PlatformResult<()> {
        self.record(Call::RefreshMetrics);
        Ok(())
    }

    fn x_display_name(&self) -> PlatformResult<String> {
        Ok(self
            .x_display_name
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| ":0".into()))
    }

    fn set_x_display_name(&self, name: &str) -> PlatformResult<()> {
        *self.x_display_name.lock().unwrap() = Some(name.to_string());
        Ok(())
    }
}
