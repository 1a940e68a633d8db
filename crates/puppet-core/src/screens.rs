//! Display enumeration and index-based screen lookup.
//!
//! Index 0 means the virtual screen (the union of every display); indices
//! `1..=count` select a single display in platform order.

use crate::geometry::Rect;
use crate::platform::{DisplayRecord, Platform, PlatformResult};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One display, as handed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenInfo {
    pub rect: Rect,
    pub id: u32,
    pub is_primary: bool,
}

/// Bounding box over all displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualScreen {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
    pub width: i32,
    pub height: i32,
}

impl VirtualScreen {
    pub fn to_rect(self) -> Rect {
        Rect::new(self.min_x, self.min_y, self.width, self.height)
    }
}

/// Result of an index lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScreenSize {
    Virtual(VirtualScreen),
    Monitor(Rect),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScreenLookupError {
    #[error("no displays attached")]
    NoDisplays,
    #[error("no screen at index {index} ({count} attached)")]
    OutOfRange { index: i64, count: usize },
}

/// Bounding box of `rects`, or `None` when there are none.
pub fn virtual_bounds(rects: &[Rect]) -> Option<VirtualScreen> {
    let (first, rest) = rects.split_first()?;
    let union = rest.iter().fold(*first, |acc, r| acc.union(r));
    Some(VirtualScreen {
        min_x: union.x(),
        min_y: union.y(),
        max_x: union.right(),
        max_y: union.bottom(),
        width: union.width(),
        height: union.height(),
    })
}

/// Snapshot view over the platform's displays.
pub struct ScreenEnumerator<'a, P: Platform + ?Sized> {
    platform: &'a P,
}

impl<'a, P: Platform + ?Sized> ScreenEnumerator<'a, P> {
    pub fn new(platform: &'a P) -> Self {
        Self { platform }
    }

    pub fn count(&self) -> PlatformResult<usize> {
        Ok(self.platform.enumerate_displays()?.len())
    }

    pub fn main_display_id(&self) -> PlatformResult<u32> {
        self.platform.primary_display_id()
    }

    pub fn info_with_ids(&self) -> PlatformResult<Vec<ScreenInfo>> {
        let displays = self.platform.enumerate_displays()?;
        let primary = self.platform.primary_display_id()?;
        Ok(displays
            .into_iter()
            .map(|DisplayRecord { id, rect }| ScreenInfo {
                rect,
                id,
                is_primary: id == primary,
            })
            .collect())
    }

    /// Look up a screen by index; see the module docs for numbering.
    pub fn screen_size(&self, index: i64) -> PlatformResult<Result<ScreenSize, ScreenLookupError>> {
        let displays = self.platform.enumerate_displays()?;
        Ok(lookup(&displays, index))
    }
}

fn lookup(displays: &[DisplayRecord], index: i64) -> Result<ScreenSize, ScreenLookupError> {
    let count = displays.len();
    if count == 0 {
        return Err(ScreenLookupError::NoDisplays);
    }
    if index == 0 {
        let rects: Vec<Rect> = displays.iter().map(|d| d.rect).collect();
        return virtual_bounds(&rects)
            .map(ScreenSize::Virtual)
            .ok_or(ScreenLookupError::NoDisplays);
    }
    usize::try_from(index)
        .ok()
        .and_then(|i| displays.get(i.checked_sub(1)?))
        .map(|d| ScreenSize::Monitor(d.rect))
        .ok_or(ScreenLookupError::OutOfRange { index, count })
}
