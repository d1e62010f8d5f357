//! The core activity zone.
//!
//! A rectangle around the table where rally activity is expected. Derived
//! from a detected surface box, or from a central-frame fallback when no
//! table was found. The analysis engine only ever sees the final rectangle
//! and is agnostic to how it was derived.

use serde::{Deserialize, Serialize};

use crate::surface::SurfaceBox;

/// Default expansion factor applied to the surface box.
pub const DEFAULT_ZONE_EXPANSION: f64 = 1.4;

/// Extra vertical stretch so the zone covers player stance behind the
/// table on both sides.
const VERTICAL_STRETCH: f64 = 1.5;

/// Rectangular core zone in frame pixel coordinates.
///
/// Invariants: `x1 < x2`, `y1 < y2`, all edges within
/// `[0, frame_width] x [0, frame_height]` (clamped at construction).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoreZone {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CoreZone {
    /// Build a zone from raw corners, ordering and clamping to the frame.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64, frame_width: u32, frame_height: u32) -> Self {
        let w = frame_width as f64;
        let h = frame_height as f64;
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let (y1, y2) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        Self {
            x1: x1.clamp(0.0, w),
            y1: y1.clamp(0.0, h),
            x2: x2.clamp(0.0, w),
            y2: y2.clamp(0.0, h),
        }
    }

    /// Derive the zone from a detected surface box.
    ///
    /// The surface rectangle is scaled by `expansion` horizontally and by
    /// `expansion * 1.5` vertically, re-centered on the surface center, and
    /// clamped to the frame.
    pub fn from_surface(
        surface: &SurfaceBox,
        frame_width: u32,
        frame_height: u32,
        expansion: f64,
    ) -> Self {
        let (cx, cy) = surface.center();
        let zone_w = surface.width() * expansion;
        let zone_h = surface.height() * expansion * VERTICAL_STRETCH;

        Self::new(
            cx - zone_w / 2.0,
            cy - zone_h / 2.0,
            cx + zone_w / 2.0,
            cy + zone_h / 2.0,
            frame_width,
            frame_height,
        )
    }

    /// Fallback zone covering the central 50% of the frame by area.
    ///
    /// Used when no table was detected. Better than the whole frame: it
    /// still filters out bystanders near the edges.
    pub fn central_fallback(frame_width: u32, frame_height: u32) -> Self {
        let w = frame_width as f64;
        let h = frame_height as f64;
        let zone_w = w * 0.5;
        let zone_h = h * 0.5;
        Self::new(
            (w - zone_w) / 2.0,
            (h - zone_h) / 2.0,
            (w + zone_w) / 2.0,
            (h + zone_h) / 2.0,
            frame_width,
            frame_height,
        )
    }

    /// Whether a point lies inside the zone (inclusive on all bounds).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x1 <= x && x <= self.x2 && self.y1 <= y && y <= self.y2
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}
