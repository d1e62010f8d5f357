//! Surface (table) detection results.
//!
//! The upstream table detector writes one `surface.json` sidecar per video
//! with every candidate box it saw during the search window. Selection of
//! the box to build the core zone from happens here, with an explicit
//! comparator: candidates below 5% of the frame area are ignored, the
//! largest remaining area wins, and the first-seen candidate wins ties.

use serde::{Deserialize, Serialize};

/// Candidates smaller than this fraction of the frame area are noise.
pub const MIN_SURFACE_AREA_RATIO: f64 = 0.05;

/// A candidate table bounding box in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,

    /// Detector confidence [0.0, 1.0].
    pub confidence: f64,
}

impl SurfaceBox {
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }
}

/// All candidate boxes from one table-detection pass over a video.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurfaceScan {
    pub candidates: Vec<SurfaceBox>,
}

impl SurfaceScan {
    /// Select the box to build the core zone from.
    ///
    /// Strict `>` on area keeps the first-seen candidate on exact ties.
    pub fn best_box(&self, frame_width: u32, frame_height: u32) -> Option<&SurfaceBox> {
        let frame_area = frame_width as f64 * frame_height as f64;
        let min_area = frame_area * MIN_SURFACE_AREA_RATIO;

        let mut best: Option<&SurfaceBox> = None;
        for candidate in &self.candidates {
            if candidate.area() < min_area {
                continue;
            }
            match best {
                Some(current) if candidate.area() > current.area() => best = Some(candidate),
                None => best = Some(candidate),
                _ => {}
            }
        }
        best
    }
}
