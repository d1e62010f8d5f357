//! RallyCut Model
//!
//! Defines the core data contracts for RallyCut:
//! - **Observations:** Per-frame pose tracking results (entity ids + keypoints)
//! - **Surface:** Table detection candidates and best-box selection
//! - **Zone:** The core activity region derived from the table location
//! - **Report:** Finalized rally intervals and the highlight report document
//!
//! All coordinates are in frame pixel space; timestamps are fractional
//! seconds from the start of the source video.

pub mod observation;
pub mod report;
pub mod surface;
pub mod zone;

pub use observation::*;
pub use report::*;
pub use surface::*;
pub use zone::*;
