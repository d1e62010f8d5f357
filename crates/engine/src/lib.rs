//! RallyCut Engine — rally detection
//!
//! Turns a per-frame pose tracking stream into rally time intervals:
//! - **Scoreboard:** Per-player relevance scoring and VIP promotion
//! - **Rally machine:** Hysteresis segmentation into finalized intervals
//! - **Detector:** The per-video facade tying both together
//!
//! This crate is pure computation: all inputs are data, all outputs are
//! data, and there is no I/O. One detector instance per video, fed
//! strictly once per frame in increasing timestamp order.

pub mod detector;
pub mod rally;
pub mod scoreboard;

pub use detector::{DetectorConfig, RallyDetector};
pub use rally::{DwellThreshold, RallyConfig, RallyMachine};
pub use scoreboard::{FramePresence, Scoreboard, ScoringConfig};
