//! Highlight report document (`highlights.json`).
//!
//! The report is the boundary between analysis and clip export: an ordered,
//! append-only list of rally intervals plus enough context (video, zone) to
//! cut clips later without re-running the analysis.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::zone::CoreZone;

/// A finalized rally span in seconds. Immutable once emitted.
///
/// `start_secs` is never negative; `end_secs > start_secs`. The export side
/// is responsible for clamping `end_secs` to the real video duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RallyInterval {
    pub start_secs: f64,
    pub end_secs: f64,
}

impl RallyInterval {
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }
}

/// Top-level highlight report file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightReport {
    /// Schema version.
    pub version: String,

    /// Source video filename or path.
    pub video: String,

    /// Creation timestamp (RFC 3339).
    pub created_at: String,

    /// Core zone the analysis ran with.
    pub zone: CoreZone,

    /// Finalized rally intervals in emission order.
    pub intervals: Vec<RallyInterval>,
}

impl HighlightReport {
    /// Create a new report for a video.
    pub fn new(video: impl Into<String>, zone: CoreZone, intervals: Vec<RallyInterval>) -> Self {
        Self {
            version: "1.0".to_string(),
            video: video.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
            zone,
            intervals,
        }
    }

    /// Load a report from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ReportError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| ReportError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Save the report to disk as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ReportError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| ReportError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        std::fs::write(path, json).map_err(|e| ReportError::IoError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Total highlighted time across all intervals.
    pub fn total_secs(&self) -> f64 {
        self.intervals.iter().map(RallyInterval::duration_secs).sum()
    }
}

/// Errors that can occur when working with highlight reports.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
}
