//! Pose observation types for the RallyCut tracking stream.
//!
//! Observations are stored in append-only JSONL format: a `# {header}`
//! comment line followed by one JSON object per decoded frame. Timestamps
//! are fractional seconds and must be strictly increasing; the analysis
//! engine treats that as a caller contract.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Number of keypoints per pose (standard COCO body layout).
pub const KEYPOINT_COUNT: usize = 17;

/// COCO keypoint indices for the lower body.
pub const LEFT_HIP: usize = 11;
pub const RIGHT_HIP: usize = 12;
pub const LEFT_KNEE: usize = 13;
pub const RIGHT_KNEE: usize = 14;
pub const LEFT_ANKLE: usize = 15;
pub const RIGHT_ANKLE: usize = 16;

/// Hips, knees, and ankles — the joints checked for core-zone presence.
pub const LOWER_BODY_KEYPOINTS: [usize; 6] = [
    LEFT_HIP, RIGHT_HIP, LEFT_KNEE, RIGHT_KNEE, LEFT_ANKLE, RIGHT_ANKLE,
];

/// A single detected body keypoint in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    /// X position in pixels.
    pub x: f64,

    /// Y position in pixels.
    pub y: f64,

    /// Detection confidence [0.0, 1.0].
    #[serde(rename = "c")]
    pub confidence: f64,
}

/// One tracked person in one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Stable tracking id assigned by the upstream tracker.
    pub id: u64,

    /// 17 keypoints in COCO order. Shorter vectors are tolerated; missing
    /// indices simply never match the core zone.
    #[serde(rename = "kp")]
    pub keypoints: Vec<Keypoint>,
}

impl Pose {
    /// Iterate over the lower-body keypoints present in this pose.
    pub fn lower_body(&self) -> impl Iterator<Item = &Keypoint> {
        LOWER_BODY_KEYPOINTS
            .iter()
            .filter_map(|&idx| self.keypoints.get(idx))
    }
}

/// All poses observed in a single decoded frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameObservation {
    /// Timestamp in fractional seconds from video start.
    #[serde(rename = "t")]
    pub timestamp_secs: f64,

    /// Poses present in this frame. May be empty.
    pub poses: Vec<Pose>,
}

/// Stream metadata written as the `# {...}` comment line of a pose file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Source video filename or path.
    pub video: String,

    /// Frame dimensions in pixels.
    pub frame_width: u32,
    pub frame_height: u32,

    /// Nominal frame rate of the source video.
    pub fps: f64,

    /// Total frame count, if the producer knew it.
    #[serde(default)]
    pub total_frames: Option<u64>,
}

/// Parse observations from JSONL content (one JSON object per line).
pub fn parse_observations(jsonl: &str) -> Result<Vec<FrameObservation>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize observations to JSONL format.
pub fn serialize_observations(
    observations: &[FrameObservation],
) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for obs in observations {
        output.push_str(&serde_json::to_string(obs)?);
        output.push('\n');
    }
    Ok(output)
}

/// Read a pose stream file, splitting the header comment from the body.
pub fn read_observation_file(
    path: impl AsRef<Path>,
) -> Result<(ObservationHeader, Vec<FrameObservation>), ObservationError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ObservationError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let header_line = content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .filter(|line| line.starts_with('#'))
        .ok_or_else(|| ObservationError::MissingHeader {
            path: path.to_path_buf(),
        })?;

    let header: ObservationHeader = serde_json::from_str(header_line.trim_start_matches('#').trim())
        .map_err(|e| ObservationError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

    let observations =
        parse_observations(&content).map_err(|e| ObservationError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok((header, observations))
}

/// Errors that can occur when reading pose stream files.
#[derive(Debug, thiserror::Error)]
pub enum ObservationError {
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

    #[error("Missing `# {{...}}` header line in {path}")]
    MissingHeader { path: PathBuf },
}
