//! RallyCut Export
//!
//! The downstream boundary of the pipeline: takes finalized rally
//! intervals and cuts them out of the source video with ffmpeg stream
//! copy (no re-encode). Also wraps ffprobe for duration and dimension
//! queries.

pub mod clip;
pub mod probe;

pub use clip::{export_clips, ClipBackend, ClipJob, FfmpegBackend};
