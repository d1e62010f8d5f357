//! Lossless clip extraction.
//!
//! Each rally interval becomes one numbered file under
//! `<output_dir>/<video_stem>/`. Extraction is a straight ffmpeg stream
//! copy: `-ss` before `-i` for fast seeking, `-c copy` so nothing is
//! re-encoded. Interval ends are clamped to the probed video duration
//! before cutting; the analysis side never knows the real duration.

use std::path::{Path, PathBuf};
use std::process::Command;

use rallycut_common::error::{RallycutError, RallycutResult};
use rallycut_model::RallyInterval;

use crate::probe;

/// A clip export job: one source video, many intervals.
#[derive(Debug, Clone)]
pub struct ClipJob {
    /// Source video path.
    pub video: PathBuf,

    /// Directory that receives the per-video clip folder.
    pub output_dir: PathBuf,

    /// Finalized intervals from the analysis.
    pub intervals: Vec<RallyInterval>,
}

/// Trait for clip-cutting backends.
pub trait ClipBackend: Send {
    /// Cut `[interval.start, interval.end]` out of `video` into `output`.
    fn cut(&self, video: &Path, interval: RallyInterval, output: &Path) -> RallycutResult<()>;

    /// Check if this backend is available on the system.
    fn is_available(&self) -> bool;

    /// Backend name.
    fn name(&self) -> &str;
}

/// Stream-copy extraction via the ffmpeg CLI.
pub struct FfmpegBackend;

impl FfmpegBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FfmpegBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipBackend for FfmpegBackend {
    fn cut(&self, video: &Path, interval: RallyInterval, output: &Path) -> RallycutResult<()> {
        let args = cut_args(video, interval, output);
        tracing::debug!(?args, "Running ffmpeg");

        let result = Command::new("ffmpeg")
            .args(&args)
            .output()
            .map_err(|e| RallycutError::export(format!("Failed to start ffmpeg: {e}")))?;

        if !result.status.success() {
            return Err(RallycutError::export(format!(
                "ffmpeg cut failed (status {}): {}",
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            )));
        }

        Ok(())
    }

    fn is_available(&self) -> bool {
        probe::command_exists("ffmpeg")
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

/// Export all intervals of a job as numbered clips.
///
/// This is the main entry point for clip extraction. Returns the paths of
/// the written clips in order.
pub async fn export_clips(job: ClipJob) -> RallycutResult<Vec<PathBuf>> {
    if !job.video.exists() {
        return Err(RallycutError::FileNotFound {
            path: job.video.clone(),
        });
    }

    let backend = FfmpegBackend::new();
    if !backend.is_available() {
        return Err(RallycutError::unsupported(
            "No supported clip backend found (expected ffmpeg in PATH)",
        ));
    }

    let duration = probe::duration_secs(&job.video)?;
    let clip_dir = job.output_dir.join(video_stem(&job.video));
    std::fs::create_dir_all(&clip_dir)?;

    tracing::info!(
        video = %job.video.display(),
        clips = job.intervals.len(),
        duration_secs = duration,
        backend = backend.name(),
        "Starting clip export"
    );

    let mut written = Vec::new();
    for interval in &job.intervals {
        let Some(clamped) = clamp_interval(*interval, duration) else {
            tracing::warn!(
                start_secs = interval.start_secs,
                end_secs = interval.end_secs,
                "Interval past end of video, skipped"
            );
            continue;
        };

        let output = clip_dir.join(clip_filename(written.len() + 1));
        backend.cut(&job.video, clamped, &output)?;
        tracing::info!(clip = %output.display(), "Clip written");
        written.push(output);
    }

    Ok(written)
}

/// Clamp an interval's end to the video duration. Returns `None` when
/// nothing of the interval remains.
fn clamp_interval(interval: RallyInterval, duration_secs: f64) -> Option<RallyInterval> {
    let end_secs = interval.end_secs.min(duration_secs);
    if end_secs <= interval.start_secs {
        return None;
    }
    Some(RallyInterval {
        start_secs: interval.start_secs,
        end_secs,
    })
}

fn clip_filename(n: usize) -> String {
    format!("highlight_{n:03}.mp4")
}

fn video_stem(video: &Path) -> String {
    video
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string())
}

fn cut_args(video: &Path, interval: RallyInterval, output: &Path) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-ss".to_string(),
        format!("{:.3}", interval.start_secs),
        "-i".to_string(),
        video.display().to_string(),
        "-t".to_string(),
        format!("{:.3}", interval.duration_secs()),
        "-c".to_string(),
        "copy".to_string(),
        "-avoid_negative_ts".to_string(),
        "1".to_string(),
        output.display().to_string(),
    ]
}
