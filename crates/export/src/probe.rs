//! ffprobe wrappers for media metadata.

use std::path::Path;
use std::process::Command;

use rallycut_common::error::{RallycutError, RallycutResult};

/// Whether a binary is reachable through the shell.
pub fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Container duration of a video in seconds.
pub fn duration_secs(path: &Path) -> RallycutResult<f64> {
    let raw = run_ffprobe(
        path,
        &[
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ],
    )?;

    raw.trim()
        .parse::<f64>()
        .map_err(|e| RallycutError::probe(format!("Unparseable duration {raw:?}: {e}")))
}

/// Width and height of the first video stream.
pub fn dimensions(path: &Path) -> RallycutResult<(u32, u32)> {
    let raw = run_ffprobe(
        path,
        &[
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height",
            "-of",
            "csv=p=0:s=x",
        ],
    )?;

    let line = raw.lines().next().unwrap_or("").trim();
    let (w, h) = line
        .split_once('x')
        .ok_or_else(|| RallycutError::probe(format!("Unparseable dimensions {line:?}")))?;
    let width = w
        .parse::<u32>()
        .map_err(|e| RallycutError::probe(format!("Unparseable width {w:?}: {e}")))?;
    let height = h
        .parse::<u32>()
        .map_err(|e| RallycutError::probe(format!("Unparseable height {h:?}: {e}")))?;
    Ok((width, height))
}

fn run_ffprobe(path: &Path, args: &[&str]) -> RallycutResult<String> {
    let output = Command::new("ffprobe")
        .args(args)
        .arg(path)
        .output()
        .map_err(|e| RallycutError::probe(format!("Failed to start ffprobe: {e}")))?;

    if !output.status.success() {
        return Err(RallycutError::probe(format!(
            "ffprobe failed on {} (status {}): {}",
            path.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    String::from_utf8(output.stdout)
        .map_err(|e| RallycutError::probe(format!("Non-UTF8 ffprobe output: {e}")))
}
