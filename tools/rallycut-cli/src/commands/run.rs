//! Analyze a pose stream and export clips in one pass.

use std::path::PathBuf;

use rallycut_common::config::AppConfig;
use rallycut_export::{export_clips, ClipJob};

use super::analyze::{self, AnalysisOpts};

pub async fn run(
    video: PathBuf,
    poses: PathBuf,
    surface: Option<PathBuf>,
    output: Option<PathBuf>,
    opts: &AnalysisOpts,
) -> anyhow::Result<()> {
    let output_dir = output.unwrap_or_else(|| AppConfig::load().output_dir);
    std::fs::create_dir_all(&output_dir)?;

    let stem = video
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string());
    let report_path = output_dir.join(format!("{stem}.highlights.json"));

    let report = analyze::run(poses, surface, report_path, opts)?;
    if report.intervals.is_empty() {
        return Ok(());
    }

    let job = ClipJob {
        video,
        output_dir,
        intervals: report.intervals,
    };

    let written = export_clips(job).await?;
    println!("\nAll done: {} clips written.", written.len());
    for path in &written {
        println!("  {}", path.display());
    }

    Ok(())
}
