//! Cut highlight clips from an existing report.

use std::path::PathBuf;

use rallycut_common::config::AppConfig;
use rallycut_export::{export_clips, ClipJob};
use rallycut_model::HighlightReport;

pub async fn run(video: PathBuf, report: PathBuf, output: Option<PathBuf>) -> anyhow::Result<()> {
    let report = HighlightReport::load(&report)
        .map_err(|e| anyhow::anyhow!("Failed to load report: {e}"))?;

    if report.intervals.is_empty() {
        println!("Report contains no highlights; nothing to export.");
        return Ok(());
    }

    let output_dir = output.unwrap_or_else(|| AppConfig::load().output_dir);
    println!(
        "Exporting {} clips from {} to {}",
        report.intervals.len(),
        video.display(),
        output_dir.display()
    );

    let job = ClipJob {
        video,
        output_dir,
        intervals: report.intervals,
    };

    let written = export_clips(job).await?;
    for path in &written {
        println!("  {}", path.display());
    }
    println!("Export complete: {} clips.", written.len());

    Ok(())
}
