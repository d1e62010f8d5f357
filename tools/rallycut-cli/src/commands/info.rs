//! Show a highlight report.

use std::path::PathBuf;

use rallycut_model::HighlightReport;

pub fn run(report: PathBuf) -> anyhow::Result<()> {
    let report = HighlightReport::load(&report)
        .map_err(|e| anyhow::anyhow!("Failed to load report: {e}"))?;

    println!("Video: {}", report.video);
    println!("  Created: {}", report.created_at);
    println!("  Schema: {}", report.version);
    println!(
        "  Core zone: ({:.0}, {:.0}) - ({:.0}, {:.0})",
        report.zone.x1, report.zone.y1, report.zone.x2, report.zone.y2
    );
    println!();

    println!("Highlights: {}", report.intervals.len());
    for (i, interval) in report.intervals.iter().enumerate() {
        println!(
            "  {:>3}. {:>8.1}s - {:>8.1}s  ({:.1}s)",
            i + 1,
            interval.start_secs,
            interval.end_secs,
            interval.duration_secs()
        );
    }
    if !report.intervals.is_empty() {
        println!("  Total: {:.1}s", report.total_secs());
    }

    Ok(())
}
