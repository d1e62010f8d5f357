//! Detect rallies in a pose tracking stream.

use std::path::PathBuf;

use clap::Args;
use rallycut_engine::detector::{DetectorConfig, RallyDetector};
use rallycut_engine::rally::{DwellThreshold, RallyConfig};
use rallycut_engine::scoreboard::ScoringConfig;
use rallycut_model::{
    read_observation_file, CoreZone, HighlightReport, ObservationHeader, SurfaceScan,
};

/// Tuning knobs shared by `analyze` and `run`.
#[derive(Debug, Clone, Args)]
pub struct AnalysisOpts {
    /// Score gained for appearing in a frame
    #[arg(long, default_value = "1")]
    pub score_in_frame: u64,

    /// Additional score gained while inside the core zone
    #[arg(long, default_value = "5")]
    pub score_in_core: u64,

    /// Cumulative score above which a player becomes VIP
    #[arg(long, default_value = "20")]
    pub vip_warmup_score: u64,

    /// Minimum keypoint confidence for the zone test
    #[arg(long, default_value = "0.3")]
    pub keypoint_confidence: f64,

    /// Core-zone dwell (frames) before a VIP counts as strong
    #[arg(long, default_value = "30")]
    pub core_dwell_frames: u32,

    /// Core-zone dwell in seconds; overrides --core-dwell-frames and is
    /// independent of the stream frame rate
    #[arg(long)]
    pub core_dwell_secs: Option<f64>,

    /// Minimum active rally span (seconds) to keep
    #[arg(long, default_value = "1.5")]
    pub min_rally_secs: f64,

    /// Inactivity (seconds) that closes an open rally
    #[arg(long, default_value = "3.0")]
    pub max_dropout_secs: f64,

    /// Padding before each rally (seconds)
    #[arg(long, default_value = "3.0")]
    pub pre_roll: f64,

    /// Padding after each rally (seconds)
    #[arg(long, default_value = "2.0")]
    pub post_roll: f64,

    /// Expansion factor applied to the detected table box
    #[arg(long, default_value = "1.4")]
    pub zone_expansion: f64,

    /// Close a rally still open at end of stream instead of dropping it
    #[arg(long)]
    pub flush_tail: bool,
}

impl AnalysisOpts {
    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            scoring: ScoringConfig {
                score_in_frame: self.score_in_frame,
                score_in_core: self.score_in_core,
                vip_warmup_score: self.vip_warmup_score,
                keypoint_confidence: self.keypoint_confidence,
            },
            rally: RallyConfig {
                core_dwell: match self.core_dwell_secs {
                    Some(secs) => DwellThreshold::Seconds(secs),
                    None => DwellThreshold::Frames(self.core_dwell_frames),
                },
                min_rally_secs: self.min_rally_secs,
                max_dropout_secs: self.max_dropout_secs,
                pre_roll_secs: self.pre_roll,
                post_roll_secs: self.post_roll,
            },
        }
    }
}

pub fn run(
    poses: PathBuf,
    surface: Option<PathBuf>,
    output: PathBuf,
    opts: &AnalysisOpts,
) -> anyhow::Result<HighlightReport> {
    println!("Analyzing pose stream: {}", poses.display());

    let (header, observations) = read_observation_file(&poses)
        .map_err(|e| anyhow::anyhow!("Failed to read pose stream: {e}"))?;

    println!(
        "  Video: {} ({}x{} @ {:.1}fps, {} frames)",
        header.video,
        header.frame_width,
        header.frame_height,
        header.fps,
        observations.len()
    );

    let zone = resolve_zone(&header, surface, opts.zone_expansion)?;
    println!(
        "  Core zone: ({:.0}, {:.0}) - ({:.0}, {:.0})",
        zone.x1, zone.y1, zone.x2, zone.y2
    );

    let mut detector = RallyDetector::new(zone, opts.detector_config());
    let mut last_timestamp = 0.0;

    for (frame_index, observation) in observations.iter().enumerate() {
        last_timestamp = observation.timestamp_secs;

        if let Some(interval) = detector.process_frame(observation) {
            println!(
                "  Highlight: {:.1}s - {:.1}s ({:.1}s)",
                interval.start_secs,
                interval.end_secs,
                interval.duration_secs()
            );
        }

        if (frame_index + 1) % 100 == 0 {
            let stats: Vec<String> = detector
                .top_players(3)
                .iter()
                .map(|p| format!("id:{}(score:{})", p.id, p.score))
                .collect();
            tracing::debug!(
                t = observation.timestamp_secs,
                rallying = detector.is_rallying(),
                top = ?stats,
                "Scoreboard"
            );
        }
    }

    if opts.flush_tail {
        if let Some(interval) = detector.finalize(last_timestamp) {
            println!(
                "  Highlight (tail): {:.1}s - {:.1}s ({:.1}s)",
                interval.start_secs,
                interval.end_secs,
                interval.duration_secs()
            );
        }
    }

    let players = detector.player_count();
    let intervals = detector.into_intervals();

    println!(
        "\nAnalysis complete: {} players tracked, {} highlights.",
        players,
        intervals.len()
    );
    if intervals.is_empty() {
        println!(
            "No highlights found. Try lowering --vip-warmup-score or --min-rally-secs, \
             or raising --zone-expansion."
        );
    }

    let report = HighlightReport::new(header.video.clone(), zone, intervals);
    report
        .save(&output)
        .map_err(|e| anyhow::anyhow!("Failed to write report: {e}"))?;
    println!("Report saved to: {}", output.display());

    Ok(report)
}

/// Build the core zone from the surface scan, or fall back to the central
/// 50% of the frame when no usable table box exists.
fn resolve_zone(
    header: &ObservationHeader,
    surface: Option<PathBuf>,
    expansion: f64,
) -> anyhow::Result<CoreZone> {
    if let Some(surface_path) = surface {
        let json = std::fs::read_to_string(&surface_path).map_err(|e| {
            anyhow::anyhow!("Failed to read surface scan {}: {e}", surface_path.display())
        })?;
        let scan: SurfaceScan = serde_json::from_str(&json).map_err(|e| {
            anyhow::anyhow!("Failed to parse surface scan {}: {e}", surface_path.display())
        })?;

        if let Some(best) = scan.best_box(header.frame_width, header.frame_height) {
            println!(
                "  Table found: ({:.0}, {:.0}) - ({:.0}, {:.0})",
                best.x1, best.y1, best.x2, best.y2
            );
            return Ok(CoreZone::from_surface(
                best,
                header.frame_width,
                header.frame_height,
                expansion,
            ));
        }
        tracing::warn!("Surface scan has no usable table box, using central fallback zone");
    } else {
        tracing::warn!("No surface scan provided, using central fallback zone");
    }

    Ok(CoreZone::central_fallback(
        header.frame_width,
        header.frame_height,
    ))
}
