//! End-to-end detector scenarios: pose stream in, intervals out.

use rallycut_engine::detector::{DetectorConfig, RallyDetector};
use rallycut_engine::scoreboard::ScoringConfig;
use rallycut_model::{CoreZone, FrameObservation, Keypoint, Pose, KEYPOINT_COUNT};

fn zone() -> CoreZone {
    CoreZone::new(100.0, 100.0, 500.0, 400.0, 1920, 1080)
}

fn pose_at(id: u64, x: f64, y: f64) -> Pose {
    Pose {
        id,
        keypoints: vec![
            Keypoint {
                x,
                y,
                confidence: 0.9,
            };
            KEYPOINT_COUNT
        ],
    }
}

fn in_core(id: u64) -> Pose {
    pose_at(id, 300.0, 250.0)
}

fn out_of_core(id: u64) -> Pose {
    pose_at(id, 1500.0, 900.0)
}

fn frame(t: f64, poses: Vec<Pose>) -> FrameObservation {
    FrameObservation {
        timestamp_secs: t,
        poses,
    }
}

/// 30fps-style stream: one player standing at the table the whole time.
///
/// With defaults the player is VIP after 4 frames (score 24 > 20) and
/// becomes strong once core_frames exceeds 30, i.e. on the 31st frame at
/// t=3.0. Activity runs until t=10.0; the dropout is confirmed at t=13.1.
#[test]
fn single_player_full_pipeline() {
    let mut detector = RallyDetector::new(zone(), DetectorConfig::default());
    let mut emitted = Vec::new();

    let mut k = 0u32;
    let mut t = 0.0;
    while t <= 10.0 + 1e-9 {
        if let Some(interval) = detector.process_frame(&frame(t, vec![in_core(1)])) {
            emitted.push(interval);
        }
        k += 1;
        t = k as f64 * 0.1;
    }
    while t <= 14.0 + 1e-9 {
        if let Some(interval) = detector.process_frame(&frame(t, vec![])) {
            emitted.push(interval);
        }
        k += 1;
        t = k as f64 * 0.1;
    }

    assert_eq!(emitted.len(), 1);
    assert_eq!(detector.intervals(), emitted.as_slice());

    let interval = emitted[0];
    // First active moment at t=3.0, minus 3.0s pre-roll.
    assert_eq!(interval.start_secs, 0.0);
    // Last active at t=10.0, plus 2.0s post-roll.
    assert!((interval.end_secs - 12.0).abs() < 1e-9);
    assert!(!detector.is_rallying());
    assert_eq!(detector.player_count(), 1);
}

/// A brief appearance never reaches the warmup score: no intervals.
#[test]
fn short_appearance_yields_nothing() {
    let mut detector = RallyDetector::new(zone(), DetectorConfig::default());

    for k in 0..15 {
        let t = k as f64 * 0.1;
        assert!(detector
            .process_frame(&frame(t, vec![out_of_core(1), out_of_core(2)]))
            .is_none());
    }

    assert!(detector.intervals().is_empty());
    assert_eq!(detector.player_count(), 2);
}

/// Nobody crosses the warmup score: empty output regardless of motion.
#[test]
fn unreachable_warmup_score_yields_nothing() {
    let config = DetectorConfig {
        scoring: ScoringConfig {
            vip_warmup_score: u64::MAX,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut detector = RallyDetector::new(zone(), config);

    for k in 0..600 {
        let t = k as f64 * 0.1;
        detector.process_frame(&frame(t, vec![in_core(1), in_core(2)]));
    }

    assert!(detector.intervals().is_empty());
}

/// A brief tracking loss inside a rally must not split it into two clips.
#[test]
fn occlusion_gap_keeps_one_interval() {
    let mut detector = RallyDetector::new(zone(), DetectorConfig::default());

    // Phases at 0.1s steps: rally until 8.0, a 1.5s occlusion (below the
    // 3.0s dropout window), back at the table until 12.0, then gone.
    let phases = [
        (8.0, true),
        (9.5, false),
        (12.0, true),
        (16.0, false),
    ];

    let mut k = 0u32;
    for (until, present) in phases {
        loop {
            let t = k as f64 * 0.1;
            if t > until + 1e-9 {
                break;
            }
            let poses = if present { vec![in_core(1)] } else { vec![] };
            detector.process_frame(&frame(t, poses));
            k += 1;
        }
    }

    assert_eq!(detector.intervals().len(), 1);
    let interval = detector.intervals()[0];
    assert!((interval.end_secs - 14.0).abs() < 1e-9);
}

/// End of stream abandons an open rally unless the caller flushes.
#[test]
fn flush_tail_recovers_open_rally() {
    let run = |flush: bool| {
        let mut detector = RallyDetector::new(zone(), DetectorConfig::default());
        let mut last_t = 0.0;
        for k in 0..=100 {
            last_t = k as f64 * 0.1;
            detector.process_frame(&frame(last_t, vec![in_core(1)]));
        }
        if flush {
            detector.finalize(last_t);
        }
        detector.into_intervals()
    };

    assert!(run(false).is_empty());

    let flushed = run(true);
    assert_eq!(flushed.len(), 1);
    assert!((flushed[0].end_secs - 12.0).abs() < 1e-9);
}

/// Identical input always produces identical output.
#[test]
fn detection_is_deterministic() {
    let stream: Vec<FrameObservation> = (0..400)
        .map(|k| {
            let t = k as f64 * 0.1;
            // A mildly adversarial pattern: two players alternating
            // between the table and the edge of the frame.
            let mut poses = Vec::new();
            if k % 7 != 0 {
                poses.push(if k % 3 == 0 {
                    out_of_core(1)
                } else {
                    in_core(1)
                });
            }
            if k % 5 != 0 {
                poses.push(if k % 4 == 0 {
                    out_of_core(2)
                } else {
                    in_core(2)
                });
            }
            frame(t, poses)
        })
        .collect();

    let run = || {
        let mut detector = RallyDetector::new(zone(), DetectorConfig::default());
        for obs in &stream {
            detector.process_frame(obs);
        }
        detector.into_intervals()
    };

    let first = run();
    let second = run();
    assert_eq!(first, second);
    for interval in &first {
        assert!(interval.start_secs >= 0.0);
        assert!(interval.end_secs > interval.start_secs);
    }
}
