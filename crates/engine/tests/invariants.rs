//! Property tests for the scoring and segmentation invariants.

use std::collections::HashMap;

use proptest::prelude::*;
use rallycut_engine::detector::{DetectorConfig, RallyDetector};
use rallycut_engine::scoreboard::{Scoreboard, ScoringConfig};
use rallycut_model::{CoreZone, FrameObservation, Keypoint, Pose, KEYPOINT_COUNT};

fn zone() -> CoreZone {
    CoreZone::new(400.0, 300.0, 1200.0, 800.0, 1920, 1080)
}

fn arb_pose() -> impl Strategy<Value = Pose> {
    (
        0u64..6,
        prop::collection::vec(
            (0.0f64..1920.0, 0.0f64..1080.0, 0.0f64..1.0)
                .prop_map(|(x, y, confidence)| Keypoint { x, y, confidence }),
            KEYPOINT_COUNT,
        ),
    )
        .prop_map(|(id, keypoints)| Pose { id, keypoints })
}

/// A stream of frames with strictly increasing timestamps.
fn arb_stream() -> impl Strategy<Value = Vec<FrameObservation>> {
    prop::collection::vec(
        (0.01f64..0.5, prop::collection::vec(arb_pose(), 0..4)),
        1..80,
    )
    .prop_map(|steps| {
        let mut t = 0.0;
        steps
            .into_iter()
            .map(|(dt, poses)| {
                t += dt;
                FrameObservation {
                    timestamp_secs: t,
                    poses,
                }
            })
            .collect()
    })
}

proptest! {
    /// Scores never decrease, for any input whatsoever.
    #[test]
    fn score_is_monotonic(stream in arb_stream()) {
        let mut board = Scoreboard::new(zone(), ScoringConfig::default());
        let mut last_scores: HashMap<u64, u64> = HashMap::new();

        for obs in &stream {
            let presence = board.observe(obs);
            for entry in &presence.entries {
                let prev = last_scores.entry(entry.id).or_insert(0);
                prop_assert!(entry.score >= *prev);
                *prev = entry.score;
            }
        }
    }

    /// Once promoted, a player stays VIP for the rest of the session.
    #[test]
    fn vip_never_reverts(stream in arb_stream()) {
        let mut board = Scoreboard::new(zone(), ScoringConfig::default());
        let mut promoted: HashMap<u64, bool> = HashMap::new();

        for obs in &stream {
            let presence = board.observe(obs);
            for entry in &presence.entries {
                let was_vip = promoted.entry(entry.id).or_insert(false);
                if *was_vip {
                    prop_assert!(entry.is_vip);
                }
                *was_vip = entry.is_vip;
            }
        }
    }

    /// Identical streams always yield identical interval sequences, and
    /// every emitted interval is well-formed.
    #[test]
    fn detection_is_deterministic_and_well_formed(stream in arb_stream()) {
        let run = || {
            let mut detector = RallyDetector::new(zone(), DetectorConfig::default());
            for obs in &stream {
                detector.process_frame(obs);
            }
            detector.into_intervals()
        };

        let first = run();
        let second = run();
        prop_assert_eq!(&first, &second);

        let mut prev_start = f64::NEG_INFINITY;
        for interval in &first {
            prop_assert!(interval.start_secs >= 0.0);
            prop_assert!(interval.end_secs > interval.start_secs);
            prop_assert!(interval.start_secs >= prev_start);
            prev_start = interval.start_secs;
        }
    }
}
