//! Per-player relevance scoring.
//!
//! Every tracked id accumulates score for simply appearing in a frame and
//! a much larger bonus for standing inside the core zone. Once a player's
//! cumulative score passes the warmup threshold they are promoted to VIP,
//! permanently. Records are created on first sighting and never removed;
//! a player who drops out of tracking for a while keeps their score.

use std::collections::HashMap;

use rallycut_model::{CoreZone, FrameObservation};

/// Configuration for the scoreboard.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Score gained for appearing in a frame at all.
    pub score_in_frame: u64,

    /// Additional score gained when inside the core zone.
    pub score_in_core: u64,

    /// Cumulative score above which a player becomes VIP (strict `>`).
    pub vip_warmup_score: u64,

    /// Minimum keypoint confidence for the zone test (strict `>`).
    pub keypoint_confidence: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            score_in_frame: 1,
            score_in_core: 5,
            vip_warmup_score: 20,
            keypoint_confidence: 0.3,
        }
    }
}

/// Accumulated state for one tracked player. Lifetime = analysis session.
#[derive(Debug, Clone)]
pub struct PlayerRecord {
    /// Tracking id assigned upstream.
    pub id: u64,

    /// Cumulative relevance score. Monotonically non-decreasing.
    pub score: u64,

    /// Frames spent inside the core zone.
    pub core_frames: u32,

    /// Time spent inside the core zone, in seconds.
    pub core_dwell_secs: f64,

    /// Timestamp of the last frame this player appeared in.
    pub last_seen_secs: f64,

    /// Whether this player has been promoted. One-way: never reverts.
    pub is_vip: bool,
}

impl PlayerRecord {
    fn new(id: u64) -> Self {
        Self {
            id,
            score: 0,
            core_frames: 0,
            core_dwell_secs: 0.0,
            last_seen_secs: 0.0,
            is_vip: false,
        }
    }
}

/// Per-frame snapshot of the players present in that frame.
#[derive(Debug, Clone)]
pub struct FramePresence {
    /// Frame timestamp in seconds.
    pub timestamp_secs: f64,

    /// One entry per pose in the frame, in observation order.
    pub entries: Vec<PresenceEntry>,
}

/// Scoreboard state for one present player, copied out at frame time.
#[derive(Debug, Clone, Copy)]
pub struct PresenceEntry {
    pub id: u64,
    pub score: u64,
    pub is_vip: bool,
    pub core_frames: u32,
    pub core_dwell_secs: f64,
}

/// The per-video scoreboard. Owns all player records exclusively.
#[derive(Debug)]
pub struct Scoreboard {
    config: ScoringConfig,
    zone: CoreZone,
    players: HashMap<u64, PlayerRecord>,
    prev_timestamp_secs: Option<f64>,
}

impl Scoreboard {
    /// Create a scoreboard for one analysis session.
    pub fn new(zone: CoreZone, config: ScoringConfig) -> Self {
        Self {
            config,
            zone,
            players: HashMap::new(),
            prev_timestamp_secs: None,
        }
    }

    /// The zone this scoreboard scores against.
    pub fn zone(&self) -> &CoreZone {
        &self.zone
    }

    /// Update scores from one frame. Must be called exactly once per frame,
    /// in strictly increasing timestamp order.
    ///
    /// Players absent from the frame are untouched: no decay, no penalty.
    pub fn observe(&mut self, observation: &FrameObservation) -> FramePresence {
        let now = observation.timestamp_secs;
        debug_assert!(
            self.prev_timestamp_secs.map_or(true, |prev| now > prev),
            "observations must arrive in strictly increasing timestamp order"
        );

        // Elapsed time since the previous frame of the stream; zero for the
        // first frame. Used only for time-based dwell accumulation.
        let dt = self
            .prev_timestamp_secs
            .map(|prev| (now - prev).max(0.0))
            .unwrap_or(0.0);
        self.prev_timestamp_secs = Some(now);

        let mut entries = Vec::with_capacity(observation.poses.len());

        for pose in &observation.poses {
            let player = self
                .players
                .entry(pose.id)
                .or_insert_with(|| PlayerRecord::new(pose.id));
            player.last_seen_secs = now;

            // Any lower-body joint inside the zone counts. Lenient on
            // purpose: occlusion of some joints must not block detection.
            let in_core = pose.lower_body().any(|kp| {
                kp.confidence > self.config.keypoint_confidence
                    && self.zone.contains(kp.x, kp.y)
            });

            player.score += self.config.score_in_frame;
            if in_core {
                player.score += self.config.score_in_core;
                player.core_frames += 1;
                player.core_dwell_secs += dt;
            }

            if player.score > self.config.vip_warmup_score && !player.is_vip {
                player.is_vip = true;
                tracing::debug!(id = player.id, score = player.score, "Player promoted to VIP");
            }

            entries.push(PresenceEntry {
                id: player.id,
                score: player.score,
                is_vip: player.is_vip,
                core_frames: player.core_frames,
                core_dwell_secs: player.core_dwell_secs,
            });
        }

        FramePresence {
            timestamp_secs: now,
            entries,
        }
    }

    /// Look up a player record by id.
    pub fn player(&self, id: u64) -> Option<&PlayerRecord> {
        self.players.get(&id)
    }

    /// Number of distinct players seen so far.
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// The `n` highest-scoring players, for periodic progress logging.
    pub fn top_players(&self, n: usize) -> Vec<&PlayerRecord> {
        let mut players: Vec<&PlayerRecord> = self.players.values().collect();
        players.sort_by(|a, b| b.score.cmp(&a.score).then(a.id.cmp(&b.id)));
        players.truncate(n);
        players
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rallycut_model::{Keypoint, Pose, KEYPOINT_COUNT, LEFT_ANKLE};

    fn zone() -> CoreZone {
        CoreZone::new(100.0, 100.0, 500.0, 400.0, 1920, 1080)
    }

    fn pose_at(id: u64, x: f64, y: f64, confidence: f64) -> Pose {
        Pose {
            id,
            keypoints: vec![
                Keypoint {
                    x,
                    y,
                    confidence,
                };
                KEYPOINT_COUNT
            ],
        }
    }

    fn frame(t: f64, poses: Vec<Pose>) -> FrameObservation {
        FrameObservation {
            timestamp_secs: t,
            poses,
        }
    }

    #[test]
    fn test_in_core_scores_frame_plus_core() {
        let mut board = Scoreboard::new(zone(), ScoringConfig::default());
        let presence = board.observe(&frame(0.0, vec![pose_at(1, 200.0, 200.0, 0.9)]));

        assert_eq!(presence.entries.len(), 1);
        assert_eq!(presence.entries[0].score, 6);
        assert_eq!(presence.entries[0].core_frames, 1);
    }

    #[test]
    fn test_out_of_core_scores_frame_only() {
        let mut board = Scoreboard::new(zone(), ScoringConfig::default());
        let presence = board.observe(&frame(0.0, vec![pose_at(1, 900.0, 900.0, 0.9)]));

        assert_eq!(presence.entries[0].score, 1);
        assert_eq!(presence.entries[0].core_frames, 0);
    }

    #[test]
    fn test_low_confidence_keypoints_do_not_count() {
        let mut board = Scoreboard::new(zone(), ScoringConfig::default());
        // In the zone but below the 0.3 confidence threshold.
        let presence = board.observe(&frame(0.0, vec![pose_at(1, 200.0, 200.0, 0.2)]));

        assert_eq!(presence.entries[0].score, 1);
        assert_eq!(presence.entries[0].core_frames, 0);
    }

    #[test]
    fn test_confidence_threshold_is_strict() {
        let mut board = Scoreboard::new(zone(), ScoringConfig::default());
        let presence = board.observe(&frame(0.0, vec![pose_at(1, 200.0, 200.0, 0.3)]));
        assert_eq!(presence.entries[0].core_frames, 0);
    }

    #[test]
    fn test_any_single_joint_in_zone_counts() {
        let mut board = Scoreboard::new(zone(), ScoringConfig::default());

        // Everything out of zone and occluded except one ankle.
        let mut keypoints = vec![
            Keypoint {
                x: 1500.0,
                y: 900.0,
                confidence: 0.1,
            };
            KEYPOINT_COUNT
        ];
        keypoints[LEFT_ANKLE] = Keypoint {
            x: 300.0,
            y: 300.0,
            confidence: 0.8,
        };

        let presence = board.observe(&frame(0.0, vec![Pose { id: 1, keypoints }]));
        assert_eq!(presence.entries[0].core_frames, 1);
    }

    #[test]
    fn test_upper_body_joints_never_count() {
        let mut board = Scoreboard::new(zone(), ScoringConfig::default());

        // Head and shoulders in the zone, lower body outside.
        let mut keypoints = vec![
            Keypoint {
                x: 200.0,
                y: 200.0,
                confidence: 0.9,
            };
            KEYPOINT_COUNT
        ];
        for kp in keypoints.iter_mut().skip(11) {
            kp.x = 1500.0;
            kp.y = 900.0;
        }

        let presence = board.observe(&frame(0.0, vec![Pose { id: 1, keypoints }]));
        assert_eq!(presence.entries[0].core_frames, 0);
    }

    #[test]
    fn test_vip_promotion_on_fourth_core_frame() {
        // 6 points per in-core frame: 6, 12, 18, 24. Strictly greater than
        // 20 is first reached on the fourth frame.
        let mut board = Scoreboard::new(zone(), ScoringConfig::default());
        for i in 0..3 {
            let presence = board.observe(&frame(i as f64 * 0.1, vec![pose_at(1, 200.0, 200.0, 0.9)]));
            assert!(!presence.entries[0].is_vip, "frame {i} should not promote");
        }
        let presence = board.observe(&frame(0.3, vec![pose_at(1, 200.0, 200.0, 0.9)]));
        assert!(presence.entries[0].is_vip);
        assert_eq!(presence.entries[0].score, 24);
    }

    #[test]
    fn test_absent_player_keeps_score_and_vip() {
        let mut board = Scoreboard::new(zone(), ScoringConfig::default());
        for i in 0..4 {
            board.observe(&frame(i as f64 * 0.1, vec![pose_at(1, 200.0, 200.0, 0.9)]));
        }
        let before = board.player(1).unwrap().score;

        // Player 1 absent for a stretch of frames.
        for i in 4..20 {
            board.observe(&frame(i as f64 * 0.1, vec![]));
        }

        let record = board.player(1).unwrap();
        assert_eq!(record.score, before);
        assert!(record.is_vip);
    }

    #[test]
    fn test_core_dwell_accumulates_frame_gaps() {
        let mut board = Scoreboard::new(zone(), ScoringConfig::default());
        board.observe(&frame(1.0, vec![pose_at(1, 200.0, 200.0, 0.9)]));
        board.observe(&frame(1.1, vec![pose_at(1, 200.0, 200.0, 0.9)]));
        board.observe(&frame(1.3, vec![pose_at(1, 200.0, 200.0, 0.9)]));

        // First frame contributes 0, then 0.1 and 0.2.
        let record = board.player(1).unwrap();
        assert!((record.core_dwell_secs - 0.3).abs() < 1e-9);
        assert_eq!(record.core_frames, 3);
    }

    #[test]
    fn test_out_of_core_frames_do_not_accumulate_dwell() {
        let mut board = Scoreboard::new(zone(), ScoringConfig::default());
        board.observe(&frame(1.0, vec![pose_at(1, 200.0, 200.0, 0.9)]));
        board.observe(&frame(1.1, vec![pose_at(1, 900.0, 900.0, 0.9)]));
        board.observe(&frame(1.2, vec![pose_at(1, 200.0, 200.0, 0.9)]));

        let record = board.player(1).unwrap();
        assert!((record.core_dwell_secs - 0.1).abs() < 1e-9);
        assert_eq!(record.core_frames, 2);
    }

    #[test]
    fn test_top_players_sorted_by_score() {
        let mut board = Scoreboard::new(zone(), ScoringConfig::default());
        board.observe(&frame(
            0.0,
            vec![
                pose_at(1, 900.0, 900.0, 0.9),
                pose_at(2, 200.0, 200.0, 0.9),
                pose_at(3, 900.0, 900.0, 0.9),
            ],
        ));

        let top = board.top_players(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].id, 2);
    }

    #[test]
    fn test_last_seen_updates_every_frame() {
        let mut board = Scoreboard::new(zone(), ScoringConfig::default());
        board.observe(&frame(0.5, vec![pose_at(1, 200.0, 200.0, 0.9)]));
        board.observe(&frame(0.6, vec![pose_at(1, 200.0, 200.0, 0.9)]));
        assert!((board.player(1).unwrap().last_seen_secs - 0.6).abs() < 1e-9);
    }
}
