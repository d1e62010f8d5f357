//! Per-video detection facade.
//!
//! Owns one scoreboard and one rally machine and feeds them in lockstep.
//! The orchestration loop hands every decoded frame's observation to
//! [`RallyDetector::process_frame`] and collects the finalized intervals
//! at the end.

use rallycut_model::{CoreZone, FrameObservation, RallyInterval};

use crate::rally::{RallyConfig, RallyMachine};
use crate::scoreboard::{PlayerRecord, Scoreboard, ScoringConfig};

/// Combined configuration for one analysis session.
#[derive(Debug, Clone, Default)]
pub struct DetectorConfig {
    pub scoring: ScoringConfig,
    pub rally: RallyConfig,
}

/// The rally detector. One instance per video; single-threaded, fed
/// strictly once per frame in increasing timestamp order.
#[derive(Debug)]
pub struct RallyDetector {
    scoreboard: Scoreboard,
    machine: RallyMachine,
}

impl RallyDetector {
    /// Create a detector for one video.
    pub fn new(zone: CoreZone, config: DetectorConfig) -> Self {
        Self {
            scoreboard: Scoreboard::new(zone, config.scoring),
            machine: RallyMachine::new(config.rally),
        }
    }

    /// Process one frame. Returns the interval emitted this frame, if a
    /// rally closed.
    pub fn process_frame(&mut self, observation: &FrameObservation) -> Option<RallyInterval> {
        let presence = self.scoreboard.observe(observation);
        self.machine.step(&presence)
    }

    /// Flush a still-open rally at end of stream. Opt-in; by default an
    /// open rally is abandoned when input stops.
    pub fn finalize(&mut self, final_timestamp_secs: f64) -> Option<RallyInterval> {
        self.machine.finalize(final_timestamp_secs)
    }

    /// Whether a rally is currently open.
    pub fn is_rallying(&self) -> bool {
        self.machine.is_rallying()
    }

    /// Intervals finalized so far.
    pub fn intervals(&self) -> &[RallyInterval] {
        self.machine.intervals()
    }

    /// Consume the detector, yielding the finalized intervals.
    pub fn into_intervals(self) -> Vec<RallyInterval> {
        self.machine.into_intervals()
    }

    /// Number of distinct players seen so far.
    pub fn player_count(&self) -> usize {
        self.scoreboard.player_count()
    }

    /// The `n` highest-scoring players, for periodic progress logging.
    pub fn top_players(&self, n: usize) -> Vec<&PlayerRecord> {
        self.scoreboard.top_players(n)
    }
}
