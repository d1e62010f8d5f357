//! Hysteresis segmentation of rally activity into intervals.
//!
//! The machine has two states, idle and rallying. A frame is an "active
//! moment" when at least one VIP is present and at least one present VIP
//! has enough accumulated core-zone dwell. Activity opens a rally; the
//! rally stays open through gaps shorter than the dropout window, so a
//! single occluded frame never fragments a rally into two. On a confirmed
//! dropout the rally closes at the last active timestamp, short spans are
//! discarded, and survivors are emitted with pre/post-roll padding.

use rallycut_model::RallyInterval;

use crate::scoreboard::FramePresence;

/// How much core-zone dwell makes a VIP "strong" (strict `>`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DwellThreshold {
    /// Frame-count dwell. The historical behavior; assumes ~30fps input,
    /// so the default of 30 frames is roughly one second.
    Frames(u32),

    /// Time-based dwell in seconds. Frame-rate independent.
    Seconds(f64),
}

impl Default for DwellThreshold {
    fn default() -> Self {
        DwellThreshold::Frames(30)
    }
}

impl DwellThreshold {
    /// Whether a present player's accumulated dwell exceeds the threshold.
    pub fn exceeded_by(&self, core_frames: u32, core_dwell_secs: f64) -> bool {
        match *self {
            DwellThreshold::Frames(frames) => core_frames > frames,
            DwellThreshold::Seconds(secs) => core_dwell_secs > secs,
        }
    }
}

/// Configuration for the rally machine.
#[derive(Debug, Clone)]
pub struct RallyConfig {
    /// Dwell required before a present VIP counts as strong.
    pub core_dwell: DwellThreshold,

    /// Rallies shorter than this (active span, before padding) are dropped.
    pub min_rally_secs: f64,

    /// Inactivity longer than this (strict `>`) closes an open rally.
    pub max_dropout_secs: f64,

    /// Padding before the rally start, so the serve is captured.
    pub pre_roll_secs: f64,

    /// Padding after the last active moment.
    pub post_roll_secs: f64,
}

impl Default for RallyConfig {
    fn default() -> Self {
        Self {
            core_dwell: DwellThreshold::default(),
            min_rally_secs: 1.5,
            max_dropout_secs: 3.0,
            pre_roll_secs: 3.0,
            post_roll_secs: 2.0,
        }
    }
}

/// The two-state hysteresis machine. One instance per video.
#[derive(Debug)]
pub struct RallyMachine {
    config: RallyConfig,
    is_rallying: bool,
    rally_start_secs: f64,
    last_active_secs: f64,
    intervals: Vec<RallyInterval>,
}

impl RallyMachine {
    /// Create a machine in the idle state.
    pub fn new(config: RallyConfig) -> Self {
        Self {
            config,
            is_rallying: false,
            rally_start_secs: 0.0,
            last_active_secs: 0.0,
            intervals: Vec::new(),
        }
    }

    /// Whether a rally is currently open.
    pub fn is_rallying(&self) -> bool {
        self.is_rallying
    }

    /// Intervals finalized so far, in emission order.
    pub fn intervals(&self) -> &[RallyInterval] {
        &self.intervals
    }

    /// Consume the machine, yielding the finalized intervals.
    pub fn into_intervals(self) -> Vec<RallyInterval> {
        self.intervals
    }

    /// Decide whether this frame is an active rally moment.
    pub fn is_active_moment(&self, presence: &FramePresence) -> bool {
        let vips = presence.entries.iter().filter(|e| e.is_vip);
        let mut any_vip = false;
        let mut strong_vip = false;
        for entry in vips {
            any_vip = true;
            if self
                .config
                .core_dwell
                .exceeded_by(entry.core_frames, entry.core_dwell_secs)
            {
                strong_vip = true;
                break;
            }
        }
        any_vip && strong_vip
    }

    /// Assess one frame's presence snapshot and advance the machine.
    ///
    /// Returns the interval emitted this step, if a rally closed.
    pub fn step(&mut self, presence: &FramePresence) -> Option<RallyInterval> {
        let active = self.is_active_moment(presence);
        self.advance(active, presence.timestamp_secs)
    }

    /// Core transition logic, driven by a single per-frame boolean.
    pub fn advance(&mut self, is_active: bool, now: f64) -> Option<RallyInterval> {
        if is_active {
            self.last_active_secs = now;
            if !self.is_rallying {
                self.is_rallying = true;
                self.rally_start_secs = now;
                tracing::debug!(start_secs = now, "Rally opened");
            }
            return None;
        }

        if self.is_rallying && now - self.last_active_secs > self.config.max_dropout_secs {
            return self.close_rally();
        }

        None
    }

    /// Run the dropout-closure logic once at end of stream, flushing a
    /// rally that is still open. Without this, a rally open when input
    /// stops is abandoned — that is the default behavior, and callers opt
    /// into flushing explicitly.
    pub fn finalize(&mut self, final_timestamp_secs: f64) -> Option<RallyInterval> {
        debug_assert!(final_timestamp_secs >= self.last_active_secs);
        if self.is_rallying {
            return self.close_rally();
        }
        None
    }

    fn close_rally(&mut self) -> Option<RallyInterval> {
        self.is_rallying = false;
        let rally_end_secs = self.last_active_secs;
        let duration = rally_end_secs - self.rally_start_secs;

        if duration < self.config.min_rally_secs {
            tracing::debug!(duration_secs = duration, "Rally too short, discarded");
            return None;
        }

        let interval = RallyInterval {
            start_secs: (self.rally_start_secs - self.config.pre_roll_secs).max(0.0),
            end_secs: rally_end_secs + self.config.post_roll_secs,
        };
        tracing::info!(
            start_secs = interval.start_secs,
            end_secs = interval.end_secs,
            active_secs = duration,
            "Rally finalized"
        );
        self.intervals.push(interval);
        Some(interval)
    }
}
