#![forbid(unsafe_code)]

//! Timing driver contract and the built-in repeating timeline.
//!
//! A [`TimingDriver`] turns elapsed time into a sequence of callbacks on a
//! [`TimingTarget`]: one `begin`, a stream of `timing_event(fraction)` calls,
//! a `repeat` between passes and a final `end`. The notification controller
//! is the target; it never depends on how the driver keeps time.
//!
//! [`RepeatTimeline`] is the default driver. It is tick-driven: the caller
//! feeds it frame deltas through [`TimingDriver::advance`].
//!
//! # Invariants
//!
//! 1. `begin` is delivered exactly once, from `start`.
//! 2. `end` is delivered at most once, either after the last pass or from
//!    `stop`.
//! 3. Every completed pass delivers a frame at the pass boundary before the
//!    `repeat`/`end` that follows it, and every `repeat` is followed by a
//!    frame within the same `advance`.
//! 4. Fractions are always within [0.0, 1.0].
//!
//! # Failure Modes
//!
//! - Zero duration or zero repeat count: `start` fails with
//!   [`PerchError::InvalidConfiguration`].
//! - A target callback error stops delivery for the current `advance`; the
//!   timeline keeps its position so the caller can decide how to unwind.

use std::fmt;
use std::time::Duration;

use web_time::Instant;

use crate::error::{PerchError, Result};

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

/// Callback target driven by a [`TimingDriver`].
pub trait TimingTarget {
    /// Playback is starting.
    fn begin(&mut self) -> Result<()>;

    /// A frame at `fraction` of the current pass, in [0.0, 1.0].
    fn timing_event(&mut self, fraction: f32) -> Result<()>;

    /// A pass completed and another one is starting.
    fn repeat(&mut self) -> Result<()>;

    /// Playback ended, either naturally or because the driver was stopped.
    fn end(&mut self) -> Result<()>;
}

/// How fractions evolve from one pass to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatBehavior {
    /// Every pass runs 0.0 → 1.0.
    #[default]
    Loop,
    /// Passes alternate 0.0 → 1.0 and 1.0 → 0.0.
    Reverse,
}

/// Parameters a driver is started with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Length of one pass.
    pub duration: Duration,
    /// Total number of passes.
    pub repeat_count: u32,
    /// Fraction direction across passes.
    pub repeat_behavior: RepeatBehavior,
}

impl DriverConfig {
    /// Passes a slide notification runs: show, hold, close.
    pub const SLIDE_PASSES: u32 = 3;

    /// The three-pass looping configuration used by notifications.
    #[must_use]
    pub const fn slide(duration: Duration) -> Self {
        Self {
            duration,
            repeat_count: Self::SLIDE_PASSES,
            repeat_behavior: RepeatBehavior::Loop,
        }
    }

    /// Reject configurations a driver cannot play.
    pub fn validate(&self) -> Result<()> {
        if self.duration.is_zero() {
            return Err(PerchError::InvalidConfiguration(
                "driver duration must be greater than zero".into(),
            ));
        }
        if self.repeat_count == 0 {
            return Err(PerchError::InvalidConfiguration(
                "driver repeat count must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// A scheduler that delivers timing callbacks to a [`TimingTarget`].
pub trait TimingDriver: fmt::Debug {
    /// Configure and start playback, delivering `begin`.
    fn start(&mut self, config: DriverConfig, target: &mut dyn TimingTarget) -> Result<()>;

    /// Advance playback by `dt`, delivering frames, repeats and `end`.
    fn advance(&mut self, dt: Duration, target: &mut dyn TimingTarget) -> Result<()>;

    /// Stop playback early. Delivers `end` if the driver was running.
    fn stop(&mut self, target: &mut dyn TimingTarget) -> Result<()>;

    /// Whether playback is in progress.
    fn is_running(&self) -> bool;
}

// ---------------------------------------------------------------------------
// RepeatTimeline
// ---------------------------------------------------------------------------

/// Playback state of a [`RepeatTimeline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Not yet started.
    #[default]
    Idle,
    /// Actively playing.
    Playing,
    /// All passes done, or stopped.
    Finished,
}

/// Tick-driven driver that plays a fixed number of equal-length passes.
#[derive(Debug, Clone, Default)]
pub struct RepeatTimeline {
    config: Option<DriverConfig>,
    state: PlaybackState,
    /// Position within the current pass.
    current_time: Duration,
    passes_completed: u32,
}

impl RepeatTimeline {
    /// Create an idle timeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current playback state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Number of passes fully played.
    #[inline]
    #[must_use]
    pub fn passes_completed(&self) -> u32 {
        self.passes_completed
    }

    /// Position within the current pass.
    #[inline]
    #[must_use]
    pub fn current_time(&self) -> Duration {
        self.current_time
    }

    /// Fraction of the current pass, honouring the repeat behaviour.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        let Some(config) = self.config else {
            return 0.0;
        };
        let t = self.current_time.as_secs_f64() / config.duration.as_secs_f64();
        let t = (t as f32).clamp(0.0, 1.0);
        if self.pass_is_reversed(config) {
            1.0 - t
        } else {
            t
        }
    }

    fn pass_is_reversed(&self, config: DriverConfig) -> bool {
        config.repeat_behavior == RepeatBehavior::Reverse && self.passes_completed % 2 == 1
    }

    fn pass_end_fraction(&self, config: DriverConfig) -> f32 {
        if self.pass_is_reversed(config) { 0.0 } else { 1.0 }
    }
}

impl TimingDriver for RepeatTimeline {
    fn start(&mut self, config: DriverConfig, target: &mut dyn TimingTarget) -> Result<()> {
        config.validate()?;
        if self.state == PlaybackState::Playing {
            return Err(PerchError::InvalidConfiguration(
                "timeline is already playing".into(),
            ));
        }
        self.config = Some(config);
        self.state = PlaybackState::Playing;
        self.current_time = Duration::ZERO;
        self.passes_completed = 0;
        target.begin()
    }

    fn advance(&mut self, dt: Duration, target: &mut dyn TimingTarget) -> Result<()> {
        let Some(config) = self.config else {
            return Ok(());
        };
        let mut remaining = dt;

        while self.state == PlaybackState::Playing {
            // current_time < duration while playing, so this is never zero.
            let left_in_pass = config.duration.saturating_sub(self.current_time);
            if remaining < left_in_pass {
                self.current_time += remaining;
                return target.timing_event(self.fraction());
            }

            remaining -= left_in_pass;
            self.current_time = config.duration;
            target.timing_event(self.pass_end_fraction(config))?;
            self.passes_completed += 1;

            if self.passes_completed >= config.repeat_count {
                self.state = PlaybackState::Finished;
                return target.end();
            }
            self.current_time = Duration::ZERO;
            target.repeat()?;
        }
        Ok(())
    }

    fn stop(&mut self, target: &mut dyn TimingTarget) -> Result<()> {
        if self.state != PlaybackState::Playing {
            return Ok(());
        }
        self.state = PlaybackState::Finished;
        target.end()
    }

    fn is_running(&self) -> bool {
        self.state == PlaybackState::Playing
    }
}

// ---------------------------------------------------------------------------
// FrameClock
// ---------------------------------------------------------------------------

/// Converts wall-clock samples into frame deltas.
///
/// The first sample yields a zero delta. Samples that go backwards are
/// treated as zero deltas.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    /// Create a clock with no samples.
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Record `now` and return the time since the previous sample.
    pub fn delta(&mut self, now: Instant) -> Duration {
        let dt = self
            .last
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last = Some(now);
        dt
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
