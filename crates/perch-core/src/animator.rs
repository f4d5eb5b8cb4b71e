#![forbid(unsafe_code)]

//! Slide animation state machine and per-frame coordinates.
//!
//! A notification goes through three equal-length passes: it slides in
//! ([`Phase::Showing`]), holds at rest ([`Phase::Holding`]) and slides back
//! out ([`Phase::Closing`]). Pass boundaries arrive as [`Trigger::Repeat`]
//! signals from the timing driver; [`transition`] is the whole table.
//!
//! Only one axis moves. The first notification in a corner rises from (or
//! drops out of) the screen edge on the Y axis; stacked notifications slide
//! in horizontally at their fixed vertical slot.

use std::fmt;

use crate::corner::Corner;
use crate::geometry::{Margins, Point, ScreenBounds, Size, rest_position};

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Animation phase of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Driver not started yet.
    #[default]
    NotStarted,
    /// Sliding from off-screen to rest.
    Showing,
    /// Resting in place.
    Holding,
    /// Sliding from rest back off-screen.
    Closing,
    /// Finished; the surface is gone.
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotStarted => "not-started",
            Self::Showing => "showing",
            Self::Holding => "holding",
            Self::Closing => "closing",
            Self::Done => "done",
        })
    }
}

/// Signals from the timing driver that move the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Playback started.
    Begin,
    /// One pass finished and the next began.
    Repeat,
    /// Playback ended or was stopped.
    End,
}

/// The transition table. `None` means the trigger is ignored in `phase`.
#[must_use]
pub const fn transition(phase: Phase, trigger: Trigger) -> Option<Phase> {
    match (phase, trigger) {
        (Phase::NotStarted, Trigger::Begin) => Some(Phase::Showing),
        (Phase::Showing, Trigger::Repeat) => Some(Phase::Holding),
        (Phase::Holding, Trigger::Repeat) => Some(Phase::Closing),
        (Phase::Done, _) => None,
        (_, Trigger::End) => Some(Phase::Done),
        _ => None,
    }
}

/// The axis a notification slides along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal slide; Y stays at rest.
    X,
    /// Vertical slide; X stays at rest.
    Y,
}

impl Axis {
    /// Sole occupants slide vertically, stacked ones horizontally.
    #[inline]
    #[must_use]
    pub const fn for_slot(slot_index: u32) -> Self {
        if slot_index == 1 { Axis::Y } else { Axis::X }
    }
}

// ---------------------------------------------------------------------------
// Slide path
// ---------------------------------------------------------------------------

/// Geometry a notification slides through: where it rests and how far it
/// travels to get off-screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlidePath {
    corner: Corner,
    margins: Margins,
    size: Size,
    screen: ScreenBounds,
    rest: Point,
}

impl SlidePath {
    /// Build a path and compute its rest position.
    #[must_use]
    pub fn new(corner: Corner, margins: Margins, size: Size, screen: ScreenBounds) -> Self {
        Self {
            corner,
            margins,
            size,
            screen,
            rest: rest_position(corner, margins, size, screen),
        }
    }

    /// Move the vertical margin (stacking) and recompute the rest position.
    pub fn restack(&mut self, margin_y: f64) {
        self.margins.y = margin_y;
        self.rest = rest_position(self.corner, self.margins, self.size, self.screen);
    }

    /// Corner the path is anchored to.
    #[inline]
    #[must_use]
    pub fn corner(&self) -> Corner {
        self.corner
    }

    /// Current margins.
    #[inline]
    #[must_use]
    pub fn margins(&self) -> Margins {
        self.margins
    }

    /// Surface size.
    #[inline]
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Screen bounds the path was computed against.
    #[inline]
    #[must_use]
    pub fn screen(&self) -> ScreenBounds {
        self.screen
    }

    /// Fully shown position.
    #[inline]
    #[must_use]
    pub fn rest(&self) -> Point {
        self.rest
    }

    /// Coordinate on `axis` when `remaining` of the off-screen travel is left
    /// (1.0 = fully off-screen, 0.0 = at rest).
    #[must_use]
    pub fn travel(&self, axis: Axis, remaining: f64) -> f64 {
        match axis {
            Axis::Y if self.corner.is_bottom() => {
                self.rest.y + (f64::from(self.screen.height) - self.rest.y) * remaining
            }
            Axis::Y => self.rest.y - (f64::from(self.size.height) + self.margins.y) * remaining,
            Axis::X if self.corner.is_right() => {
                self.rest.x + (f64::from(self.screen.width) - self.rest.x) * remaining
            }
            Axis::X => self.rest.x - (f64::from(self.size.width) + self.margins.x) * remaining,
        }
    }

    /// Position for a frame at `fraction` of the current pass.
    ///
    /// The static axis always sits at rest. While holding (or outside the
    /// sliding phases) the moving axis sits at rest too.
    #[must_use]
    pub fn position(&self, axis: Axis, phase: Phase, fraction: f32) -> Point {
        let x = f64::from(fraction.clamp(0.0, 1.0));
        let remaining = match phase {
            Phase::Showing => 1.0 - x,
            Phase::Closing => x,
            Phase::NotStarted | Phase::Holding | Phase::Done => 0.0,
        };
        let moving = self.travel(axis, remaining);
        match axis {
            Axis::X => Point::new(moving, self.rest.y),
            Axis::Y => Point::new(self.rest.x, moving),
        }
    }
}

// ---------------------------------------------------------------------------
// SlideAnimator
// ---------------------------------------------------------------------------

/// Phase bookkeeping for one notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideAnimator {
    phase: Phase,
    axis: Axis,
    repeats: u32,
}

impl SlideAnimator {
    /// Create an animator for a notification in `slot_index`.
    #[must_use]
    pub const fn new(slot_index: u32) -> Self {
        Self {
            phase: Phase::NotStarted,
            axis: Axis::for_slot(slot_index),
            repeats: 0,
        }
    }

    /// Current phase.
    #[inline]
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Moving axis.
    #[inline]
    #[must_use]
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    /// Repeat signals received so far.
    #[inline]
    #[must_use]
    pub const fn repeats(&self) -> u32 {
        self.repeats
    }

    /// Apply a driver signal. Returns the new phase if it changed.
    pub fn apply(&mut self, trigger: Trigger) -> Option<Phase> {
        match trigger {
            Trigger::Begin => self.repeats = 0,
            Trigger::Repeat => self.repeats = self.repeats.saturating_add(1),
            Trigger::End => {}
        }

        match transition(self.phase, trigger) {
            Some(next) => {
                tracing::trace!(
                    target: "perch.animator",
                    from = %self.phase,
                    to = %next,
                    ?trigger,
                    "phase transition"
                );
                self.phase = next;
                Some(next)
            }
            None => {
                tracing::trace!(
                    target: "perch.animator",
                    phase = %self.phase,
                    ?trigger,
                    "trigger ignored"
                );
                None
            }
        }
    }

    /// Frame position on `path` at `fraction` of the current pass.
    #[inline]
    #[must_use]
    pub fn position(&self, path: &SlidePath, fraction: f32) -> Point {
        path.position(self.axis, self.phase, fraction)
    }
}
