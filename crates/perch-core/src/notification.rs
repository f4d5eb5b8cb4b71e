#![forbid(unsafe_code)]

//! Notification controller.
//!
//! A [`Notification`] owns one surface and walks it through the slide
//! animation:
//!
//! 1. **Construction** captures the surface size and screen bounds, computes
//!    the rest position and reserves the notification's payload in the
//!    corner's [`CornerLedger`] entry.
//! 2. [`Notification::animate`] joins the ledger. A notification that is not
//!    alone in its corner moves its vertical margin past the extent already
//!    claimed there and slides in horizontally; a sole occupant slides
//!    vertically.
//! 3. [`Notification::tick`] pumps the timing driver, which calls back into
//!    the notification with frame fractions and pass boundaries.
//! 4. When the last pass ends the surface is hidden and disposed and the
//!    notification leaves the ledger.
//!
//! Cancelling, a surface failure, or simply dropping the controller runs the
//! same teardown, so the ledger never keeps extent for a notification that no
//! longer exists.
//!
//! # Example
//!
//! ```ignore
//! let ledger = Arc::new(CornerLedger::new());
//! let mut toast = Notification::builder(window)
//!     .corner(Corner::BottomRight)
//!     .margins(20.0, 20.0)
//!     .duration(Duration::from_millis(1000))
//!     .ledger(Arc::clone(&ledger))
//!     .build(&ScreenBounds::new(1920, 1080))?;
//!
//! toast.animate()?;
//! while toast.is_running() {
//!     toast.tick(Duration::from_millis(16))?;
//! }
//! ```

use std::fmt;
use std::mem;
use std::sync::Arc;
use std::time::Duration;

use web_time::Instant;

use crate::animator::{Axis, Phase, SlideAnimator, SlidePath, Trigger};
use crate::corner::Corner;
use crate::error::{Lifecycle, PerchError, Result};
use crate::geometry::{Bounds, Margins, Point, ScreenBounds, Size};
use crate::ledger::{CornerLedger, Departure};
use crate::surface::{ScreenMetrics, Surface};
use crate::timing::{DriverConfig, FrameClock, RepeatTimeline, TimingDriver, TimingTarget};

/// Default distance from the screen edges, in pixels.
pub const DEFAULT_MARGIN: f64 = 20.0;
/// Default length of each animation pass.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(1000);

// ---------------------------------------------------------------------------
// Flight: the timing target
// ---------------------------------------------------------------------------

/// Everything the timing driver touches. Split from the driver so the
/// controller can lend it out as the callback target.
struct Flight<S: Surface> {
    surface: S,
    ledger: Arc<CornerLedger>,
    path: SlidePath,
    animator: SlideAnimator,
    duration: Duration,
    /// `height + margin_y` at construction; never changes.
    own_payload: f64,
    slot_index: Option<u32>,
    lifecycle: Lifecycle,
}

impl<S: Surface> Flight<S> {
    fn corner(&self) -> Corner {
        self.path.corner()
    }

    fn place(&mut self, origin: Point) -> Result<()> {
        self.surface
            .set_bounds(Bounds::at(origin, self.path.size()))
            .map_err(PerchError::from)
    }

    /// Hide and dispose the surface and give the ledger back its share.
    ///
    /// Idempotent. The ledger is updated even when the surface fails; the
    /// first surface error is returned afterwards.
    fn finish(&mut self) -> Result<()> {
        let corner = self.corner();
        match mem::replace(&mut self.lifecycle, Lifecycle::Finished) {
            Lifecycle::Finished => Ok(()),
            Lifecycle::Constructed => {
                let disposed = self.surface.dispose();
                self.ledger.release(corner, self.own_payload);
                tracing::debug!(
                    target: "perch.notification",
                    corner = %corner,
                    "released before animating"
                );
                disposed.map_err(PerchError::from)
            }
            Lifecycle::Animating => {
                if self.animator.phase() != Phase::Done {
                    self.animator.apply(Trigger::End);
                }
                let hidden = self.surface.set_visible(false);
                let disposed = self.surface.dispose();
                let entry = self.ledger.leave(
                    corner,
                    Departure {
                        payload: self.own_payload,
                        margin_y: self.path.margins().y,
                        height: f64::from(self.path.size().height),
                    },
                );
                tracing::debug!(
                    target: "perch.notification",
                    corner = %corner,
                    slot = self.slot_index,
                    remaining = entry.active_count,
                    occupied_extent = entry.occupied_extent,
                    "notification finished"
                );
                hidden.and(disposed).map_err(PerchError::from)
            }
        }
    }
}

impl<S: Surface> TimingTarget for Flight<S> {
    fn begin(&mut self) -> Result<()> {
        self.animator.apply(Trigger::Begin);
        self.surface.set_always_on_top(true)?;
        self.surface.set_visible(true)?;
        Ok(())
    }

    fn timing_event(&mut self, fraction: f32) -> Result<()> {
        if self.lifecycle != Lifecycle::Animating {
            return Ok(());
        }
        let origin = self.animator.position(&self.path, fraction);
        self.place(origin)
    }

    fn repeat(&mut self) -> Result<()> {
        self.animator.apply(Trigger::Repeat);
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        self.animator.apply(Trigger::End);
        self.finish()
    }
}

impl<S: Surface> Drop for Flight<S> {
    fn drop(&mut self) {
        if self.lifecycle == Lifecycle::Finished {
            return;
        }
        tracing::debug!(
            target: "perch.notification",
            corner = %self.corner(),
            lifecycle = %self.lifecycle,
            "dropped before finishing; cleaning up"
        );
        if let Err(err) = self.finish() {
            tracing::warn!(
                target: "perch.notification",
                error = %err,
                "surface cleanup failed during drop"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

/// A corner-anchored notification driving one surface.
pub struct Notification<S: Surface, D: TimingDriver = RepeatTimeline> {
    flight: Flight<S>,
    driver: D,
    clock: FrameClock,
}

impl<S: Surface, D: TimingDriver> fmt::Debug for Notification<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notification")
            .field("corner", &self.flight.corner())
            .field("lifecycle", &self.flight.lifecycle)
            .field("phase", &self.flight.animator.phase())
            .field("slot_index", &self.flight.slot_index)
            .field("rest", &self.flight.path.rest())
            .field("driver", &self.driver)
            .finish_non_exhaustive()
    }
}

impl<S: Surface> Notification<S> {
    /// Start building a notification for `surface`.
    pub fn builder(surface: S) -> NotificationBuilder<S> {
        NotificationBuilder::new(surface)
    }

    /// Construct a notification with the default timing driver.
    ///
    /// Captures the surface size and the usable screen bounds, computes the
    /// rest position and reserves the payload (`height + margins.y`) in
    /// `ledger`.
    ///
    /// # Errors
    ///
    /// [`PerchError::InvalidConfiguration`] if the surface has no area, the
    /// margins are not finite, or `duration` is zero.
    pub fn new(
        surface: S,
        corner: Corner,
        margins: Margins,
        duration: Duration,
        screen: &dyn ScreenMetrics,
        ledger: Arc<CornerLedger>,
    ) -> Result<Self> {
        Self::with_driver(surface, corner, margins, duration, screen, ledger, RepeatTimeline::new())
    }

    /// Construct a notification from loaded configuration.
    ///
    /// # Errors
    ///
    /// Same as [`Notification::new`]; invalid configuration values surface as
    /// [`PerchError::InvalidConfiguration`].
    #[cfg(feature = "config")]
    pub fn from_config(
        surface: S,
        config: &crate::config::PerchConfig,
        screen: &dyn ScreenMetrics,
        ledger: Arc<CornerLedger>,
    ) -> Result<Self> {
        Self::new(
            surface,
            config.corner,
            config.margins(),
            config.duration(),
            screen,
            ledger,
        )
    }
}

impl<S: Surface, D: TimingDriver> Notification<S, D> {
    /// Construct a notification driven by a custom timing driver.
    ///
    /// # Errors
    ///
    /// Same as [`Notification::new`].
    pub fn with_driver(
        surface: S,
        corner: Corner,
        margins: Margins,
        duration: Duration,
        screen: &dyn ScreenMetrics,
        ledger: Arc<CornerLedger>,
        driver: D,
    ) -> Result<Self> {
        let size = surface.size();
        if size.is_empty() {
            return Err(PerchError::InvalidConfiguration(format!(
                "surface must have a non-zero size, got {}x{}",
                size.width, size.height
            )));
        }
        if !margins.is_finite() {
            return Err(PerchError::InvalidConfiguration(format!(
                "margins must be finite, got ({}, {})",
                margins.x, margins.y
            )));
        }
        if duration.is_zero() {
            return Err(PerchError::InvalidConfiguration(
                "duration must be greater than zero".into(),
            ));
        }

        let screen = screen.usable_bounds();
        let path = SlidePath::new(corner, margins, size, screen);
        let own_payload = f64::from(size.height) + margins.y;
        let entry = ledger.reserve(corner, own_payload);

        tracing::debug!(
            target: "perch.notification",
            corner = %corner,
            width = size.width,
            height = size.height,
            rest_x = path.rest().x,
            rest_y = path.rest().y,
            occupied_extent = entry.occupied_extent,
            "notification constructed"
        );

        Ok(Self {
            flight: Flight {
                surface,
                ledger,
                path,
                animator: SlideAnimator::new(1),
                duration,
                own_payload,
                slot_index: None,
                lifecycle: Lifecycle::Constructed,
            },
            driver,
            clock: FrameClock::new(),
        })
    }

    /// Join the corner, place the surface off-screen and start the driver.
    ///
    /// May be called once. On failure the notification is torn down and
    /// leaves the ledger before the error is returned.
    ///
    /// # Errors
    ///
    /// [`PerchError::IllegalState`] if already animating or finished;
    /// [`PerchError::Surface`] if the surface rejects the initial placement
    /// or the show calls.
    pub fn animate(&mut self) -> Result<()> {
        if self.flight.lifecycle != Lifecycle::Constructed {
            return Err(PerchError::IllegalState {
                operation: "animate",
                lifecycle: self.flight.lifecycle,
            });
        }

        let corner = self.flight.corner();
        let slot = self.flight.ledger.join(corner);
        self.flight.slot_index = Some(slot.index);
        self.flight.animator = SlideAnimator::new(slot.index);
        if !slot.is_sole_occupant() {
            let height = f64::from(self.flight.path.size().height);
            self.flight.path.restack(slot.occupied_extent - height);
        }
        self.flight.lifecycle = Lifecycle::Animating;

        let axis = self.flight.animator.axis();
        tracing::debug!(
            target: "perch.notification",
            corner = %corner,
            slot = slot.index,
            ?axis,
            margin_y = self.flight.path.margins().y,
            rest_y = self.flight.path.rest().y,
            "animation starting"
        );

        let start = self.flight.path.position(axis, Phase::Showing, 0.0);
        let placed = self.flight.place(start);
        let started = placed.and_then(|()| {
            self.driver
                .start(DriverConfig::slide(self.flight.duration), &mut self.flight)
        });
        self.unwind_on_error(started)
    }

    /// Advance the animation by `dt`.
    ///
    /// A no-op once the driver has stopped.
    ///
    /// # Errors
    ///
    /// [`PerchError::Surface`] if the surface fails mid-flight. Teardown and
    /// ledger cleanup have already run when the error is returned.
    pub fn tick(&mut self, dt: Duration) -> Result<()> {
        if !self.driver.is_running() {
            return Ok(());
        }
        let advanced = self.driver.advance(dt, &mut self.flight);
        self.unwind_on_error(advanced)
    }

    /// Advance the animation to wall-clock time `now`.
    ///
    /// The first call only records the starting instant.
    ///
    /// # Errors
    ///
    /// Same as [`Notification::tick`].
    pub fn tick_at(&mut self, now: Instant) -> Result<()> {
        let dt = self.clock.delta(now);
        self.tick(dt)
    }

    /// Stop early: hide and dispose the surface and leave the ledger.
    ///
    /// Idempotent; cancelling a constructed notification releases its
    /// reservation.
    ///
    /// # Errors
    ///
    /// [`PerchError::Surface`] if hiding or disposing fails. The ledger is
    /// updated regardless.
    pub fn cancel(&mut self) -> Result<()> {
        tracing::debug!(
            target: "perch.notification",
            corner = %self.flight.corner(),
            lifecycle = %self.flight.lifecycle,
            "cancel requested"
        );
        let stopped = self.driver.stop(&mut self.flight);
        let finished = self.flight.finish();
        stopped.and(finished)
    }

    /// Whether the timing driver is still playing.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.driver.is_running()
    }

    /// Whether teardown has run.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.flight.lifecycle == Lifecycle::Finished
    }

    /// Lifecycle state.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.flight.lifecycle
    }

    /// Current animation phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.flight.animator.phase()
    }

    /// Moving axis, known once the notification has joined its corner.
    #[must_use]
    pub fn axis(&self) -> Option<Axis> {
        self.flight.slot_index.map(|_| self.flight.animator.axis())
    }

    /// 1-based slot assigned by [`Notification::animate`].
    #[must_use]
    pub fn slot_index(&self) -> Option<u32> {
        self.flight.slot_index
    }

    /// Corner this notification is anchored to.
    #[must_use]
    pub fn corner(&self) -> Corner {
        self.flight.corner()
    }

    /// Fully shown position (stacked, once animating).
    #[must_use]
    pub fn rest_position(&self) -> Point {
        self.flight.path.rest()
    }

    /// Current margins; `y` reflects stacking once animating.
    #[must_use]
    pub fn margins(&self) -> Margins {
        self.flight.path.margins()
    }

    /// Surface size captured at construction.
    #[must_use]
    pub fn size(&self) -> Size {
        self.flight.path.size()
    }

    /// Screen bounds captured at construction.
    #[must_use]
    pub fn screen(&self) -> ScreenBounds {
        self.flight.path.screen()
    }

    /// Payload reserved in the ledger at construction.
    #[must_use]
    pub fn own_payload(&self) -> f64 {
        self.flight.own_payload
    }

    /// Length of each pass.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.flight.duration
    }

    /// Ledger this notification is registered with.
    #[must_use]
    pub fn ledger(&self) -> &Arc<CornerLedger> {
        &self.flight.ledger
    }

    /// The timing driver.
    #[must_use]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    fn unwind_on_error(&mut self, result: Result<()>) -> Result<()> {
        let Err(err) = result else {
            return Ok(());
        };
        tracing::warn!(
            target: "perch.notification",
            corner = %self.flight.corner(),
            phase = %self.flight.animator.phase(),
            error = %err,
            "aborting notification"
        );
        // The original error wins; cleanup failures are only logged.
        if let Err(cleanup) = self.cancel() {
            tracing::warn!(
                target: "perch.notification",
                error = %cleanup,
                "cleanup after abort failed"
            );
        }
        Err(err)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for [`Notification`].
///
/// Defaults: bottom-right corner, 20 px margins, 1 s passes, the
/// process-wide [`CornerLedger::global`] and a [`RepeatTimeline`] driver.
#[must_use]
pub struct NotificationBuilder<S: Surface, D: TimingDriver = RepeatTimeline> {
    surface: S,
    corner: Corner,
    margins: Margins,
    duration: Duration,
    ledger: Option<Arc<CornerLedger>>,
    driver: D,
}

impl<S: Surface> NotificationBuilder<S> {
    /// Start a builder for `surface`.
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            corner: Corner::default(),
            margins: Margins::new(DEFAULT_MARGIN, DEFAULT_MARGIN),
            duration: DEFAULT_DURATION,
            ledger: None,
            driver: RepeatTimeline::new(),
        }
    }
}

impl<S: Surface, D: TimingDriver> NotificationBuilder<S, D> {
    /// Corner to anchor to.
    pub fn corner(mut self, corner: Corner) -> Self {
        self.corner = corner;
        self
    }

    /// Distance from the corner's vertical and horizontal edges.
    pub fn margins(mut self, x: f64, y: f64) -> Self {
        self.margins = Margins::new(x, y);
        self
    }

    /// Length of each of the three passes.
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Ledger to register with instead of the global one.
    pub fn ledger(mut self, ledger: Arc<CornerLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Replace the timing driver.
    pub fn driver<D2: TimingDriver>(self, driver: D2) -> NotificationBuilder<S, D2> {
        NotificationBuilder {
            surface: self.surface,
            corner: self.corner,
            margins: self.margins,
            duration: self.duration,
            ledger: self.ledger,
            driver,
        }
    }

    /// Take corner, margins and duration from a loaded configuration.
    #[cfg(feature = "config")]
    pub fn config(self, config: &crate::config::PerchConfig) -> Self {
        self.corner(config.corner)
            .margins(config.margin_x, config.margin_y)
            .duration(config.duration())
    }

    /// Construct the notification against `screen`.
    ///
    /// # Errors
    ///
    /// Same as [`Notification::new`].
    pub fn build(self, screen: &dyn ScreenMetrics) -> Result<Notification<S, D>> {
        let ledger = self.ledger.unwrap_or_else(CornerLedger::global);
        Notification::with_driver(
            self.surface,
            self.corner,
            self.margins,
            self.duration,
            screen,
            ledger,
            self.driver,
        )
    }
}

impl<S: Surface, D: TimingDriver> fmt::Debug for NotificationBuilder<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationBuilder")
            .field("corner", &self.corner)
            .field("margins", &self.margins)
            .field("duration", &self.duration)
            .field("driver", &self.driver)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
