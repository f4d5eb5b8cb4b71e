#![forbid(unsafe_code)]

//! Scenario helpers for driving notifications to completion.
//!
//! ```ignore
//! let mut stack = CornerStack::new(Corner::BottomRight, ScreenBounds::new(1920, 1080));
//! let a = stack.push(200, 80)?;
//! let b = stack.push(200, 80)?;
//! stack.animate_all()?;
//! stack.run_all(FRAME)?;
//! assert!(stack.ledger().entry(Corner::BottomRight).is_empty());
//! ```

use std::sync::Arc;
use std::time::Duration;

use perch_core::{
    Corner, CornerLedger, Margins, Notification, Result, ScreenBounds, Surface, TimingDriver,
};

use crate::surface::{RecordingSurface, SurfaceLog};

/// 60 Hz frame step.
pub const FRAME: Duration = Duration::from_millis(16);

/// Ticks after which [`run_to_completion`] gives up.
pub const MAX_TICKS: usize = 100_000;

/// Tick `notification` by `step` until its driver stops.
///
/// Returns the number of ticks taken. Stops at [`MAX_TICKS`] so a driver
/// that never ends cannot hang a test.
///
/// # Errors
///
/// The first error returned by [`Notification::tick`].
pub fn run_to_completion<S: Surface, D: TimingDriver>(
    notification: &mut Notification<S, D>,
    step: Duration,
) -> Result<usize> {
    let mut ticks = 0;
    while notification.is_running() && ticks < MAX_TICKS {
        notification.tick(step)?;
        ticks += 1;
    }
    tracing::debug!(
        target: "perch.harness",
        ticks,
        finished = notification.is_finished(),
        "run complete"
    );
    Ok(ticks)
}

/// Several recording notifications sharing one corner and a private ledger.
#[derive(Debug)]
pub struct CornerStack {
    corner: Corner,
    screen: ScreenBounds,
    margins: Margins,
    duration: Duration,
    ledger: Arc<CornerLedger>,
    entries: Vec<(Notification<RecordingSurface>, SurfaceLog)>,
}

impl CornerStack {
    /// Empty stack with 20 px margins and 1 s passes.
    #[must_use]
    pub fn new(corner: Corner, screen: ScreenBounds) -> Self {
        Self {
            corner,
            screen,
            margins: Margins::new(perch_core::DEFAULT_MARGIN, perch_core::DEFAULT_MARGIN),
            duration: perch_core::DEFAULT_DURATION,
            ledger: Arc::new(CornerLedger::new()),
            entries: Vec::new(),
        }
    }

    /// Use these margins for subsequently pushed notifications.
    #[must_use]
    pub fn margins(mut self, x: f64, y: f64) -> Self {
        self.margins = Margins::new(x, y);
        self
    }

    /// Use this pass duration for subsequently pushed notifications.
    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Construct a notification with a `width` x `height` recording surface.
    ///
    /// Returns its index in the stack.
    ///
    /// # Errors
    ///
    /// Construction errors from [`Notification::new`].
    pub fn push(&mut self, width: u32, height: u32) -> Result<usize> {
        let surface = RecordingSurface::new(width, height);
        let log = surface.log();
        let notification = Notification::new(
            surface,
            self.corner,
            self.margins,
            self.duration,
            &self.screen,
            Arc::clone(&self.ledger),
        )?;
        self.entries.push((notification, log));
        Ok(self.entries.len() - 1)
    }

    /// Start every notification that has not started yet, in push order.
    ///
    /// # Errors
    ///
    /// The first error from [`Notification::animate`].
    pub fn animate_all(&mut self) -> Result<()> {
        for (notification, _) in &mut self.entries {
            if notification.slot_index().is_none() && !notification.is_finished() {
                notification.animate()?;
            }
        }
        Ok(())
    }

    /// Tick every running notification once.
    ///
    /// # Errors
    ///
    /// The first error from [`Notification::tick`].
    pub fn tick_all(&mut self, dt: Duration) -> Result<()> {
        for (notification, _) in &mut self.entries {
            notification.tick(dt)?;
        }
        Ok(())
    }

    /// Tick everything by `step` until no notification is running.
    ///
    /// # Errors
    ///
    /// The first error from [`Notification::tick`].
    pub fn run_all(&mut self, step: Duration) -> Result<usize> {
        let mut ticks = 0;
        while self.entries.iter().any(|(n, _)| n.is_running()) && ticks < MAX_TICKS {
            self.tick_all(step)?;
            ticks += 1;
        }
        Ok(ticks)
    }

    /// Notification at `index`.
    ///
    /// # Panics
    ///
    /// If `index` is out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> &Notification<RecordingSurface> {
        &self.entries[index].0
    }

    /// Mutable notification at `index`.
    ///
    /// # Panics
    ///
    /// If `index` is out of range.
    pub fn get_mut(&mut self, index: usize) -> &mut Notification<RecordingSurface> {
        &mut self.entries[index].0
    }

    /// Surface log of the notification at `index`.
    ///
    /// # Panics
    ///
    /// If `index` is out of range.
    #[must_use]
    pub fn log(&self, index: usize) -> &SurfaceLog {
        &self.entries[index].1
    }

    /// Drop the notification at `index`, running its cleanup.
    ///
    /// Later indices shift down by one.
    pub fn remove(&mut self, index: usize) -> SurfaceLog {
        let (notification, log) = self.entries.remove(index);
        drop(notification);
        log
    }

    /// The stack's private ledger.
    #[must_use]
    pub fn ledger(&self) -> &Arc<CornerLedger> {
        &self.ledger
    }

    /// Corner every notification is anchored to.
    #[must_use]
    pub fn corner(&self) -> Corner {
        self.corner
    }

    /// Number of notifications in the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No notifications in the stack.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_to_completion_counts_ticks() {
        let ledger = Arc::new(CornerLedger::new());
        let mut n = Notification::new(
            RecordingSurface::new(100, 40),
            Corner::TopLeft,
            Margins::new(10.0, 10.0),
            Duration::from_millis(100),
            &ScreenBounds::new(800, 600),
            Arc::clone(&ledger),
        )
        .unwrap();
        n.animate().unwrap();

        let ticks = run_to_completion(&mut n, Duration::from_millis(50)).unwrap();
        assert_eq!(ticks, 6);
        assert!(n.is_finished());
        assert!(ledger.entry(Corner::TopLeft).is_empty());
    }

    #[test]
    fn idle_notification_takes_no_ticks() {
        let mut stack = CornerStack::new(Corner::TopRight, ScreenBounds::new(800, 600));
        stack.push(100, 40).unwrap();
        assert_eq!(run_to_completion(stack.get_mut(0), FRAME).unwrap(), 0);
    }
}
