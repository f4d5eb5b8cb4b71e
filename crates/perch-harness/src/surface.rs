#![forbid(unsafe_code)]

//! Recording surface with failure injection.
//!
//! [`RecordingSurface`] implements [`Surface`] by appending every call to a
//! shared [`SurfaceLog`]. The log outlives the surface, so a test can hand
//! the surface to a notification and still inspect what happened after the
//! notification disposed of it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use perch_core::{Bounds, Size, Surface, SurfaceError};

/// One call made on a [`RecordingSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceCall {
    /// `set_bounds`.
    SetBounds(Bounds),
    /// `set_visible`.
    SetVisible(bool),
    /// `set_always_on_top`.
    SetAlwaysOnTop(bool),
    /// `dispose`.
    Dispose,
}

/// Shared, thread-safe call log.
#[derive(Debug, Clone, Default)]
pub struct SurfaceLog {
    calls: Arc<Mutex<Vec<SurfaceCall>>>,
}

impl SurfaceLog {
    fn lock(&self) -> MutexGuard<'_, Vec<SurfaceCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, call: SurfaceCall) {
        self.lock().push(call);
    }

    /// Every recorded call in order.
    #[must_use]
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.lock().clone()
    }

    /// Only the bounds passed to `set_bounds`, in order.
    #[must_use]
    pub fn bounds(&self) -> Vec<Bounds> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::SetBounds(bounds) => Some(*bounds),
                _ => None,
            })
            .collect()
    }

    /// Most recent bounds, if the surface was ever placed.
    #[must_use]
    pub fn last_bounds(&self) -> Option<Bounds> {
        self.bounds().last().copied()
    }

    /// Number of `dispose` calls.
    #[must_use]
    pub fn disposals(&self) -> usize {
        self.count(|call| *call == SurfaceCall::Dispose)
    }

    /// Last visibility set, if any.
    #[must_use]
    pub fn visible(&self) -> Option<bool> {
        self.lock().iter().rev().find_map(|call| match call {
            SurfaceCall::SetVisible(visible) => Some(*visible),
            _ => None,
        })
    }

    /// Count calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&SurfaceCall) -> bool) -> usize {
        self.lock().iter().filter(|call| pred(call)).count()
    }

    /// Number of recorded calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// No calls recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Which calls a [`RecordingSurface`] should reject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailurePlan {
    /// Reject `set_bounds` once this many placements succeeded.
    pub bounds_after: Option<usize>,
    /// Reject `set_visible(true)`.
    pub show: bool,
    /// Reject `dispose`.
    pub dispose: bool,
}

/// A [`Surface`] that records calls and fails on demand.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: Size,
    log: SurfaceLog,
    failures: FailurePlan,
    placements: usize,
    disposed: bool,
}

impl RecordingSurface {
    /// Create a surface of `width` x `height` with a fresh log.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Size::new(width, height),
            log: SurfaceLog::default(),
            failures: FailurePlan::default(),
            placements: 0,
            disposed: false,
        }
    }

    /// Record into an existing log instead.
    #[must_use]
    pub fn with_log(mut self, log: SurfaceLog) -> Self {
        self.log = log;
        self
    }

    /// Inject failures.
    #[must_use]
    pub fn failing(mut self, failures: FailurePlan) -> Self {
        self.failures = failures;
        self
    }

    /// Handle to this surface's log.
    #[must_use]
    pub fn log(&self) -> SurfaceLog {
        self.log.clone()
    }

    fn check_live(&self) -> Result<(), SurfaceError> {
        if self.disposed {
            Err(SurfaceError::Disposed)
        } else {
            Ok(())
        }
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn set_bounds(&mut self, bounds: Bounds) -> Result<(), SurfaceError> {
        self.check_live()?;
        if self
            .failures
            .bounds_after
            .is_some_and(|limit| self.placements >= limit)
        {
            return Err(SurfaceError::Backend("injected set_bounds failure".into()));
        }
        self.placements += 1;
        self.log.push(SurfaceCall::SetBounds(bounds));
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) -> Result<(), SurfaceError> {
        self.check_live()?;
        if visible && self.failures.show {
            return Err(SurfaceError::Backend("injected show failure".into()));
        }
        self.log.push(SurfaceCall::SetVisible(visible));
        Ok(())
    }

    fn set_always_on_top(&mut self, on_top: bool) -> Result<(), SurfaceError> {
        self.check_live()?;
        self.log.push(SurfaceCall::SetAlwaysOnTop(on_top));
        Ok(())
    }

    fn dispose(&mut self) -> Result<(), SurfaceError> {
        self.check_live()?;
        self.log.push(SurfaceCall::Dispose);
        self.disposed = true;
        if self.failures.dispose {
            return Err(SurfaceError::Backend("injected dispose failure".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_in_order() {
        let mut surface = RecordingSurface::new(10, 5);
        let log = surface.log();
        surface.set_bounds(Bounds::new(1, 2, 10, 5)).unwrap();
        surface.set_visible(true).unwrap();
        surface.dispose().unwrap();

        assert_eq!(
            log.calls(),
            vec![
                SurfaceCall::SetBounds(Bounds::new(1, 2, 10, 5)),
                SurfaceCall::SetVisible(true),
                SurfaceCall::Dispose,
            ]
        );
        assert_eq!(log.visible(), Some(true));
        assert_eq!(log.disposals(), 1);
    }

    #[test]
    fn disposed_surface_rejects_calls() {
        let mut surface = RecordingSurface::new(10, 5);
        surface.dispose().unwrap();
        assert_eq!(surface.set_visible(false), Err(SurfaceError::Disposed));
        assert_eq!(surface.dispose(), Err(SurfaceError::Disposed));
        assert_eq!(surface.log().disposals(), 1);
    }

    #[test]
    fn bounds_failure_after_limit() {
        let mut surface = RecordingSurface::new(10, 5).failing(FailurePlan {
            bounds_after: Some(1),
            ..FailurePlan::default()
        });
        assert!(surface.set_bounds(Bounds::default()).is_ok());
        assert!(surface.set_bounds(Bounds::default()).is_err());
        assert_eq!(surface.log().bounds().len(), 1);
    }

    #[test]
    fn shared_log_collects_from_many_surfaces() {
        let log = SurfaceLog::default();
        let mut a = RecordingSurface::new(1, 1).with_log(log.clone());
        let mut b = RecordingSurface::new(1, 1).with_log(log.clone());
        a.set_always_on_top(true).unwrap();
        b.set_always_on_top(true).unwrap();
        assert_eq!(log.len(), 2);
    }
}
