#![forbid(unsafe_code)]

//! Capability traits for the windowing collaborators.
//!
//! The controller never talks to a concrete window type. Anything that can
//! report its size, move, toggle visibility and stacking, and be disposed can
//! serve as a notification [`Surface`]; anything that can report usable
//! screen bounds is a [`ScreenMetrics`] source.

use crate::error::SurfaceError;
use crate::geometry::{Bounds, ScreenBounds, Size};

/// A drawable on-screen window owned by a notification.
///
/// Mutators are fallible so that a window torn down behind the
/// controller's back surfaces as an error instead of being ignored.
pub trait Surface {
    /// Current size. Read once when the notification is constructed.
    fn size(&self) -> Size;

    /// Move and resize the window.
    fn set_bounds(&mut self, bounds: Bounds) -> Result<(), SurfaceError>;

    /// Show or hide the window.
    fn set_visible(&mut self, visible: bool) -> Result<(), SurfaceError>;

    /// Keep the window above others.
    fn set_always_on_top(&mut self, on_top: bool) -> Result<(), SurfaceError>;

    /// Release the window. Called exactly once by the owning notification.
    fn dispose(&mut self) -> Result<(), SurfaceError>;
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn size(&self) -> Size {
        (**self).size()
    }

    fn set_bounds(&mut self, bounds: Bounds) -> Result<(), SurfaceError> {
        (**self).set_bounds(bounds)
    }

    fn set_visible(&mut self, visible: bool) -> Result<(), SurfaceError> {
        (**self).set_visible(visible)
    }

    fn set_always_on_top(&mut self, on_top: bool) -> Result<(), SurfaceError> {
        (**self).set_always_on_top(on_top)
    }

    fn dispose(&mut self) -> Result<(), SurfaceError> {
        (**self).dispose()
    }
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn size(&self) -> Size {
        (**self).size()
    }

    fn set_bounds(&mut self, bounds: Bounds) -> Result<(), SurfaceError> {
        (**self).set_bounds(bounds)
    }

    fn set_visible(&mut self, visible: bool) -> Result<(), SurfaceError> {
        (**self).set_visible(visible)
    }

    fn set_always_on_top(&mut self, on_top: bool) -> Result<(), SurfaceError> {
        (**self).set_always_on_top(on_top)
    }

    fn dispose(&mut self) -> Result<(), SurfaceError> {
        (**self).dispose()
    }
}

/// Source of usable screen bounds (task bars and docks excluded).
pub trait ScreenMetrics {
    /// Query the usable screen area.
    fn usable_bounds(&self) -> ScreenBounds;
}

impl ScreenMetrics for ScreenBounds {
    fn usable_bounds(&self) -> ScreenBounds {
        *self
    }
}

impl<M: ScreenMetrics + ?Sized> ScreenMetrics for &M {
    fn usable_bounds(&self) -> ScreenBounds {
        (**self).usable_bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Counting {
        moves: usize,
    }

    impl Surface for Counting {
        fn size(&self) -> Size {
            Size::new(4, 2)
        }

        fn set_bounds(&mut self, _bounds: Bounds) -> Result<(), SurfaceError> {
            self.moves += 1;
            Ok(())
        }

        fn set_visible(&mut self, _visible: bool) -> Result<(), SurfaceError> {
            Ok(())
        }

        fn set_always_on_top(&mut self, _on_top: bool) -> Result<(), SurfaceError> {
            Ok(())
        }

        fn dispose(&mut self) -> Result<(), SurfaceError> {
            Ok(())
        }
    }

    #[test]
    fn boxed_surface_forwards_calls() {
        let mut boxed: Box<dyn Surface> = Box::new(Counting::default());
        boxed.set_bounds(Bounds::default()).unwrap();
        assert_eq!(boxed.size(), Size::new(4, 2));
    }

    #[test]
    fn borrowed_surface_forwards_calls() {
        fn move_twice(mut surface: impl Surface) {
            surface.set_bounds(Bounds::default()).unwrap();
            surface.set_bounds(Bounds::default()).unwrap();
        }

        let mut inner = Counting::default();
        move_twice(&mut inner);
        assert_eq!(inner.moves, 2);
    }

    #[test]
    fn screen_bounds_are_metrics() {
        let fixed = ScreenBounds::new(800, 600);
        assert_eq!(fixed.usable_bounds(), fixed);

        let dynamic: &dyn ScreenMetrics = &fixed;
        assert_eq!((&dynamic).usable_bounds(), ScreenBounds::new(800, 600));
    }
}
