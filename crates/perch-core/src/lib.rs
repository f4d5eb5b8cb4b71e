#![forbid(unsafe_code)]

//! Corner-stacked slide notifications.
//!
//! # Role
//! `perch-core` places short-lived notification windows in a screen corner,
//! stacks them when several are alive at once, and animates each one
//! through a slide-in, hold and slide-out cycle. It owns no windowing code:
//! windows are reached through the [`Surface`] and [`ScreenMetrics`]
//! capability traits, and time arrives through a [`TimingDriver`].
//!
//! # Primary responsibilities
//! - **CornerLedger**: process-wide per-corner occupancy shared by all
//!   notifications.
//! - **Geometry**: rest positions and off-screen travel for every corner.
//! - **SlideAnimator**: the show/hold/close state machine.
//! - **Notification**: the controller that ties a surface, the ledger and a
//!   driver together and guarantees cleanup.
//!
//! # Quick start
//!
//! ```ignore
//! use perch_core::{Corner, Notification, ScreenBounds};
//! use std::time::Duration;
//!
//! let mut toast = Notification::builder(window)
//!     .corner(Corner::BottomRight)
//!     .build(&ScreenBounds::new(1920, 1080))?;
//! toast.animate()?;
//! while toast.is_running() {
//!     toast.tick(Duration::from_millis(16))?;
//! }
//! ```

pub mod animator;
pub mod corner;
pub mod error;
pub mod geometry;
pub mod ledger;
pub mod notification;
pub mod surface;
pub mod timing;

#[cfg(feature = "config")]
pub mod config;

pub use animator::{Axis, Phase, SlideAnimator, SlidePath, Trigger, transition};
pub use corner::{Corner, ParseCornerError};
pub use error::{Lifecycle, PerchError, Result, SurfaceError};
pub use geometry::{Bounds, Margins, Point, ScreenBounds, Size, rest_position};
pub use ledger::{CornerLedger, Departure, LedgerEntry, Slot};
pub use notification::{DEFAULT_DURATION, DEFAULT_MARGIN, Notification, NotificationBuilder};
pub use surface::{ScreenMetrics, Surface};
pub use timing::{
    DriverConfig, FrameClock, PlaybackState, RepeatBehavior, RepeatTimeline, TimingDriver,
    TimingTarget,
};

#[cfg(feature = "config")]
pub use config::{ConfigError, PerchConfig};
