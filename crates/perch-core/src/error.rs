#![forbid(unsafe_code)]

//! Error types.

use std::fmt;

/// Failure reported by a [`Surface`](crate::surface::Surface) implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SurfaceError {
    /// The surface was already disposed.
    #[error("surface has been disposed")]
    Disposed,

    /// The windowing backend rejected the call.
    #[error("surface backend error: {0}")]
    Backend(String),
}

/// Where a notification is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed; payload reserved, not yet animating.
    Constructed,
    /// `animate()` has been called and the driver is running.
    Animating,
    /// Teardown ran; the surface is disposed and the ledger released.
    Finished,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Constructed => "constructed",
            Self::Animating => "animating",
            Self::Finished => "finished",
        })
    }
}

/// Errors raised by notification controllers and timing drivers.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PerchError {
    /// A construction or driver parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The operation is not allowed in the current lifecycle state.
    #[error("cannot {operation} a notification that is {lifecycle}")]
    IllegalState {
        /// The rejected operation.
        operation: &'static str,
        /// Lifecycle state at the time of the call.
        lifecycle: Lifecycle,
    },

    /// The bound surface failed.
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Convenience alias for results in this crate.
pub type Result<T, E = PerchError> = std::result::Result<T, E>;
