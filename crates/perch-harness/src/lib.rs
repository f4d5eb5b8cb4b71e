#![forbid(unsafe_code)]

//! Test harness and reference fixtures for perch notifications.
//!
//! - [`surface`]: a recording [`Surface`](perch_core::Surface) with a shared
//!   call log and failure injection.
//! - [`scenario`]: helpers that drive one or many notifications to
//!   completion against a private ledger.
//! - [`logging`]: test subscriber setup and in-memory event capture.

pub mod logging;
pub mod scenario;
pub mod surface;

pub use logging::{CapturedEvent, capture_events, init_test_logging};
pub use scenario::{CornerStack, FRAME, MAX_TICKS, run_to_completion};
pub use surface::{FailurePlan, RecordingSurface, SurfaceCall, SurfaceLog};
