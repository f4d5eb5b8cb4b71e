//! Surface failures, cancellation and drop cleanup.
//!
//! Every path out of a notification, successful or not, must hide and
//! dispose the surface once and return the corner to the ledger.

use std::sync::Arc;
use std::time::Duration;

use perch_core::{
    Corner, CornerLedger, Lifecycle, Margins, Notification, PerchError, ScreenBounds,
    SurfaceError,
};
use perch_harness::{
    FailurePlan, RecordingSurface, SurfaceCall, capture_events, init_test_logging,
    run_to_completion,
};
use tracing::Level;

const SCREEN: ScreenBounds = ScreenBounds::new(1920, 1080);
const MS_100: Duration = Duration::from_millis(100);
const SEC_1: Duration = Duration::from_secs(1);

fn toast(surface: RecordingSurface, ledger: &Arc<CornerLedger>) -> Notification<RecordingSurface> {
    init_test_logging();
    Notification::new(
        surface,
        Corner::BottomRight,
        Margins::new(20.0, 20.0),
        SEC_1,
        &SCREEN,
        Arc::clone(ledger),
    )
    .unwrap()
}

#[test]
fn show_failure_aborts_animate() {
    let ledger = Arc::new(CornerLedger::new());
    let surface = RecordingSurface::new(200, 80).failing(FailurePlan {
        show: true,
        ..FailurePlan::default()
    });
    let log = surface.log();
    let mut n = toast(surface, &ledger);

    let err = n.animate().unwrap_err();
    assert!(matches!(err, PerchError::Surface(SurfaceError::Backend(_))));
    assert!(n.is_finished());
    assert!(!n.is_running());
    assert_eq!(log.disposals(), 1);
    assert!(ledger.entry(Corner::BottomRight).is_empty());
}

#[test]
fn frame_failure_mid_slide_cleans_up() {
    let ledger = Arc::new(CornerLedger::new());
    let surface = RecordingSurface::new(200, 80).failing(FailurePlan {
        bounds_after: Some(4),
        ..FailurePlan::default()
    });
    let log = surface.log();
    let mut n = toast(surface, &ledger);
    n.animate().unwrap();

    let err = run_to_completion(&mut n, MS_100).unwrap_err();
    assert!(matches!(err, PerchError::Surface(_)));
    assert_eq!(log.bounds().len(), 4);
    assert_eq!(
        &log.calls()[log.len() - 2..],
        &[SurfaceCall::SetVisible(false), SurfaceCall::Dispose]
    );
    assert!(ledger.entry(Corner::BottomRight).is_empty());

    // Nothing left to tick.
    n.tick(SEC_1).unwrap();
    assert_eq!(log.disposals(), 1);
}

#[test]
fn dispose_failure_still_releases_ledger() {
    let ledger = Arc::new(CornerLedger::new());
    let surface = RecordingSurface::new(200, 80).failing(FailurePlan {
        dispose: true,
        ..FailurePlan::default()
    });
    let mut n = toast(surface, &ledger);
    n.animate().unwrap();

    let err = run_to_completion(&mut n, Duration::from_millis(500)).unwrap_err();
    assert!(matches!(err, PerchError::Surface(SurfaceError::Backend(_))));
    assert!(n.is_finished());
    assert!(ledger.entry(Corner::BottomRight).is_empty());
}

#[test]
fn cancel_before_animate_releases_reservation() {
    let ledger = Arc::new(CornerLedger::new());
    let surface = RecordingSurface::new(200, 80);
    let log = surface.log();
    let mut n = toast(surface, &ledger);
    assert_eq!(ledger.entry(Corner::BottomRight).occupied_extent, 100.0);

    n.cancel().unwrap();
    assert_eq!(n.lifecycle(), Lifecycle::Finished);
    assert_eq!(log.calls(), vec![SurfaceCall::Dispose]);
    assert!(ledger.entry(Corner::BottomRight).is_empty());

    assert!(matches!(
        n.animate(),
        Err(PerchError::IllegalState {
            operation: "animate",
            lifecycle: Lifecycle::Finished
        })
    ));
}

#[test]
fn dropping_mid_flight_runs_teardown_and_logs() {
    let ledger = Arc::new(CornerLedger::new());
    let surface = RecordingSurface::new(200, 80);
    let log = surface.log();

    let ((), events) = capture_events(|| {
        let mut n = toast(surface, &ledger);
        n.animate().unwrap();
        n.tick(Duration::from_millis(1200)).unwrap();
        drop(n);
    });

    assert_eq!(log.visible(), Some(false));
    assert_eq!(log.disposals(), 1);
    assert!(ledger.entry(Corner::BottomRight).is_empty());
    assert!(events.iter().any(|e| {
        e.target == "perch.notification"
            && e.message.as_deref() == Some("dropped before finishing; cleaning up")
    }));
    assert!(events.iter().any(|e| {
        e.target == "perch.ledger" && e.message.as_deref() == Some("left corner")
    }));
}

#[test]
fn drop_with_failing_dispose_warns() {
    let ledger = Arc::new(CornerLedger::new());
    let surface = RecordingSurface::new(200, 80).failing(FailurePlan {
        dispose: true,
        ..FailurePlan::default()
    });

    let ((), events) = capture_events(|| {
        let mut n = toast(surface, &ledger);
        n.animate().unwrap();
        drop(n);
    });

    assert!(ledger.entry(Corner::BottomRight).is_empty());
    assert!(events
        .iter()
        .any(|e| e.level == Level::WARN && e.target == "perch.notification"));
}

#[test]
fn join_is_logged_with_slot() {
    let ledger = Arc::new(CornerLedger::new());
    let ((), events) = capture_events(|| {
        let mut first = toast(RecordingSurface::new(200, 80), &ledger);
        let mut second = toast(RecordingSurface::new(200, 80), &ledger);
        first.animate().unwrap();
        second.animate().unwrap();
    });

    let joins: Vec<_> = events
        .iter()
        .filter(|e| e.target == "perch.ledger" && e.message.as_deref() == Some("joined corner"))
        .collect();
    assert_eq!(joins.len(), 2);
    assert_eq!(joins[0].field("slot"), Some("1"));
    assert_eq!(joins[1].field("slot"), Some("2"));
    assert_eq!(joins[1].field("corner"), Some("bottom-right"));
}
