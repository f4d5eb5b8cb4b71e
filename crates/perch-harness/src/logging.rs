#![forbid(unsafe_code)]

//! Test logging helpers.
//!
//! [`init_test_logging`] installs a global `fmt` subscriber filtered by
//! `RUST_LOG` (default `perch=debug`) that writes through the test harness
//! capture. [`capture_events`] runs a closure under a scoped subscriber and
//! returns the structured events it emitted, so tests can assert on log
//! output without touching global state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::{Context, SubscriberExt};

/// Install a global test subscriber. Safe to call from every test.
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("perch=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// One captured tracing event.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    /// Event level.
    pub level: Level,
    /// Event target, e.g. `perch.ledger`.
    pub target: String,
    /// The `message` field, if present.
    pub message: Option<String>,
    /// All recorded fields rendered as strings.
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    /// Field value by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

#[derive(Clone, Default)]
struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let fields: HashMap<String, String> = visitor.0.into_iter().collect();

        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(CapturedEvent {
                level: *event.metadata().level(),
                target: event.metadata().target().to_string(),
                message: fields.get("message").cloned(),
                fields,
            });
    }
}

/// Run `f` with every event at `TRACE` and above captured.
///
/// Only events emitted on the current thread are seen.
pub fn capture_events<R>(f: impl FnOnce() -> R) -> (R, Vec<CapturedEvent>) {
    let capture = EventCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    let events = capture
        .events
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    (result, events)
}
