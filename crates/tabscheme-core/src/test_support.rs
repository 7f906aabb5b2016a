//! Helpers for asserting on emitted diagnostics
//!
//! Available to this crate's tests and, through the `test-support` feature,
//! to dependent crates' tests.

use std::sync::{Arc, Mutex};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

/// Levels of every event seen while a closure ran
#[derive(Clone, Default)]
pub struct CapturedEvents {
    levels: Arc<Mutex<Vec<Level>>>,
}

impl CapturedEvents {
    pub fn count(&self, level: Level) -> usize {
        self.levels
            .lock()
            .unwrap()
            .iter()
            .filter(|seen| **seen == level)
            .count()
    }
}

impl<S: Subscriber> Layer<S> for CapturedEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        self.levels.lock().unwrap().push(*event.metadata().level());
    }
}

/// Run `f` with a subscriber that records event levels on this thread
pub fn capture_events<R>(f: impl FnOnce() -> R) -> (R, CapturedEvents) {
    let captured = CapturedEvents::default();
    let subscriber = tracing_subscriber::registry().with(captured.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, captured)
}

/// Entry type shared by the pattern and table tests
#[cfg(test)]
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Member {
    pub id: i32,
    pub name: Option<String>,
    pub active: bool,
    pub joined: Option<chrono::NaiveDate>,
    pub contributions: std::collections::BTreeMap<i32, f64>,
}

/// Key extractor for `Contribution<year>` headings
#[cfg(test)]
pub(crate) fn contribution_year(column_name: &str) -> i32 {
    column_name
        .get("Contribution".len()..)
        .and_then(|year| year.parse().ok())
        .unwrap_or_default()
}
