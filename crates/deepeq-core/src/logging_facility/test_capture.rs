//! In-memory event capture for log assertions
//!
//! [`init_test_capture`] installs a [`CaptureLayer`] as the process-wide
//! subscriber and hands back a [`TestCapture`] that reads what was logged.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use deepeq_core_types::schema::{FIELD_COMPONENT, FIELD_EVENT, FIELD_INVOCATION_ID, FIELD_OP};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

type EventLog = Arc<Mutex<Vec<CapturedEvent>>>;

/// One logged event, every field rendered as text
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub component: Option<String>,
    pub op: Option<String>,
    pub event: Option<String>,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn from_fields(level: Level, target: &str, fields: HashMap<String, String>) -> Self {
        Self {
            level,
            target: target.to_string(),
            component: fields.get(FIELD_COMPONENT).cloned(),
            op: fields.get(FIELD_OP).cloned(),
            event: fields.get(FIELD_EVENT).cloned(),
            fields,
        }
    }

    /// Field value as recorded, if present
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    fn is(&self, op: &str, event: &str) -> bool {
        self.op.as_deref() == Some(op) && self.event.as_deref() == Some(event)
    }
}

/// Renders each field to a string; `str` values are kept unquoted.
#[derive(Default)]
struct TextFields(HashMap<String, String>);

impl TextFields {
    fn put(&mut self, field: &Field, value: impl ToString) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

impl Visit for TextFields {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value);
    }
}

/// Subscriber layer appending every event to a shared log
pub struct CaptureLayer {
    log: EventLog,
}

impl CaptureLayer {
    pub fn new() -> (Self, TestCapture) {
        let log = EventLog::default();
        (
            Self {
                log: Arc::clone(&log),
            },
            TestCapture { log },
        )
    }
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = TextFields::default();
        event.record(&mut fields);
        let metadata = event.metadata();
        let captured = CapturedEvent::from_fields(*metadata.level(), metadata.target(), fields.0);
        if let Ok(mut log) = self.log.lock() {
            log.push(captured);
        }
    }
}

/// Read side of a [`CaptureLayer`]
#[derive(Clone)]
pub struct TestCapture {
    log: EventLog,
}

impl TestCapture {
    /// Snapshot of everything captured so far
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    /// Events carrying the given `invocation_id`, i.e. the lifecycle events
    /// of one top-level comparison
    pub fn events_for(&self, invocation_id: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.field(FIELD_INVOCATION_ID) == Some(invocation_id))
            .collect()
    }

    /// # Panics
    ///
    /// Panics when no captured event has this `op` and `event`.
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let events = self.events();
        assert!(
            events.iter().any(|e| e.is(op, event)),
            "no {op}/{event} event among {} captured",
            events.len()
        );
    }

    pub fn clear(&self) {
        if let Ok(mut log) = self.log.lock() {
            log.clear();
        }
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().iter().filter(|e| predicate(e)).count()
    }
}

static CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Shared capture for the whole test process.
///
/// The first call installs the layer as the global subscriber. Tests running
/// in parallel see each other's events; filter with
/// [`TestCapture::events_for`] or use distinct op names.
///
/// ```
/// use deepeq_core::logging_facility::test_capture::init_test_capture;
/// use deepeq_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_capture_op");
/// capture.assert_event_exists("doc_capture_op", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    CAPTURE
        .get_or_init(|| {
            let (layer, capture) = CaptureLayer::new();
            // A subscriber installed earlier in this process keeps priority.
            let _ = tracing_subscriber::registry().with(layer).try_init();
            capture
        })
        .clone()
}
