//! Routing `tracing` events into a [`Logger`].
//!
//! Host code that logs with `tracing::info!` and friends gets the same line
//! format as direct logger calls once [`install_tracing_bridge`] has run.
//! The event's `message` field becomes the message; every other field is
//! attached as an extra field, so a [`JsonFormatter`](crate::JsonFormatter)
//! configured with that field name will output it.

use crate::event::{FieldValue, LogEvent};
use crate::level::Level;
use crate::logger::{Logger, PROPAGATED_TARGET};
use serde_json::Value;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::Layer;

/// A layer that re-emits every `tracing` event through a [`Logger`].
///
/// Events the logger itself forwarded (target [`PROPAGATED_TARGET`]) are
/// ignored, so a propagating logger cannot feed back into itself.
pub struct LoggerLayer {
    logger: Logger,
}

impl LoggerLayer {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Vec<(String, FieldValue)>,
}

impl FieldVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        if field.name() == "message" {
            let text = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            self.message = Some(text);
        } else {
            self.fields.push((field.name().to_string(), value.into()));
        }
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.insert(field, Value::from(format!("{:?}", value)));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if value.is_finite() {
            self.insert(field, Value::from(value));
        } else if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields
                .push((field.name().to_string(), FieldValue::from_serialize(&value)));
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }
}

impl<S> Layer<S> for LoggerLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if metadata.target() == PROPAGATED_TARGET {
            return;
        }
        let level = Level::from(*metadata.level());
        if !self.logger.is_enabled_for(level) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let mut record = LogEvent::new(
            self.logger.name(),
            level,
            visitor.message.unwrap_or_default(),
        );
        for (key, value) in visitor.fields {
            record = record.with_extra(key, value);
        }

        // `tracing` has no channel back to the call site. A write failure or a
        // non-finite float in a configured field drops the event.
        let _ = self.logger.log(record);
    }
}

/// Install a global `tracing` subscriber that forwards to `logger`.
///
/// Fails if a global subscriber is already set.
pub fn install_tracing_bridge(logger: Logger) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(LoggerLayer::new(logger))
        .try_init()
}
