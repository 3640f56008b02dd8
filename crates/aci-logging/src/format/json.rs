//! Structured (JSON line) formatter.

use super::format_time;
use crate::error::{LogError, Result};
use crate::event::{FieldValue, LogEvent};
use chrono::Utc;
use serde_json::{Map, Value};

/// Second precision, derived from the event's own timestamp.
const JSON_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Duplicates `time`; never copied from extras.
const ASCTIME_KEY: &str = "asctime";

/// Renders one event as a single-line JSON object.
///
/// Keys appear in this order: `timestamp`, `time`, `name`, `level`,
/// `message`, then `exc_info` and `stack_info` when the event carries them,
/// then each configured extra field the event actually has. An extra whose
/// key matches an earlier key replaces that value in place.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    fields: Vec<String>,
}

impl JsonFormatter {
    /// Formatter emitting only the built-in keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// Formatter that also copies the named extra fields from each event.
    pub fn with_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Configured extra field names.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Build the JSON object for an event.
    ///
    /// Fails if a configured extra field carries a value that could not be
    /// converted to JSON.
    pub fn to_value(&self, event: &LogEvent) -> Result<Value> {
        let mut record = Map::new();
        record.insert(
            "timestamp".to_string(),
            Value::from(Utc::now().timestamp_millis()),
        );
        record.insert(
            "time".to_string(),
            Value::from(format_time(event.created(), JSON_TIME_FORMAT)),
        );
        record.insert("name".to_string(), Value::from(event.name()));
        record.insert("level".to_string(), Value::from(event.level().as_str()));
        record.insert("message".to_string(), Value::from(event.message()));

        if let Some(error) = event.error() {
            record.insert("exc_info".to_string(), Value::from(error.render()));
        }
        if let Some(stack) = event.stack() {
            record.insert("stack_info".to_string(), Value::from(stack));
        }

        for key in &self.fields {
            if key == ASCTIME_KEY {
                continue;
            }
            match event.extra(key) {
                Some(FieldValue::Json(value)) => {
                    record.insert(key.clone(), value.clone());
                }
                Some(FieldValue::Unencodable(message)) => {
                    return Err(LogError::Serialize {
                        field: key.clone(),
                        message: message.clone(),
                    });
                }
                None => {}
            }
        }

        Ok(Value::Object(record))
    }

    /// Render an event as compact JSON, without the trailing newline.
    pub fn format(&self, event: &LogEvent) -> Result<String> {
        let record = self.to_value(event)?;
        Ok(serde_json::to_string(&record)?)
    }
}
