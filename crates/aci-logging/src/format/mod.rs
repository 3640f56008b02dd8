//! Event formatters for the console sink.
//!
//! Two line shapes are supported:
//!
//! ```text
//! text:  2024-05-01 12:30 - openhands_aci:INFO - Server started
//! json:  {"timestamp":1714566600123,"time":"2024-05-01 12:30:00","name":"openhands_aci","level":"INFO","message":"Server started"}
//! ```

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::error::Result;
use crate::event::LogEvent;
use chrono::{DateTime, Local};
use std::time::SystemTime;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable line
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// A formatter attached to a sink.
#[derive(Debug, Clone)]
pub enum EventFormatter {
    Text(TextFormatter),
    Json(JsonFormatter),
}

impl EventFormatter {
    /// Default formatter for a format choice.
    pub fn for_format(format: LogFormat) -> Self {
        match format {
            LogFormat::Text => Self::Text(TextFormatter::new()),
            LogFormat::Json => Self::Json(JsonFormatter::new()),
        }
    }

    /// Which line shape this formatter produces.
    pub fn kind(&self) -> LogFormat {
        match self {
            Self::Text(_) => LogFormat::Text,
            Self::Json(_) => LogFormat::Json,
        }
    }

    /// Render one event, without the trailing newline.
    pub fn format(&self, event: &LogEvent) -> Result<String> {
        match self {
            Self::Text(f) => Ok(f.format(event)),
            Self::Json(f) => f.format(event),
        }
    }
}

impl From<TextFormatter> for EventFormatter {
    fn from(f: TextFormatter) -> Self {
        Self::Text(f)
    }
}

impl From<JsonFormatter> for EventFormatter {
    fn from(f: JsonFormatter) -> Self {
        Self::Json(f)
    }
}

/// Render an event's own timestamp in local time.
pub(crate) fn format_time(created: SystemTime, pattern: &str) -> String {
    DateTime::<Local>::from(created).format(pattern).to_string()
}
