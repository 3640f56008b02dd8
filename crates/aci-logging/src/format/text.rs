//! Plain-text line formatter.

use super::format_time;
use crate::event::LogEvent;

/// Minute precision, no seconds.
const TEXT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Renders `<time> - <name>:<LEVEL> - <message>`.
///
/// Exception text and stack text, when present, follow on their own lines.
#[derive(Debug, Clone, Default)]
pub struct TextFormatter;

impl TextFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format(&self, event: &LogEvent) -> String {
        let mut line = format!(
            "{} - {}:{} - {}",
            format_time(event.created(), TEXT_TIME_FORMAT),
            event.name(),
            event.level(),
            event.message()
        );

        if let Some(error) = event.error() {
            line.push('\n');
            line.push_str(&error.render());
        }
        if let Some(stack) = event.stack() {
            line.push('\n');
            line.push_str(stack);
        }
        line
    }
}
