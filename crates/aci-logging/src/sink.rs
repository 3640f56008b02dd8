//! Console output sink.

use crate::error::Result;
use crate::event::LogEvent;
use crate::format::EventFormatter;
use crate::level::Level;
use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

/// A destination stream paired with a formatter and its own threshold.
///
/// Each accepted event is formatted in full before the writer lock is taken,
/// then written as one complete line and flushed. A formatting failure
/// therefore leaves the stream untouched.
pub struct ConsoleSink {
    threshold: Level,
    formatter: EventFormatter,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    /// Sink writing to standard error.
    pub fn stderr(threshold: Level, formatter: impl Into<EventFormatter>) -> Self {
        Self::new(io::stderr(), threshold, formatter)
    }

    /// Sink writing to an arbitrary stream.
    pub fn new<W>(writer: W, threshold: Level, formatter: impl Into<EventFormatter>) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            threshold,
            formatter: formatter.into(),
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub fn threshold(&self) -> Level {
        self.threshold
    }

    pub fn formatter(&self) -> &EventFormatter {
        &self.formatter
    }

    /// Format and write one event. Events below the threshold are skipped.
    pub fn emit(&self, event: &LogEvent) -> Result<()> {
        if event.level() < self.threshold {
            return Ok(());
        }

        let mut line = self.formatter.format(event)?;
        line.push('\n');

        // A panic while another thread held the lock cannot leave a partial
        // line behind, so the writer is still usable.
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(line.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

impl fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("threshold", &self.threshold)
            .field("formatter", &self.formatter)
            .finish_non_exhaustive()
    }
}
