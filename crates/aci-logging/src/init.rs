//! Logger initialization.
//!
//! The process entry point calls [`init_from_env`] (or [`init`] with explicit
//! settings) once at startup and keeps the returned [`Logger`]. Code that
//! cannot be handed the logger directly can reach it through [`global`] after
//! the entry point has called [`install`].

use crate::config::{LogSettings, LoggingConfig};
use crate::error::{LogError, Result};
use crate::format::EventFormatter;
use crate::logger::Logger;
use crate::sink::ConsoleSink;
use crate::LOGGER_NAME;
use std::io::Write;
use std::sync::OnceLock;

static PROCESS_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Build the process logger from the `LOG_LEVEL`, `LOG_JSON` and `DEBUG`
/// environment variables.
pub fn init_from_env() -> Logger {
    init(&LoggingConfig::from_env().resolve())
}

/// Build the process logger writing to standard error.
pub fn init(settings: &LogSettings) -> Logger {
    init_with_writer(std::io::stderr(), settings)
}

/// Build the process logger writing to `writer`.
///
/// The logger gets exactly one sink. Logger and sink share the resolved
/// threshold, and propagation is off so nothing is duplicated through the
/// `tracing` dispatcher.
pub fn init_with_writer<W>(writer: W, settings: &LogSettings) -> Logger
where
    W: Write + Send + 'static,
{
    let formatter = EventFormatter::for_format(settings.format);
    let sink = ConsoleSink::new(writer, settings.level, formatter);
    let logger = Logger::builder(LOGGER_NAME)
        .level(settings.level)
        .sink(sink)
        .propagate(false)
        .build();

    // Only visible at DEBUG. A failed write here has nowhere to be reported.
    let _ = logger.debug("Logger initialized", &[]);
    logger
}

/// Make `logger` the process-wide logger returned by [`global`].
///
/// Succeeds once per process; later calls return
/// [`LogError::AlreadyInitialized`] and leave the first logger in place.
pub fn install(logger: Logger) -> Result<&'static Logger> {
    PROCESS_LOGGER
        .set(logger)
        .map_err(|rejected| LogError::AlreadyInitialized(rejected.name().to_string()))?;
    PROCESS_LOGGER
        .get()
        .ok_or_else(|| LogError::AlreadyInitialized(LOGGER_NAME.to_string()))
}

/// The installed process logger, if any.
pub fn global() -> Option<&'static Logger> {
    PROCESS_LOGGER.get()
}
