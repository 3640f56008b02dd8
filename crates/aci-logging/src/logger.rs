//! The named logger handle and its emit operations.

use crate::error::Result;
use crate::event::{render_args, ErrorContext, FieldValue, LogEvent};
use crate::level::Level;
use crate::sink::ConsoleSink;
use serde::Serialize;
use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// `tracing` target used when a logger forwards events to the process dispatcher.
pub const PROPAGATED_TARGET: &str = "aci_logging::propagated";

/// A configured logger. Cloning is cheap and shares the same sinks.
///
/// Threshold, sinks and propagation are fixed at construction.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

struct LoggerInner {
    name: String,
    level: Level,
    sinks: Vec<ConsoleSink>,
    propagate: bool,
}

impl Logger {
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder {
            name: name.into(),
            level: Level::default(),
            sinks: Vec::new(),
            propagate: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Minimum severity this logger accepts.
    pub fn level(&self) -> Level {
        self.inner.level
    }

    /// Whether accepted events are also forwarded to the `tracing` dispatcher.
    pub fn propagate(&self) -> bool {
        self.inner.propagate
    }

    pub fn sinks(&self) -> &[ConsoleSink] {
        &self.inner.sinks
    }

    pub fn is_enabled_for(&self, level: Level) -> bool {
        level >= self.inner.level
    }

    /// Emit a fully built event.
    ///
    /// The first sink error is returned to the caller; sinks after it do not
    /// see the event.
    pub fn log(&self, event: LogEvent) -> Result<()> {
        if !self.is_enabled_for(event.level()) {
            return Ok(());
        }
        for sink in &self.inner.sinks {
            sink.emit(&event)?;
        }
        if self.inner.propagate {
            forward_to_tracing(&event);
        }
        Ok(())
    }

    /// Start building an event at `level`, named after this logger.
    pub fn event(&self, level: Level, template: impl Into<String>) -> EventBuilder<'_> {
        EventBuilder {
            logger: self,
            event: LogEvent::new(self.inner.name.clone(), level, template),
        }
    }

    pub fn debug(&self, template: &str, args: &[&dyn fmt::Display]) -> Result<()> {
        self.event(Level::Debug, template).args(args).emit()
    }

    pub fn info(&self, template: &str, args: &[&dyn fmt::Display]) -> Result<()> {
        self.event(Level::Info, template).args(args).emit()
    }

    pub fn warning(&self, template: &str, args: &[&dyn fmt::Display]) -> Result<()> {
        self.event(Level::Warning, template).args(args).emit()
    }

    pub fn error(&self, template: &str, args: &[&dyn fmt::Display]) -> Result<()> {
        self.event(Level::Error, template).args(args).emit()
    }

    pub fn critical(&self, template: &str, args: &[&dyn fmt::Display]) -> Result<()> {
        self.event(Level::Critical, template).args(args).emit()
    }

    /// ERROR-level event carrying context built from `error`.
    pub fn exception<E>(
        &self,
        template: &str,
        args: &[&dyn fmt::Display],
        error: &E,
    ) -> Result<()>
    where
        E: StdError + ?Sized,
    {
        self.event(Level::Error, template)
            .args(args)
            .error_from(error)
            .emit()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.inner.name)
            .field("level", &self.inner.level)
            .field("sinks", &self.inner.sinks)
            .field("propagate", &self.inner.propagate)
            .finish()
    }
}

/// Builder for [`Logger`].
#[derive(Debug)]
pub struct LoggerBuilder {
    name: String,
    level: Level,
    sinks: Vec<ConsoleSink>,
    propagate: bool,
}

impl LoggerBuilder {
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn sink(mut self, sink: ConsoleSink) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Forward accepted events to the `tracing` dispatcher as well. Off by default.
    pub fn propagate(mut self, propagate: bool) -> Self {
        self.propagate = propagate;
        self
    }

    pub fn build(self) -> Logger {
        Logger {
            inner: Arc::new(LoggerInner {
                name: self.name,
                level: self.level,
                sinks: self.sinks,
                propagate: self.propagate,
            }),
        }
    }
}

/// An event under construction, bound to the logger that will emit it.
#[must_use = "events are only written by `emit()`"]
pub struct EventBuilder<'a> {
    logger: &'a Logger,
    event: LogEvent,
}

impl EventBuilder<'_> {
    pub fn arg(mut self, arg: impl fmt::Display) -> Self {
        self.event = self.event.with_args([arg.to_string()]);
        self
    }

    pub fn args(mut self, args: &[&dyn fmt::Display]) -> Self {
        self.event = self.event.with_args(render_args(args));
        self
    }

    pub fn error(mut self, context: ErrorContext) -> Self {
        self.event = self.event.with_error(context);
        self
    }

    pub fn error_from<E: StdError + ?Sized>(self, error: &E) -> Self {
        self.error(ErrorContext::from_error(error))
    }

    /// Capture the current call stack into the event.
    pub fn stack_info(mut self) -> Self {
        self.event = self
            .event
            .with_stack(Backtrace::force_capture().to_string());
        self
    }

    /// Attach an extra field. Values that cannot be represented as JSON make
    /// the emit fail if the formatter is configured to output that field.
    pub fn extra<T: Serialize + ?Sized>(mut self, key: impl Into<String>, value: &T) -> Self {
        self.event = self
            .event
            .with_extra(key, FieldValue::from_serialize(value));
        self
    }

    /// The event as built so far.
    pub fn build(self) -> LogEvent {
        self.event
    }

    pub fn emit(self) -> Result<()> {
        self.logger.log(self.event)
    }
}

/// Re-emit into whatever `tracing` dispatcher is current.
fn forward_to_tracing(event: &LogEvent) {
    let message = event.message();
    let logger = event.name();
    match event.level() {
        Level::Debug => tracing::debug!(target: PROPAGATED_TARGET, logger, "{message}"),
        Level::Info => tracing::info!(target: PROPAGATED_TARGET, logger, "{message}"),
        Level::Warning => tracing::warn!(target: PROPAGATED_TARGET, logger, "{message}"),
        Level::Error => tracing::error!(target: PROPAGATED_TARGET, logger, "{message}"),
        Level::Critical => {
            tracing::error!(target: PROPAGATED_TARGET, logger, critical = true, "{message}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LogError;
    use crate::format::{JsonFormatter, TextFormatter};
    use crate::test_support::SharedBuffer;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use tracing::Subscriber;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    fn json_logger(level: Level, fields: &[&str]) -> (Logger, SharedBuffer) {
        let buffer = SharedBuffer::new();
        let logger = Logger::builder("test_json_logger")
            .level(level)
            .sink(ConsoleSink::new(
                buffer.clone(),
                level,
                JsonFormatter::with_fields(fields.iter().copied()),
            ))
            .build();
        (logger, buffer)
    }

    fn parsed_lines(buffer: &SharedBuffer) -> Vec<Value> {
        buffer
            .lines()
            .iter()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    struct CountingLayer(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for CountingLayer {
        fn on_event(&self, _event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_json_logging_through_logger() {
        let (logger, buffer) = json_logger(Level::Info, &[]);
        logger.info("Test JSON logging", &[]).unwrap();

        let lines = parsed_lines(&buffer);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["name"], "test_json_logger");
        assert_eq!(lines[0]["level"], "INFO");
        assert_eq!(lines[0]["message"], "Test JSON logging");
    }

    #[test]
    fn test_each_severity_operation() {
        let (logger, buffer) = json_logger(Level::Debug, &[]);
        logger.debug("d", &[]).unwrap();
        logger.info("i", &[]).unwrap();
        logger.warning("w", &[]).unwrap();
        logger.error("e", &[]).unwrap();
        logger.critical("c", &[]).unwrap();

        let levels: Vec<String> = parsed_lines(&buffer)
            .iter()
            .map(|v| v["level"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(levels, vec!["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"]);
    }

    #[test]
    fn test_threshold_drops_lower_levels() {
        let (logger, buffer) = json_logger(Level::Error, &[]);
        logger.info("hidden", &[]).unwrap();
        logger.warning("hidden", &[]).unwrap();
        logger.error("shown", &[]).unwrap();

        assert!(!logger.is_enabled_for(Level::Warning));
        assert!(logger.is_enabled_for(Level::Critical));
        assert_eq!(buffer.lines().len(), 1);
    }

    #[test]
    fn test_positional_args() {
        let (logger, buffer) = json_logger(Level::Info, &[]);
        let port = 8000;
        logger.info("Listening on {}:{}", &[&"0.0.0.0", &port]).unwrap();

        assert_eq!(parsed_lines(&buffer)[0]["message"], "Listening on 0.0.0.0:8000");
    }

    #[test]
    fn test_event_builder_extras() {
        let (logger, buffer) = json_logger(Level::Info, &["request_id", "tags"]);
        logger
            .event(Level::Warning, "slow request {}")
            .arg("GET /")
            .extra("request_id", "r-42")
            .extra("tags", &["a", "b"])
            .emit()
            .unwrap();

        let line = &parsed_lines(&buffer)[0];
        assert_eq!(line["message"], "slow request GET /");
        assert_eq!(line["request_id"], "r-42");
        assert_eq!(line["tags"], json!(["a", "b"]));
    }

    #[test]
    fn test_unencodable_extra_propagates_error() {
        let (logger, buffer) = json_logger(Level::Info, &["payload"]);
        let mut payload = HashMap::new();
        payload.insert((1, 2), "tuple keys");

        let err = logger
            .event(Level::Info, "m")
            .extra("payload", &payload)
            .emit()
            .unwrap_err();
        assert!(matches!(err, LogError::Serialize { ref field, .. } if field == "payload"));
        assert!(buffer.contents().is_empty());
    }

    #[test]
    fn test_non_finite_extra_propagates_error() {
        let (logger, buffer) = json_logger(Level::Info, &["ratio"]);
        let err = logger
            .event(Level::Info, "m")
            .extra("ratio", &f64::NAN)
            .emit()
            .unwrap_err();
        assert!(matches!(err, LogError::Serialize { ref field, .. } if field == "ratio"));
        assert!(buffer.contents().is_empty());

        logger
            .event(Level::Info, "m")
            .extra("ratio", &0.75)
            .emit()
            .unwrap();
        assert_eq!(parsed_lines(&buffer)[0]["ratio"], 0.75);
    }

    #[test]
    fn test_exception_includes_error_context() {
        let (logger, buffer) = json_logger(Level::Info, &[]);
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml missing");
        logger.exception("Failed to start {}", &[&"server"], &err).unwrap();

        let line = &parsed_lines(&buffer)[0];
        assert_eq!(line["level"], "ERROR");
        assert_eq!(line["message"], "Failed to start server");
        assert_eq!(line["exc_info"], "Error: config.toml missing");
    }

    #[test]
    fn test_stack_info_captured() {
        let (logger, buffer) = json_logger(Level::Info, &[]);
        logger.event(Level::Info, "where am I").stack_info().emit().unwrap();

        let line = &parsed_lines(&buffer)[0];
        assert!(line["stack_info"].is_string());
    }

    #[test]
    fn test_build_returns_named_event() {
        let (logger, _) = json_logger(Level::Info, &[]);
        let event = logger.event(Level::Critical, "x {}").arg(1).build();
        assert_eq!(event.name(), "test_json_logger");
        assert_eq!(event.level(), Level::Critical);
        assert_eq!(event.message(), "x 1");
    }

    #[test]
    fn test_clones_share_sinks() {
        let buffer = SharedBuffer::new();
        let logger = Logger::builder("shared")
            .level(Level::Info)
            .sink(ConsoleSink::new(buffer.clone(), Level::Info, TextFormatter::new()))
            .build();
        let clone = logger.clone();

        logger.info("from original", &[]).unwrap();
        clone.info("from clone", &[]).unwrap();
        assert_eq!(buffer.lines().len(), 2);
    }

    #[test]
    fn test_concurrent_logging_yields_whole_lines() {
        let (logger, buffer) = json_logger(Level::Info, &["worker"]);
        let handles: Vec<_> = (0..4)
            .map(|w| {
                let logger = logger.clone();
                thread::spawn(move || {
                    for i in 0..100 {
                        logger
                            .event(Level::Info, "item {}")
                            .arg(i)
                            .extra("worker", &w)
                            .emit()
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let lines = parsed_lines(&buffer);
        assert_eq!(lines.len(), 400);
        for w in 0..4 {
            let count = lines.iter().filter(|l| l["worker"] == json!(w)).count();
            assert_eq!(count, 100);
        }
    }

    #[test]
    fn test_no_propagation_by_default() {
        let seen = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(CountingLayer(Arc::clone(&seen)));

        let (logger, buffer) = json_logger(Level::Debug, &[]);
        assert!(!logger.propagate());
        tracing::subscriber::with_default(subscriber, || {
            logger.info("only once", &[]).unwrap();
        });

        assert_eq!(buffer.lines().len(), 1);
        assert_eq!(seen.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_propagation_forwards_to_tracing() {
        let seen = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(CountingLayer(Arc::clone(&seen)));

        let logger = Logger::builder("child").level(Level::Debug).propagate(true).build();
        tracing::subscriber::with_default(subscriber, || {
            logger.debug("forwarded", &[]).unwrap();
            logger.critical("forwarded", &[]).unwrap();
        });

        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }
}
