//! ACI Logging - environment-configured console logging.
//!
//! One named logger, one standard-error sink, and a choice of two line
//! formats: human-readable text or a single JSON object per event.
//!
//! # Configuration
//!
//! | variable    | effect                                                        |
//! |-------------|---------------------------------------------------------------|
//! | `LOG_LEVEL` | minimum severity name, case-insensitive; unknown → `INFO`     |
//! | `LOG_JSON`  | `true`/`1`/`yes` selects JSON lines                           |
//! | `DEBUG`     | `true`/`1`/`yes` forces `DEBUG` regardless of `LOG_LEVEL`     |
//!
//! # Usage
//!
//! ```rust,no_run
//! use aci_logging::Level;
//!
//! fn main() -> aci_logging::Result<()> {
//!     let logger = aci_logging::init_from_env();
//!
//!     logger.info("Listening on port {}", &[&8000])?;
//!     logger
//!         .event(Level::Warning, "Slow request")
//!         .extra("elapsed_ms", &1520)
//!         .emit()?;
//!     Ok(())
//! }
//! ```

pub mod bridge;
pub mod config;
pub mod error;
pub mod event;
mod finite;
pub mod format;
pub mod init;
pub mod level;
pub mod logger;
pub mod sink;

#[cfg(test)]
mod test_support;

pub use bridge::{install_tracing_bridge, LoggerLayer};
pub use config::{LogSettings, LoggingConfig};
pub use error::{ConfigError, LogError, Result};
pub use event::{ErrorContext, FieldValue, LogEvent};
pub use format::{EventFormatter, JsonFormatter, LogFormat, TextFormatter};
pub use init::{global, init, init_from_env, init_with_writer, install};
pub use level::Level;
pub use logger::{EventBuilder, Logger, LoggerBuilder};
pub use sink::ConsoleSink;

/// Well-known name of the process logger.
pub const LOGGER_NAME: &str = "openhands_aci";

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
