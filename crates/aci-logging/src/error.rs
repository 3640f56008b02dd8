//! Error types for the logging facility.
//!
//! Configuration problems degrade to defaults wherever possible, so the only
//! errors a caller sees at runtime come from a single emit call: an extra field
//! that cannot be encoded, or a failed write to the sink.

use thiserror::Error;

/// Errors surfaced by formatting or emitting a single event.
#[derive(Error, Debug)]
pub enum LogError {
    /// An extra field bound to a configured key could not be represented as JSON
    #[error("Extra field `{field}` is not JSON-encodable: {message}")]
    Serialize { field: String, message: String },

    /// The assembled record failed to serialize
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing the formatted line to the sink failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A process logger has already been installed
    #[error("Logger `{0}` is already initialized")]
    AlreadyInitialized(String),
}

/// Configuration-specific errors.
///
/// Unknown level names are not errors; they resolve to INFO.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Convenience type alias for logging results.
pub type Result<T> = std::result::Result<T, LogError>;
