//! Logging System
//!
//! Structured logging via the `tracing` crate. The host application calls
//! [`init_logging`] once at startup; controller internals emit structured
//! events that an embedding UI can also capture with its own subscriber.

use crate::error::ControlError;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Enable colored output (text format only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            format: default_format(),
            color: default_true(),
        }
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the configured level. Safe to call once per
/// process; a second call fails with an error instead of panicking.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ControlError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| ControlError::InvalidOperation(format!("invalid log level: {}", e)))?;

    let result = if config.format == "json" {
        Registry::default()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        Registry::default()
            .with(filter)
            .with(fmt::layer().with_ansi(config.color))
            .try_init()
    };

    result.map_err(|e| ControlError::InvalidOperation(format!("failed to install logger: {}", e)))
}
