//! Logging initialisation via tracing-subscriber.
//!
//! Call [`init`] once at startup, after settings are resolved.

use std::fmt;

use tracing_subscriber::EnvFilter;

/// Why the global subscriber was not installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitError {
    /// Neither `RUST_LOG` nor the configured level is a valid filter.
    InvalidFilter(String),
    /// A global subscriber is already installed.
    AlreadySet,
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFilter(msg) => f.write_str(msg),
            Self::AlreadySet => f.write_str("a tracing subscriber is already set"),
        }
    }
}

/// Initialise the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence; `level` is the fallback directive.
///
/// # Errors
///
/// Returns [`InitError::InvalidFilter`] if no usable filter is configured and
/// [`InitError::AlreadySet`] if a global subscriber is already installed.
pub fn init(level: &str) -> Result<(), InitError> {
    let filter = build_filter(std::env::var("RUST_LOG").ok().as_deref(), level)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|_| InitError::AlreadySet)
}

/// Builds the filter from an optional `RUST_LOG` value and the configured level.
fn build_filter(env: Option<&str>, level: &str) -> Result<EnvFilter, InitError> {
    if let Some(filter) = env.and_then(|directives| EnvFilter::try_new(directives).ok()) {
        return Ok(filter);
    }
    EnvFilter::try_new(level)
        .map_err(|e| InitError::InvalidFilter(format!("invalid log level '{level}': {e}")))
}
