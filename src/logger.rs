use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt};

use crate::config::LogLevel;

/// Initializes tracing using the `RUST_LOG` environment variable.
///
/// If `RUST_LOG` is not set or fails to parse, logging falls back to
/// `level`. This function is intended for binaries; tests should prefer
/// [`try_init`] to avoid panicking if the subscriber is already set.
///
/// # Examples
///
/// ```no_run
/// use vibe_backend::{config::LogLevel, logger};
/// logger::try_init(LogLevel::Debug).expect("logger initialized");
/// ```
pub fn init(level: LogLevel) {
    try_init(level).expect("failed to initialize tracing")
}

/// Attempts to initialize tracing and returns an error if a subscriber is
/// already set.
pub fn try_init(level: LogLevel) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fallback = LevelFilter::from(level);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback.to_string()));
    fmt().with_env_filter(filter).try_init().map_err(Into::into)
}
