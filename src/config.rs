use clap::{Parser, ValueEnum};
use std::time::Duration;

/// Default OpenWeatherMap current-weather endpoint.
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Verbosity used when `RUST_LOG` is not set.
#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing_subscriber::filter::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing_subscriber::filter::LevelFilter::ERROR,
            LogLevel::Warn => tracing_subscriber::filter::LevelFilter::WARN,
            LogLevel::Info => tracing_subscriber::filter::LevelFilter::INFO,
            LogLevel::Debug => tracing_subscriber::filter::LevelFilter::DEBUG,
            LogLevel::Trace => tracing_subscriber::filter::LevelFilter::TRACE,
        }
    }
}

/// Which sentiment strategy to install at startup.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SentimentMode {
    /// VADER lexicon compound score (requires the `lexicon` feature).
    #[default]
    Lexicon,
    /// Keyword and emoji counting.
    Keywords,
}

/// Command line arguments for the `vibe-backend` binary.
///
/// Every option can also come from the environment; the result is read-only
/// for the lifetime of the process.
#[derive(Parser, Clone, Debug)]
#[command(name = "vibe-backend", about = "Weather, sentiment and vibe note API")]
pub struct Args {
    /// Address to bind the HTTP server to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind the HTTP server to
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Server-side OpenWeatherMap API key
    #[arg(long, env = "OPENWEATHER_API_KEY")]
    pub openweather_api_key: Option<String>,

    /// Current-weather endpoint of the provider
    #[arg(long, env = "OPENWEATHER_URL", default_value = DEFAULT_WEATHER_URL)]
    pub weather_url: String,

    /// Timeout for the outbound weather call, in seconds
    #[arg(long, default_value_t = 12)]
    pub weather_timeout_secs: u64,

    /// Base URL of the optional collection store
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Name of the optional database
    #[arg(long, env = "DATABASE_NAME")]
    pub database_name: Option<String>,

    /// Sentiment strategy
    #[arg(long, env = "SENTIMENT_STRATEGY", value_enum, default_value_t = SentimentMode::Lexicon)]
    pub sentiment: SentimentMode,

    /// Logging verbosity level when RUST_LOG is unset
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl Args {
    /// Socket address string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn weather_timeout(&self) -> Duration {
        Duration::from_secs(self.weather_timeout_secs)
    }

    /// Configured weather key, ignoring empty values.
    pub fn api_key(&self) -> Option<&str> {
        non_empty(self.openweather_api_key.as_deref())
    }

    pub fn database_url(&self) -> Option<&str> {
        non_empty(self.database_url.as_deref())
    }

    pub fn database_name(&self) -> Option<&str> {
        non_empty(self.database_name.as_deref())
    }
}

/// Treats `Some("")` the same as `None`.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
