//! A small JSON backend: weather lookup, sentiment classification,
//! deterministic vibe notes and a database diagnostics report.
//!
//! The HTTP surface lives in [`server`]; every other module is a pure
//! component or an adapter around one outbound call.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod logger;
pub mod sentiment;
pub mod server;
pub mod shutdown;
pub mod vibe;
pub mod weather;

pub use config::Args;
pub use diagnostics::{CollectionStore, DatabaseProbe, DiagnosticsReport, diagnose};
pub use error::WeatherError;
pub use sentiment::{
    PolarityScorer, SentimentClassifier, SentimentLabel, SentimentRequest, SentimentResult,
    SentimentStrategy,
};
pub use server::{Backend, serve};
pub use shutdown::shutdown_signal;
pub use vibe::{VibeRequest, VibeResult, generate};
pub use weather::{WeatherClient, WeatherQuery, WeatherResult};
