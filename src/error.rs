use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

/// Failures of the weather lookup.
#[derive(thiserror::Error, Debug)]
pub enum WeatherError {
    /// Neither the request nor the server configuration supplied a key.
    #[error("OPENWEATHER_API_KEY not set on server; provide ?api_key=...")]
    MissingApiKey,

    /// The provider answered with a non-success status.
    #[error("{body}")]
    Upstream { status: u16, body: String },

    /// The request could not be sent or its body could not be decoded.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// A success response whose JSON body is not an object.
    #[error("unexpected weather payload: {0}")]
    Malformed(String),
}

impl WeatherError {
    pub fn status(&self) -> StatusCode {
        match self {
            WeatherError::MissingApiKey
            | WeatherError::Transport(_)
            | WeatherError::Malformed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WeatherError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            WeatherError::MissingApiKey => "configuration",
            WeatherError::Upstream { .. } => "upstream_status",
            WeatherError::Transport(_) => "upstream_transport",
            WeatherError::Malformed(_) => "upstream_payload",
        }
    }
}

impl IntoResponse for WeatherError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_type = self.error_type();
        match &self {
            WeatherError::MissingApiKey => error!(error_type, "weather key missing"),
            WeatherError::Upstream { status, body } => {
                warn!(error_type, %status, %body, "weather provider error")
            }
            WeatherError::Transport(e) => warn!(error_type, error = %e, "weather request failed"),
            WeatherError::Malformed(body) => {
                warn!(error_type, %body, "weather payload not an object")
            }
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
