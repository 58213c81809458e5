use axum::{
    Json, Router,
    extract::Query,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Args;
use crate::diagnostics::{self, DatabaseProbe, DiagnosticsReport};
use crate::sentiment::{SentimentClassifier, SentimentRequest, SentimentResult, SentimentStrategy};
use crate::shutdown::shutdown_signal;
use crate::vibe::{VibeRequest, VibeResult};
use crate::weather::{WeatherClient, WeatherQuery};

/// Request handlers and the read-only state they share.
///
/// Built once at startup; nothing in here is mutated afterwards, so
/// concurrent requests never contend.
pub struct Backend {
    weather: WeatherClient,
    sentiment: SentimentClassifier,
    database: DatabaseProbe,
    database_url_set: bool,
    database_name_set: bool,
}

impl Backend {
    pub fn new(
        weather: WeatherClient,
        sentiment: SentimentClassifier,
        database: DatabaseProbe,
        database_url_set: bool,
        database_name_set: bool,
    ) -> Self {
        Self {
            weather,
            sentiment,
            database,
            database_url_set,
            database_name_set,
        }
    }

    /// Wires every collaborator from command line configuration.
    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        let weather = WeatherClient::new(
            args.weather_url.clone(),
            args.api_key().map(str::to_owned),
            args.weather_timeout(),
        )?;
        let sentiment = SentimentClassifier::new(SentimentStrategy::select(args.sentiment));
        let database = DatabaseProbe::from_args(args);
        info!(
            sentiment = sentiment.strategy().name(),
            database = database.describe(),
            weather_key = weather.has_default_key(),
            "backend configured"
        );
        Ok(Self::new(
            weather,
            sentiment,
            database,
            args.database_url().is_some(),
            args.database_name().is_some(),
        ))
    }

    /// Build an [`axum::Router`] exposing every endpoint with open CORS.
    pub fn router(self: Arc<Self>) -> Router {
        let weather = self.clone();
        let sentiment = self.clone();
        let diagnostics = self;
        Router::new()
            .route("/", get(Self::root))
            .route("/api/hello", get(Self::hello))
            .route(
                "/api/weather",
                get(move |Query(q): Query<WeatherQuery>| {
                    let this = weather.clone();
                    async move { this.weather(q).await }
                }),
            )
            .route(
                "/api/sentiment",
                post(move |Json(req): Json<SentimentRequest>| {
                    let this = sentiment.clone();
                    async move { Json(this.sentiment(&req)) }
                }),
            )
            .route("/api/vibe-note", post(Self::vibe_note))
            .route(
                "/test",
                get(move || {
                    let this = diagnostics.clone();
                    async move { Json(this.diagnostics().await) }
                }),
            )
            .layer(TraceLayer::new_for_http())
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
    }

    async fn root() -> impl IntoResponse {
        Json(json!({"message": "Hello from the Rust backend!"}))
    }

    async fn hello() -> impl IntoResponse {
        Json(json!({"message": "Hello from the backend API!"}))
    }

    async fn weather(&self, q: WeatherQuery) -> Response {
        match self.weather.current(&q.city, q.api_key.as_deref()).await {
            Ok(res) => Json(res).into_response(),
            Err(e) => e.into_response(),
        }
    }

    fn sentiment(&self, req: &SentimentRequest) -> SentimentResult {
        self.sentiment.classify(&req.text)
    }

    async fn vibe_note(Json(req): Json<VibeRequest>) -> Json<VibeResult> {
        Json(VibeResult::from(&req))
    }

    async fn diagnostics(&self) -> DiagnosticsReport {
        diagnostics::diagnose(
            &self.database,
            self.database_url_set,
            self.database_name_set,
        )
        .await
    }
}

/// Binds `args.bind_addr()` and serves until a shutdown signal arrives.
pub async fn serve(backend: Arc<Backend>, args: &Args) -> anyhow::Result<()> {
    let app = backend.router();
    let addr = args.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %listener.local_addr()?, "serving vibe backend");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}
