//! Best-effort report on the optional database integration.
//!
//! Nothing here fails the request: every probe that can go wrong is turned
//! into a status string.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Args;

const MAX_COLLECTIONS: usize = 10;
const MAX_ERROR_CHARS: usize = 50;
/// Upper bound on one collection listing.
pub const DATABASE_TIMEOUT: Duration = Duration::from_secs(5);

/// Minimal handle onto a database that can enumerate its collections.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    fn name(&self) -> &str;
    async fn list_collection_names(&self) -> anyhow::Result<Vec<String>>;
}

/// Collection store spoken to over HTTP (`GET {url}/collections`).
#[cfg(feature = "database")]
pub struct HttpCollectionStore {
    client: reqwest::Client,
    url: reqwest::Url,
    name: String,
}

#[cfg(feature = "database")]
impl HttpCollectionStore {
    pub fn new(url: &str, name: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let url = reqwest::Url::parse(url)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url,
            name: name.into(),
        })
    }
}

#[cfg(feature = "database")]
#[async_trait]
impl CollectionStore for HttpCollectionStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list_collection_names(&self) -> anyhow::Result<Vec<String>> {
        #[derive(Deserialize)]
        struct Res {
            result: R1,
        }
        #[derive(Deserialize)]
        struct R1 {
            collections: Vec<R2>,
        }
        #[derive(Deserialize)]
        struct R2 {
            name: String,
        }
        let url = format!("{}/collections", self.url.as_str().trim_end_matches('/'));
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("{status}: {body}");
        }
        let res: Res = resp.json().await?;
        Ok(res.result.collections.into_iter().map(|c| c.name).collect())
    }
}

/// State of the database handle, determined once at startup.
#[derive(Clone)]
pub enum DatabaseProbe {
    /// Database support was not compiled in.
    Missing,
    /// Building the handle failed.
    Failed(String),
    /// Support is present but no database is configured.
    Uninitialized,
    Ready(Arc<dyn CollectionStore>),
}

impl DatabaseProbe {
    /// Builds the probe from configuration without touching the network.
    #[cfg(feature = "database")]
    pub fn from_args(args: &Args) -> Self {
        let Some(url) = args.database_url() else {
            return DatabaseProbe::Uninitialized;
        };
        let name = args.database_name().unwrap_or("default");
        match HttpCollectionStore::new(url, name, DATABASE_TIMEOUT) {
            Ok(store) => DatabaseProbe::Ready(Arc::new(store)),
            Err(e) => {
                warn!(error = %e, "database handle unavailable");
                DatabaseProbe::Failed(e.to_string())
            }
        }
    }

    #[cfg(not(feature = "database"))]
    pub fn from_args(_args: &Args) -> Self {
        DatabaseProbe::Missing
    }

    pub fn describe(&self) -> &'static str {
        match self {
            DatabaseProbe::Missing => "missing",
            DatabaseProbe::Failed(_) => "failed",
            DatabaseProbe::Uninitialized => "uninitialized",
            DatabaseProbe::Ready(_) => "ready",
        }
    }
}

/// Report returned by `/test`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsReport {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

fn set_flag(present: bool) -> String {
    let flag = if present { "✅ Set" } else { "❌ Not Set" };
    flag.to_string()
}

fn truncate(msg: &str) -> String {
    msg.chars().take(MAX_ERROR_CHARS).collect()
}

/// Aggregates the independent probes into one report.
pub async fn diagnose(
    probe: &DatabaseProbe,
    database_url_set: bool,
    database_name_set: bool,
) -> DiagnosticsReport {
    let mut connection_status = "Not Connected";
    let mut collections = Vec::new();
    let database = match probe {
        DatabaseProbe::Missing => {
            "❌ Database module not found (run enable-database first)".to_string()
        }
        DatabaseProbe::Failed(reason) => format!("❌ Error: {}", truncate(reason)),
        DatabaseProbe::Uninitialized => "⚠️  Available but not initialized".to_string(),
        DatabaseProbe::Ready(store) => {
            connection_status = "Connected";
            match store.list_collection_names().await {
                Ok(mut names) => {
                    debug!(db = store.name(), count = names.len(), "listed collections");
                    names.truncate(MAX_COLLECTIONS);
                    collections = names;
                    "✅ Connected & Working".to_string()
                }
                Err(e) => {
                    warn!(db = store.name(), error = %e, "listing collections failed");
                    format!("⚠️  Connected but Error: {}", truncate(&e.to_string()))
                }
            }
        }
    };
    DiagnosticsReport {
        backend: "✅ Running".to_string(),
        database,
        database_url: set_flag(database_url_set),
        database_name: set_flag(database_name_set),
        connection_status: connection_status.to_string(),
        collections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeStore(anyhow::Result<Vec<String>>);

    #[async_trait]
    impl CollectionStore for FakeStore {
        fn name(&self) -> &str {
            "fake"
        }

        async fn list_collection_names(&self) -> anyhow::Result<Vec<String>> {
            match &self.0 {
                Ok(names) => Ok(names.clone()),
                Err(e) => Err(anyhow::anyhow!(e.to_string())),
            }
        }
    }

    fn ready(res: anyhow::Result<Vec<String>>) -> DatabaseProbe {
        DatabaseProbe::Ready(Arc::new(FakeStore(res)))
    }

    #[tokio::test]
    async fn missing_module_is_reported() {
        let report = diagnose(&DatabaseProbe::Missing, false, false).await;
        assert_eq!(report.backend, "✅ Running");
        assert_eq!(
            report.database,
            "❌ Database module not found (run enable-database first)"
        );
        assert_eq!(report.connection_status, "Not Connected");
        assert_eq!(report.database_url, "❌ Not Set");
        assert_eq!(report.database_name, "❌ Not Set");
        assert!(report.collections.is_empty());
    }

    #[tokio::test]
    async fn uninitialized_handle_is_reported() {
        let report = diagnose(&DatabaseProbe::Uninitialized, false, true).await;
        assert_eq!(report.database, "⚠️  Available but not initialized");
        assert_eq!(report.database_name, "✅ Set");
    }

    #[tokio::test]
    async fn failed_handle_reason_is_truncated() {
        let reason = "x".repeat(80);
        let report = diagnose(&DatabaseProbe::Failed(reason), true, true).await;
        assert_eq!(report.database, format!("❌ Error: {}", "x".repeat(50)));
        assert_eq!(report.connection_status, "Not Connected");
    }

    #[tokio::test]
    async fn working_store_lists_first_ten_collections() {
        let names: Vec<String> = (0..12).map(|i| format!("c{i}")).collect();
        let report = diagnose(&ready(Ok(names.clone())), true, true).await;
        assert_eq!(report.database, "✅ Connected & Working");
        assert_eq!(report.connection_status, "Connected");
        assert_eq!(report.collections, names[..10].to_vec());
        assert_eq!(report.database_url, "✅ Set");
    }

    #[tokio::test]
    async fn listing_error_is_rendered_not_raised() {
        let report = diagnose(&ready(Err(anyhow::anyhow!("connection refused"))), true, false).await;
        assert_eq!(report.database, "⚠️  Connected but Error: connection refused");
        assert_eq!(report.connection_status, "Connected");
        assert!(report.collections.is_empty());
    }

    #[cfg(feature = "database")]
    #[tokio::test]
    async fn http_store_lists_collections() {
        use httpmock::prelude::*;
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/collections");
                then.status(200).json_body(serde_json::json!({
                    "result": {"collections": [{"name": "notes"}, {"name": "moods"}]},
                    "status": "ok"
                }));
            })
            .await;
        let store = HttpCollectionStore::new(&server.url("/"), "vibes", DATABASE_TIMEOUT).unwrap();
        let names = store.list_collection_names().await.unwrap();
        mock.assert_async().await;
        assert_eq!(names, vec!["notes".to_string(), "moods".to_string()]);
        assert_eq!(store.name(), "vibes");
    }

    #[cfg(feature = "database")]
    #[tokio::test]
    async fn http_store_reports_error_status() {
        use httpmock::prelude::*;
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/collections");
                then.status(503).body("down");
            })
            .await;
        let store = HttpCollectionStore::new(&server.base_url(), "vibes", DATABASE_TIMEOUT).unwrap();
        let err = store.list_collection_names().await.unwrap_err();
        assert!(err.to_string().contains("503"));
    }

    #[cfg(feature = "database")]
    #[tokio::test]
    async fn silent_store_is_reported_after_timeout() {
        use httpmock::prelude::*;
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/collections");
                then.status(200)
                    .delay(Duration::from_secs(3))
                    .json_body(serde_json::json!({"result": {"collections": []}}));
            })
            .await;
        let store =
            HttpCollectionStore::new(&server.base_url(), "vibes", Duration::from_millis(200))
                .unwrap();
        let probe = DatabaseProbe::Ready(Arc::new(store));
        let report = tokio::time::timeout(Duration::from_secs(10), diagnose(&probe, true, true))
            .await
            .expect("diagnostics must not hang on a silent store");
        assert!(
            report.database.starts_with("⚠️  Connected but Error: "),
            "{}",
            report.database
        );
        assert_eq!(report.connection_status, "Connected");
        assert!(report.collections.is_empty());
    }

    #[cfg(feature = "database")]
    #[test]
    fn blank_url_leaves_database_uninitialized() {
        use clap::Parser;
        let args = Args::try_parse_from(["vibe-backend", "--database-url", ""]).unwrap();
        assert!(matches!(
            DatabaseProbe::from_args(&args),
            DatabaseProbe::Uninitialized
        ));
    }

    #[cfg(feature = "database")]
    #[test]
    fn invalid_url_fails_the_probe() {
        use clap::Parser;
        let args = Args::try_parse_from(["vibe-backend", "--database-url", "not a url"]).unwrap();
        assert!(matches!(DatabaseProbe::from_args(&args), DatabaseProbe::Failed(_)));
    }
}
