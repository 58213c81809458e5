//! Current-weather lookup against OpenWeatherMap.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::time::Duration;
use tracing::debug;

use crate::config::non_empty;
use crate::error::WeatherError;

/// Query parameters accepted by `/api/weather`.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherQuery {
    pub city: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Flat weather summary. Anything the provider omits is `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub city: Option<String>,
    pub country: Option<String>,
    pub temp: Option<Number>,
    pub feels_like: Option<Number>,
    pub humidity: Option<Number>,
    pub wind: Option<Number>,
    pub weather_main: Option<String>,
    pub weather_desc: Option<String>,
    pub icon: Option<String>,
}

impl WeatherResult {
    /// Flattens the provider's nested payload.
    pub fn from_provider(data: &Value) -> Self {
        let text = |ptr: &str| data.pointer(ptr).and_then(Value::as_str).map(str::to_owned);
        let number = |ptr: &str| match data.pointer(ptr) {
            Some(Value::Number(n)) => Some(n.clone()),
            _ => None,
        };
        Self {
            city: text("/name"),
            country: text("/sys/country"),
            temp: number("/main/temp"),
            feels_like: number("/main/feels_like"),
            humidity: number("/main/humidity"),
            wind: number("/wind/speed"),
            weather_main: text("/weather/0/main"),
            weather_desc: text("/weather/0/description"),
            icon: text("/weather/0/icon"),
        }
    }
}

/// Client for the provider's current-weather endpoint.
///
/// Holds the process-wide key, used whenever a request does not carry its
/// own. One outbound call per lookup; nothing is cached or retried.
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    endpoint: String,
    default_key: Option<String>,
}

impl WeatherClient {
    pub fn new(
        endpoint: impl Into<String>,
        default_key: Option<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            default_key: default_key.filter(|k| !k.is_empty()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn has_default_key(&self) -> bool {
        self.default_key.is_some()
    }

    /// Looks up the current weather for `city`.
    ///
    /// `api_key` wins over the configured key. Without either, fails with
    /// [`WeatherError::MissingApiKey`] before any network traffic.
    pub async fn current(
        &self,
        city: &str,
        api_key: Option<&str>,
    ) -> Result<WeatherResult, WeatherError> {
        let key = non_empty(api_key)
            .or(self.default_key.as_deref())
            .ok_or(WeatherError::MissingApiKey)?;
        debug!(%city, endpoint = %self.endpoint, "fetching weather");
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("q", city), ("appid", key), ("units", "metric")])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(WeatherError::Upstream {
                status: status.as_u16(),
                body,
            });
        }
        let data: Value = resp.json().await?;
        if !data.is_object() {
            return Err(WeatherError::Malformed(data.to_string()));
        }
        Ok(WeatherResult::from_provider(&data))
    }
}
