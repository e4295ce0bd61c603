use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::model::Location;

const BASE_URL: &str = "https://api.openweathermap.org/data/3.0";

/// Failures the client distinguishes. A non-2xx answer is kept separate from
/// transport problems so callers can decide whether to keep going (the
/// date-range loop does) or stop.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Optional query parameters for the current-conditions call, forwarded
/// verbatim when set and omitted from the query when not.
#[derive(Debug, Clone, Default)]
pub struct CurrentOptions {
    pub exclude: Option<String>,
    pub units: Option<String>,
    pub lang: Option<String>,
}

/// Anything the date-range fetch can pull daily summaries from. The real
/// implementation is [`OpenWeatherClient`]; tests substitute a canned source.
#[async_trait]
pub trait DaySummarySource: Send + Sync {
    async fn day_summary(
        &self,
        location: &Location,
        date: NaiveDate,
        tz: Option<&str>,
    ) -> Result<Value, ClientError>;
}

/// Client for the One Call 3.0 endpoint family. One synchronous GET per
/// call, no retries, reqwest's default timeout.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }

    /// Current conditions and forecast: GET `/onecall`.
    pub async fn current(
        &self,
        location: &Location,
        opts: &CurrentOptions,
    ) -> Result<Value, ClientError> {
        let url = format!("{}/onecall", self.base_url);

        let mut params = self.base_params(location);
        for (key, value) in [
            ("exclude", &opts.exclude),
            ("units", &opts.units),
            ("lang", &opts.lang),
        ] {
            if let Some(v) = value {
                params.push((key, v.clone()));
            }
        }

        self.get_json(&url, &params).await
    }

    /// One historical reading: GET `/onecall/timemachine`.
    pub async fn timemachine(
        &self,
        location: &Location,
        timestamp: i64,
    ) -> Result<Value, ClientError> {
        let url = format!("{}/onecall/timemachine", self.base_url);

        let mut params = self.base_params(location);
        params.push(("dt", timestamp.to_string()));

        self.get_json(&url, &params).await
    }

    fn base_params(&self, location: &Location) -> Vec<(&'static str, String)> {
        vec![
            ("lat", location.lat.to_string()),
            ("lon", location.lon.to_string()),
            ("appid", self.api_key.clone()),
        ]
    }

    async fn get_json(
        &self,
        url: &str,
        params: &[(&'static str, String)],
    ) -> Result<Value, ClientError> {
        tracing::debug!(message = "sending API request", url = %url);

        let res = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| ClientError::Transport {
                url: url.to_string(),
                source: e,
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| ClientError::Transport {
            url: url.to_string(),
            source: e,
        })?;

        if !status.is_success() {
            return Err(ClientError::Status {
                url: url.to_string(),
                status,
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Decode {
            url: url.to_string(),
            source: e,
        })
    }
}

#[async_trait]
impl DaySummarySource for OpenWeatherClient {
    /// Aggregated record for one calendar date: GET `/onecall/day_summary`.
    async fn day_summary(
        &self,
        location: &Location,
        date: NaiveDate,
        tz: Option<&str>,
    ) -> Result<Value, ClientError> {
        let url = format!("{}/onecall/day_summary", self.base_url);

        let mut params = self.base_params(location);
        params.push(("date", date.format("%Y-%m-%d").to_string()));
        if let Some(tz) = tz {
            params.push(("tz", tz.to_string()));
        }

        self.get_json(&url, &params).await
    }
}
