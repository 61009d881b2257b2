use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

/// Errors raised while proxying a distance-matrix lookup
#[derive(Error, Debug)]
pub enum DistanceError {
    #[error("GOOGLE_MAP_API_KEY is not configured")]
    MissingApiKey,
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Failed to reach distance matrix API: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Error fetching data from Google API (HTTP {0})")]
    UpstreamStatus(StatusCode),
    #[error("Distance matrix API returned an unreadable body: {0}")]
    UpstreamPayload(String),
    #[error("Distance matrix API rejected the request: {status} {message}")]
    Rejected { status: String, message: String },
}

/// Source of travel distance/duration between two places
#[async_trait::async_trait]
pub trait DistanceMatrix: Send + Sync {
    /// Look up `origin` to `destination` and return the provider's JSON body
    async fn lookup(&self, origin: &str, destination: &str) -> Result<Value, DistanceError>;
}

/// Settings for the Google distance matrix client
#[derive(Debug, Clone)]
pub struct MapsConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// No timeout when unset
    pub timeout: Option<Duration>,
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://maps.googleapis.com".to_string(),
            timeout: None,
        }
    }
}

/// Client for the Google Maps Distance Matrix API
pub struct GoogleDistanceMatrix {
    client: reqwest::Client,
    config: MapsConfig,
}

impl GoogleDistanceMatrix {
    pub fn new(config: MapsConfig) -> Result<Self, DistanceError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(DistanceError::Client)?;
        Ok(Self { client, config })
    }

    /// Full request URL with every component percent-encoded
    fn request_url(&self, origin: &str, destination: &str, api_key: &str) -> String {
        format!(
            "{}/maps/api/distancematrix/json?origins={}&destinations={}&key={}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(origin),
            urlencoding::encode(destination),
            urlencoding::encode(api_key),
        )
    }
}

/// Google answers most failures with HTTP 200 and a non-OK `status`
fn check_payload_status(body: &Value) -> Result<(), DistanceError> {
    match body.get("status").and_then(Value::as_str) {
        None | Some("OK") => Ok(()),
        Some(status) => Err(DistanceError::Rejected {
            status: status.to_string(),
            message: body
                .get("error_message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }),
    }
}

#[async_trait::async_trait]
impl DistanceMatrix for GoogleDistanceMatrix {
    async fn lookup(&self, origin: &str, destination: &str) -> Result<Value, DistanceError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(DistanceError::MissingApiKey)?;

        let url = self.request_url(origin, destination, api_key);

        let response = self.client.get(&url).send().await.map_err(|e| {
            error!(?e, "failed to call distance matrix API");
            DistanceError::Transport(e)
        })?;

        let status = response.status();
        let text = response.text().await.map_err(DistanceError::Transport)?;
        debug!(%status, body = %text, "response from distance matrix API");

        if status != StatusCode::OK {
            return Err(DistanceError::UpstreamStatus(status));
        }

        let body: Value = serde_json::from_str(&text).map_err(|e| DistanceError::UpstreamPayload(e.to_string()))?;
        check_payload_status(&body)?;

        Ok(body)
    }
}
