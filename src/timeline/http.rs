//! HTTP implementation of the timeline client
//!
//! Talks to the remote service over REST:
//! - `GET {base}/timeline` returns the user's recent items as JSON
//! - `DELETE {base}/items/{id}` removes a single item
//!
//! Credential material is assembled by the configuration layer and sent as
//! request headers. Every request carries a client-wide timeout so a hung
//! remote call cannot stall the scheduler's control loop indefinitely.

use std::time::Duration;

use reqwest::{Client, StatusCode, header};
use tracing::debug;

use crate::config::ApiCredentials;
use crate::timeline::{Item, TimelineClient, TimelineError};

/// Per-request timeout applied to every remote call
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// reqwest-backed client for the remote timeline service
pub struct HttpTimelineClient {
    client: Client,
    base_url: String,
}

impl HttpTimelineClient {
    /// Creates a client from the configured base URL and credentials,
    /// using the default per-request timeout.
    pub fn new(
        base_url: impl Into<String>,
        credentials: &ApiCredentials,
    ) -> Result<Self, TimelineError> {
        Self::with_timeout(
            base_url,
            credentials,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        )
    }

    /// Creates a client with an explicit per-request timeout.
    ///
    /// Fails only when the underlying HTTP client cannot be constructed,
    /// e.g. a credential value is not a valid header value.
    pub fn with_timeout(
        base_url: impl Into<String>,
        credentials: &ApiCredentials,
        timeout: Duration,
    ) -> Result<Self, TimelineError> {
        let mut headers = header::HeaderMap::new();
        for (name, value) in [
            ("X-Api-Key", &credentials.api_key),
            ("X-Api-Secret", &credentials.api_secret),
            ("X-Access-Token", &credentials.access_token),
            ("X-Access-Secret", &credentials.access_secret),
        ] {
            let mut value =
                header::HeaderValue::from_str(value).map_err(|e| TimelineError::Config {
                    message: format!("invalid credential value for {}: {}", name, e),
                })?;
            value.set_sensitive(true);
            headers.insert(name, value);
        }

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| TimelineError::Config {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Maps a non-success response to a `TimelineError`
    async fn error_from_response(response: reqwest::Response) -> TimelineError {
        let status = response.status();
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let message = response.text().await.unwrap_or_default();

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => TimelineError::Auth { message },
            StatusCode::TOO_MANY_REQUESTS => TimelineError::RateLimit {
                message,
                retry_after,
            },
            _ => TimelineError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait::async_trait]
impl TimelineClient for HttpTimelineClient {
    async fn list_timeline(&self) -> Result<Vec<Item>, TimelineError> {
        let url = format!("{}/timeline", self.base_url);
        debug!(url = %url, "Fetching timeline");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let items: Vec<Item> = response.json().await.map_err(|e| {
            TimelineError::Serialization {
                message: e.to_string(),
            }
        })?;

        debug!(count = items.len(), "Timeline fetched");
        Ok(items)
    }

    async fn delete_item(&self, id: u64) -> Result<(), TimelineError> {
        let url = format!("{}/items/{}", self.base_url, id);
        debug!(item_id = %id, "Deleting remote item");

        let response = self.client.delete(&url).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        Ok(())
    }
}
