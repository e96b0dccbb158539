//! MusicBrainz HTTP client
//!
//! MusicBrainz requires a descriptive User-Agent header and rate limits to
//! 1 req/sec; a 503 means the limit was hit.

use tokio_util::sync::CancellationToken;

use super::{adapter, dto};
use crate::config::HttpConfig;
use crate::reconcile::domain::{EncyclopediaRelease, ReconcileError};

/// MusicBrainz API client
pub struct MusicBrainzClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl MusicBrainzClient {
    /// Create a client from the HTTP settings.
    pub fn new(config: &HttpConfig) -> Result<Self, ReconcileError> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent_header())
            .timeout(config.timeout())
            .build()
            .map_err(|e| ReconcileError::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.musicbrainz_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Run a Lucene release search, e.g. `barcode:093624684724`.
    pub async fn search_releases(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<EncyclopediaRelease>, ReconcileError> {
        let url = self.search_url(query);
        tracing::debug!("MusicBrainz search: {}", url);

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ReconcileError::Cancelled),
            response = self.send(&url) => response?,
        };
        Ok(adapter::to_releases(response))
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/release/?query={}&fmt=json",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    /// Send the HTTP request and parse the response
    async fn send(&self, url: &str) -> Result<dto::SearchResponse, ReconcileError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(ReconcileError::from_transport)?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || status == reqwest::StatusCode::SERVICE_UNAVAILABLE
        {
            return Err(ReconcileError::RateLimited);
        }

        if !status.is_success() {
            if let Ok(error) = response.json::<dto::ApiError>().await {
                return Err(ReconcileError::ApiError(error.error));
            }
            return Err(ReconcileError::ApiError(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .json::<dto::SearchResponse>()
            .await
            .map_err(|e| ReconcileError::Parse(e.to_string()))
    }
}
