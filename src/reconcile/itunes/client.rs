//! iTunes Search HTTP client
//!
//! Every request carries the configured per-request timeout and is raced
//! against the caller's cancellation token.

use tokio_util::sync::CancellationToken;

use super::{PAGE_SIZE, adapter, dto};
use crate::config::HttpConfig;
use crate::reconcile::domain::{CatalogPage, CatalogQuery, ReconcileError};

/// iTunes Search API client
pub struct ITunesClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ITunesClient {
    /// Create a client from the HTTP settings.
    pub fn new(config: &HttpConfig) -> Result<Self, ReconcileError> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent_header())
            .timeout(config.timeout())
            .build()
            .map_err(|e| ReconcileError::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.itunes_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch one page of search results.
    pub async fn search(
        &self,
        query: &CatalogQuery,
        cancel: &CancellationToken,
    ) -> Result<CatalogPage, ReconcileError> {
        let url = self.search_url(query);
        tracing::debug!("iTunes search: {}", url);

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ReconcileError::Cancelled),
            response = self.send(&url) => response?,
        };
        Ok(adapter::to_catalog_page(response))
    }

    fn search_url(&self, query: &CatalogQuery) -> String {
        let mut url = format!(
            "{}/search?term={}&media=music&limit={}&offset={}",
            self.base_url,
            urlencoding::encode(&query.term),
            PAGE_SIZE,
            query.offset
        );
        if !query.omit_category {
            let entity = query.category.map(|c| c.as_param()).unwrap_or("album");
            url.push_str("&entity=");
            url.push_str(entity);
        }
        if let Some(field) = query.field {
            url.push_str("&attribute=");
            url.push_str(field.as_param());
        }
        url
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
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ReconcileError::RateLimited);
        }

        if !status.is_success() {
            return Err(ReconcileError::ApiError(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response.json::<dto::SearchResponse>().await.map_err(|e| {
            if e.is_timeout() {
                ReconcileError::from_transport(e)
            } else {
                ReconcileError::Parse(e.to_string())
            }
        })
    }
}
