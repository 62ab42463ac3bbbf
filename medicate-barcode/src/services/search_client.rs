//! Web search client
//!
//! Fetches result records (title, link, snippet) for a query string from
//! the Google Custom Search JSON API. The ranking engine only sees
//! [`RawCandidate`]s, so other providers can be plugged in behind
//! [`SearchProvider`].

use std::time::Duration;

use async_trait::async_trait;
use medicate_common::config::{SearchConfig, SearchCredentials};
use serde::Deserialize;
use thiserror::Error;

use crate::engine::RawCandidate;

const USER_AGENT: &str = concat!("medicate-barcode/", env!("CARGO_PKG_VERSION"));

/// Search client errors
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Missing GOOGLE_API_KEY/GOOGLE_CSE_ID")]
    NotConfigured,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Source of search-result records for a query
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider identifier reported to clients (e.g. "google")
    fn provider_id(&self) -> &'static str;

    /// Run one search and return the result records in provider order
    async fn search(&self, query: &str) -> Result<Vec<RawCandidate>, SearchError>;
}

/// Custom Search response (only the fields we use)
#[derive(Debug, Deserialize)]
struct CseResponse {
    /// Absent when the query has no results
    #[serde(default)]
    items: Option<Vec<CseItem>>,
}

#[derive(Debug, Deserialize)]
struct CseItem {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

impl CseItem {
    /// Missing fields become empty strings
    fn into_candidate(self) -> RawCandidate {
        RawCandidate {
            title: self.title.unwrap_or_default(),
            link: self.link.unwrap_or_default(),
            snippet: self.snippet.unwrap_or_default(),
        }
    }
}

/// Google Custom Search client
pub struct GoogleSearchClient {
    http_client: reqwest::Client,
    base_url: String,
    credentials: SearchCredentials,
}

impl GoogleSearchClient {
    pub fn new(config: &SearchConfig, credentials: SearchCredentials) -> Result<Self, SearchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SearchError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
            credentials,
        })
    }

    /// Whether both the API key and engine id are available
    pub fn is_configured(&self) -> bool {
        self.credentials.is_complete()
    }
}

#[async_trait]
impl SearchProvider for GoogleSearchClient {
    fn provider_id(&self) -> &'static str {
        "google"
    }

    async fn search(&self, query: &str) -> Result<Vec<RawCandidate>, SearchError> {
        let (Some(key), Some(cx)) = (&self.credentials.api_key, &self.credentials.cse_id) else {
            return Err(SearchError::NotConfigured);
        };

        tracing::debug!(query = %query, "Querying Custom Search API");

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[("key", key.as_str()), ("cx", cx.as_str()), ("q", query)])
            .send()
            .await
            .map_err(|e| SearchError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiError(status.as_u16(), error_text));
        }

        let body: CseResponse = response
            .json()
            .await
            .map_err(|e| SearchError::ParseError(e.to_string()))?;

        let candidates = into_candidates(body);
        tracing::info!(
            query = %query,
            results = candidates.len(),
            "Retrieved search results"
        );

        Ok(candidates)
    }
}

fn into_candidates(body: CseResponse) -> Vec<RawCandidate> {
    body.items
        .unwrap_or_default()
        .into_iter()
        .map(CseItem::into_candidate)
        .collect()
}
