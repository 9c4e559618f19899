use async_trait::async_trait;
use reqwest::Client;

use crate::config::Config;
use crate::error::{FeedError, Result};
use crate::source::ContentSource;
use crate::types::{HomeSectionsResponse, SearchResponse};

/// [`ContentSource`] backed by the real backends: the home feed lives on one
/// host, search on another.
pub struct HttpContentSource {
    client: Client,
    home_base_url: String,
    search_base_url: String,
}

impl std::fmt::Debug for HttpContentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpContentSource").finish_non_exhaustive()
    }
}

impl HttpContentSource {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.request_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| FeedError::Unexpected(e.to_string()))?;

        Ok(Self {
            client,
            home_base_url: config.home_base_url.trim_end_matches('/').to_string(),
            search_base_url: config.search_base_url.trim_end_matches('/').to_string(),
        })
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(FeedError::Http {
            status: status.as_u16(),
            message: status.canonical_reason().unwrap_or("unknown error").to_string(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| FeedError::Network(e.to_string()))?;

    if body.is_empty() {
        return Err(FeedError::EmptyBody);
    }

    serde_json::from_slice(&body).map_err(|e| FeedError::Unexpected(e.to_string()))
}

#[async_trait]
impl ContentSource for HttpContentSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn home_sections(&self, page: u32) -> Result<HomeSectionsResponse> {
        let url = format!("{}/home_sections?page={}", self.home_base_url, page);
        tracing::debug!(%url, "fetching home sections");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        read_json(response).await
    }

    async fn search(&self, query: &str) -> Result<SearchResponse> {
        // The search backend takes the query as a path segment, POSTed.
        let url = format!("{}/{}", self.search_base_url, urlencoding::encode(query));
        tracing::debug!(%url, "searching");

        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        read_json(response).await
    }
}
