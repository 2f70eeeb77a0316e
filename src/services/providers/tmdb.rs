//! TMDB (The Movie Database) provider
//!
//! Resolves posters with a single `/search/movie` request per title and takes
//! the `poster_path` of the first result only.

use crate::{
    error::{AppError, AppResult},
    models::TmdbSearchResponse,
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;
use std::time::Duration;

const MAX_ERROR_BODY_BYTES: usize = 200;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    search_url: String,
    image_base: String,
}

impl TmdbProvider {
    /// Creates a provider whose requests are bounded by `timeout`
    pub fn new(
        api_key: String,
        search_url: String,
        image_base: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            search_url,
            image_base,
        })
    }

    /// Joins the image base and a poster path with exactly one slash
    fn poster_url(&self, poster_path: &str) -> String {
        format!(
            "{}/{}",
            self.image_base.trim_end_matches('/'),
            poster_path.trim_start_matches('/')
        )
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch_poster_url(&self, title: &str) -> AppResult<String> {
        let response = self
            .http_client
            .get(&self.search_url)
            .query(&[("api_key", self.api_key.as_str()), ("query", title)])
            .send()
            .await
            .map_err(redact_url)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status,
                truncate_body(&body, MAX_ERROR_BODY_BYTES)
            )));
        }

        let response_text = response.text().await.map_err(redact_url)?;
        tracing::debug!(response = %response_text, "Raw TMDB search response");

        let search: TmdbSearchResponse = serde_json::from_str(&response_text).map_err(|e| {
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })?;

        let poster_path = search.top_poster_path().ok_or_else(|| {
            AppError::ExternalApi(format!("No poster found for '{}'", title))
        })?;

        tracing::debug!(
            title = %title,
            results = search.results.len(),
            provider = "tmdb",
            "Poster resolved"
        );

        Ok(self.poster_url(poster_path))
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

/// The request URL carries the API key as a query parameter; keep it out of errors and logs
fn redact_url(error: reqwest::Error) -> AppError {
    AppError::HttpClient(error.without_url())
}

/// First `max` bytes of `body`, cut on a char boundary
fn truncate_body(body: &str, max: usize) -> &str {
    if body.len() <= max {
        return body;
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
