use std::sync::Arc;

use crate::services::providers::MetadataProvider;

/// Resolves posters for recommended titles, never failing
///
/// Any provider error (timeout, transport, bad status, malformed body, no
/// poster) is logged as a warning and replaced by the placeholder URL.
#[derive(Clone)]
pub struct PosterResolver {
    provider: Arc<dyn MetadataProvider>,
    placeholder_url: String,
}

impl PosterResolver {
    pub fn new(provider: Arc<dyn MetadataProvider>, placeholder_url: String) -> Self {
        Self {
            provider,
            placeholder_url,
        }
    }

    pub async fn resolve(&self, title: &str) -> String {
        match self.provider.fetch_poster_url(title).await {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(
                    title = %title,
                    provider = self.provider.name(),
                    error = %e,
                    "Poster lookup failed, using placeholder"
                );
                self.placeholder_url.clone()
            }
        }
    }

    pub fn placeholder_url(&self) -> &str {
        &self.placeholder_url
    }
}
