//! Movie metadata provider abstraction
//!
//! Providers resolve a catalog title to display metadata from an external
//! service. They report every failure as an error; degrading to placeholder
//! metadata is the caller's job (see `services::enrichment`).

use crate::error::AppResult;

pub mod tmdb;

pub use tmdb::TmdbProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Resolve a poster URL for the title's top search match
    ///
    /// Exactly one upstream request per call, no retries.
    async fn fetch_poster_url(&self, title: &str) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
