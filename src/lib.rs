pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;

use config::Config;
use error::AppResult;
use services::{PosterResolver, RecommendOptions, RecommendationService, TmdbProvider};
use store::{ArtifactLoader, ArtifactSource};

/// Loads artifacts and wires up the recommendation service from configuration
///
/// Fails with `SourceUnavailable` if an artifact cannot be fetched or parsed and
/// with `ShapeMismatch` if the catalog and matrix disagree.
pub async fn build_recommender(config: &Config) -> AppResult<RecommendationService> {
    let loader = ArtifactLoader::new(
        ArtifactSource::new(&config.movie_dict_path, config.movie_dict_url.clone()),
        ArtifactSource::new(&config.similarity_path, config.similarity_url.clone()),
    );
    let (catalog, matrix) = loader.load().await?;

    let provider = TmdbProvider::new(
        config.tmdb_api_key.clone(),
        config.tmdb_search_url.clone(),
        config.tmdb_image_base.clone(),
        config.tmdb_timeout(),
    )?;
    let resolver = PosterResolver::new(Arc::new(provider), config.placeholder_poster_url.clone());

    RecommendationService::new(
        catalog,
        matrix,
        resolver,
        RecommendOptions {
            top_k: config.top_k,
            enrichment_mode: config.enrichment_mode,
        },
    )
}
