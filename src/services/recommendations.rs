use std::{future::Future, sync::Arc};

use tokio::sync::OnceCell;

use crate::{
    config::EnrichmentMode,
    error::{AppError, AppResult},
    models::{RankedCandidate, RecommendationResult},
    services::{enrichment::PosterResolver, ranking},
    store::{Catalog, SimilarityMatrix},
};

/// Tuning knobs for a recommendation service
#[derive(Debug, Clone, Copy)]
pub struct RecommendOptions {
    pub top_k: usize,
    pub enrichment_mode: EnrichmentMode,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            top_k: 5,
            enrichment_mode: EnrichmentMode::Concurrent,
        }
    }
}

/// Answers "movies similar to X" queries
///
/// Owns the catalog and similarity matrix for the lifetime of the process.
/// Nothing here is mutated after construction, so one instance is shared
/// across requests behind an `Arc` without locking.
pub struct RecommendationService {
    catalog: Catalog,
    matrix: SimilarityMatrix,
    resolver: PosterResolver,
    options: RecommendOptions,
}

impl RecommendationService {
    /// Fails with `ShapeMismatch` unless the matrix has one row per catalog item
    pub fn new(
        catalog: Catalog,
        matrix: SimilarityMatrix,
        resolver: PosterResolver,
        options: RecommendOptions,
    ) -> AppResult<Self> {
        if catalog.len() != matrix.dimension() {
            return Err(AppError::ShapeMismatch(format!(
                "catalog has {} items but similarity matrix is {}x{}",
                catalog.len(),
                matrix.dimension(),
                matrix.dimension()
            )));
        }

        Ok(Self {
            catalog,
            matrix,
            resolver,
            options,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// All selectable titles, in stored order
    pub fn list_titles(&self) -> Vec<String> {
        self.catalog.titles().map(str::to_string).collect()
    }

    /// Ranks the closest peers of `title` without fetching metadata
    pub fn rank(&self, title: &str) -> AppResult<Vec<RankedCandidate>> {
        let index = self.catalog.resolve(title)?;
        ranking::top_k(&self.matrix, index, self.options.top_k)
    }

    /// Recommends up to `top_k` movies similar to `title`, in rank order
    ///
    /// Unknown titles yield `ItemNotFound` and no partial results. Poster
    /// lookups that fail degrade to the placeholder and never reorder or drop
    /// a recommendation.
    pub async fn recommend(&self, title: &str) -> AppResult<Vec<RecommendationResult>> {
        let ranked = self.rank(title)?;

        let titles = ranked
            .iter()
            .map(|candidate| {
                self.catalog
                    .title(candidate.index)
                    .map(str::to_string)
                    .ok_or_else(|| {
                        AppError::Internal(format!("ranked index {} not in catalog", candidate.index))
                    })
            })
            .collect::<AppResult<Vec<String>>>()?;

        let posters = match self.options.enrichment_mode {
            EnrichmentMode::Sequential => self.resolve_sequential(&titles).await,
            EnrichmentMode::Concurrent => self.resolve_concurrent(&titles).await,
        };

        tracing::info!(
            title = %title,
            results = titles.len(),
            mode = ?self.options.enrichment_mode,
            "Recommendations computed"
        );

        Ok(titles
            .into_iter()
            .zip(posters)
            .map(|(title, poster_url)| RecommendationResult { title, poster_url })
            .collect())
    }

    async fn resolve_sequential(&self, titles: &[String]) -> Vec<String> {
        let mut posters = Vec::with_capacity(titles.len());
        for title in titles {
            posters.push(self.resolver.resolve(title).await);
        }
        posters
    }

    /// One task per title, awaited in rank order
    async fn resolve_concurrent(&self, titles: &[String]) -> Vec<String> {
        let tasks: Vec<_> = titles
            .iter()
            .cloned()
            .map(|title| {
                let resolver = self.resolver.clone();
                tokio::spawn(async move { resolver.resolve(&title).await })
            })
            .collect();

        let mut posters = Vec::with_capacity(tasks.len());
        for (task, title) in tasks.into_iter().zip(titles) {
            match task.await {
                Ok(url) => posters.push(url),
                Err(e) => {
                    tracing::warn!(title = %title, error = %e, "Poster lookup task failed");
                    posters.push(self.resolver.placeholder_url().to_string());
                }
            }
        }
        posters
    }
}

/// One-time initialization barrier for the process-wide recommendation service
///
/// Concurrent callers of `get_or_init` share a single initialization; only the
/// first runs its loader. A failed initialization leaves the cell empty.
#[derive(Clone, Default)]
pub struct SharedRecommender {
    cell: Arc<OnceCell<Arc<RecommendationService>>>,
}

impl SharedRecommender {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_init<F, Fut>(&self, init: F) -> AppResult<Arc<RecommendationService>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<RecommendationService>>,
    {
        self.cell
            .get_or_try_init(|| async move { init().await.map(Arc::new) })
            .await
            .cloned()
    }
}
