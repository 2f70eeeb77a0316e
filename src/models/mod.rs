use serde::{Deserialize, Serialize};

pub mod tmdb;

pub use tmdb::{TmdbMovie, TmdbSearchResponse};

/// A movie in the catalog
///
/// `index` is the item's position in the catalog and its row/column in the
/// similarity matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub index: usize,
    pub title: String,
}

/// A peer of the query item together with its similarity score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedCandidate {
    pub index: usize,
    pub score: f64,
}

/// A single recommendation returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendationResult {
    pub title: String,
    /// Resolved poster, or the placeholder when the lookup failed
    pub poster_url: String,
}

/// Request body for the recommendations endpoint
#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub title: String,
}

/// Response for the recommendations endpoint
#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub title: String,
    pub recommendations: Vec<RecommendationResult>,
}
