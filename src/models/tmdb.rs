use serde::Deserialize;

// ============================================================================
// TMDB Search API Types
// ============================================================================

/// Raw response from TMDB `/search/movie`
///
/// `results` is sometimes `null` or missing on error payloads; both read as empty.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TmdbSearchResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<TmdbMovie>,
}

/// One entry of a TMDB search result list
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl TmdbSearchResponse {
    /// Poster path of the top match, if it has a non-empty one
    pub fn top_poster_path(&self) -> Option<&str> {
        self.results
            .first()
            .and_then(|movie| movie.poster_path.as_deref())
            .filter(|path| !path.trim().is_empty())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<TmdbMovie>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let results: Option<Vec<TmdbMovie>> = Option::deserialize(deserializer)?;
    Ok(results.unwrap_or_default())
}
