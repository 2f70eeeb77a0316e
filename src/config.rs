use serde::Deserialize;
use std::{path::PathBuf, time::Duration};

/// How poster lookups for a single recommendation are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentMode {
    /// One lookup after another, in rank order
    Sequential,
    /// One task per candidate, joined back in rank order
    #[default]
    Concurrent,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB movie search endpoint
    #[serde(default = "default_tmdb_search_url")]
    pub tmdb_search_url: String,

    /// Base URL that poster paths are appended to
    #[serde(default = "default_tmdb_image_base")]
    pub tmdb_image_base: String,

    /// Returned whenever a poster cannot be resolved
    #[serde(default = "default_placeholder_poster_url")]
    pub placeholder_poster_url: String,

    /// Per-lookup timeout in seconds
    #[serde(default = "default_tmdb_timeout_secs")]
    pub tmdb_timeout_secs: u64,

    /// Local path of the item table
    #[serde(default = "default_movie_dict_path")]
    pub movie_dict_path: PathBuf,

    /// Where to download the item table from when it is missing locally
    #[serde(default)]
    pub movie_dict_url: Option<String>,

    /// Local path of the similarity matrix
    #[serde(default = "default_similarity_path")]
    pub similarity_path: PathBuf,

    /// Where to download the similarity matrix from when it is missing locally
    #[serde(default)]
    pub similarity_url: Option<String>,

    /// Number of recommendations per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    #[serde(default)]
    pub enrichment_mode: EnrichmentMode,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_search_url() -> String {
    "https://api.themoviedb.org/3/search/movie".to_string()
}

fn default_tmdb_image_base() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_placeholder_poster_url() -> String {
    "https://via.placeholder.com/500x750?text=Poster+Not+Found".to_string()
}

fn default_tmdb_timeout_secs() -> u64 {
    10
}

fn default_movie_dict_path() -> PathBuf {
    PathBuf::from("movie_dict.json")
}

fn default_similarity_path() -> PathBuf {
    PathBuf::from("similarity.json")
}

fn default_top_k() -> usize {
    5
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.tmdb_api_key.trim().is_empty() {
            anyhow::bail!("TMDB_API_KEY is not set");
        }
        if self.top_k == 0 {
            anyhow::bail!("TOP_K must be at least 1");
        }
        Ok(())
    }

    pub fn tmdb_timeout(&self) -> Duration {
        Duration::from_secs(self.tmdb_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
