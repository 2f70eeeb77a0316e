pub mod enrichment;
pub mod providers;
pub mod ranking;
pub mod recommendations;

pub use enrichment::PosterResolver;
pub use providers::{MetadataProvider, TmdbProvider};
pub use recommendations::{RecommendOptions, RecommendationService, SharedRecommender};
