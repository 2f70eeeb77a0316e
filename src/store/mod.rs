pub mod catalog;
pub mod loader;
pub mod matrix;

pub use catalog::Catalog;
pub use loader::{ArtifactLoader, ArtifactSource};
pub use matrix::SimilarityMatrix;
