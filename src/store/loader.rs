use reqwest::Client as HttpClient;
use std::path::{Path, PathBuf};

use crate::{
    error::{AppError, AppResult},
    store::{Catalog, SimilarityMatrix},
};

/// A loadable artifact: a local file, optionally backed by a remote copy
#[derive(Debug, Clone)]
pub struct ArtifactSource {
    pub path: PathBuf,
    pub url: Option<String>,
}

impl ArtifactSource {
    pub fn new(path: impl Into<PathBuf>, url: Option<String>) -> Self {
        Self {
            path: path.into(),
            url,
        }
    }

    fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Loads the item table and similarity matrix, downloading whichever is missing
pub struct ArtifactLoader {
    http_client: HttpClient,
    catalog: ArtifactSource,
    matrix: ArtifactSource,
}

impl ArtifactLoader {
    pub fn new(catalog: ArtifactSource, matrix: ArtifactSource) -> Self {
        Self {
            http_client: HttpClient::new(),
            catalog,
            matrix,
        }
    }

    pub async fn load_catalog(&self) -> AppResult<Catalog> {
        let bytes = self.read_artifact(&self.catalog).await?;
        let catalog = parse_blocking(move || Catalog::from_json(&bytes)).await?;

        tracing::info!(
            items = catalog.len(),
            path = %self.catalog.path.display(),
            "Catalog loaded"
        );

        Ok(catalog)
    }

    pub async fn load_matrix(&self) -> AppResult<SimilarityMatrix> {
        let bytes = self.read_artifact(&self.matrix).await?;
        let matrix = parse_blocking(move || SimilarityMatrix::from_json(&bytes)).await?;

        tracing::info!(
            dimension = matrix.dimension(),
            path = %self.matrix.path.display(),
            "Similarity matrix loaded"
        );

        Ok(matrix)
    }

    /// Loads both artifacts concurrently
    pub async fn load(&self) -> AppResult<(Catalog, SimilarityMatrix)> {
        tokio::try_join!(self.load_catalog(), self.load_matrix())
    }

    async fn read_artifact(&self, source: &ArtifactSource) -> AppResult<Vec<u8>> {
        self.ensure_local(source).await?;

        tokio::fs::read(&source.path).await.map_err(|e| {
            AppError::SourceUnavailable(format!(
                "Failed to read {}: {}",
                source.path.display(),
                e
            ))
        })
    }

    /// Downloads the artifact unless it already exists locally
    async fn ensure_local(&self, source: &ArtifactSource) -> AppResult<()> {
        let exists = tokio::fs::try_exists(&source.path).await.map_err(|e| {
            AppError::SourceUnavailable(format!(
                "Failed to check {}: {}",
                source.path.display(),
                e
            ))
        })?;
        if exists {
            return Ok(());
        }

        let url = source.url.as_deref().ok_or_else(|| {
            AppError::SourceUnavailable(format!(
                "{} is missing and no download URL is configured",
                source.path.display()
            ))
        })?;

        tracing::info!(artifact = %source.name(), url = %url, "Downloading artifact");

        let bytes = self.download(url).await.map_err(|e| {
            tracing::error!(artifact = %source.name(), error = %e, "Artifact download failed");
            AppError::SourceUnavailable(format!("Failed to download {}: {}", source.name(), e))
        })?;

        write_atomically(&source.path, &bytes).await?;

        tracing::info!(
            artifact = %source.name(),
            bytes = bytes.len(),
            "Artifact downloaded"
        );

        Ok(())
    }

    async fn download(&self, url: &str) -> AppResult<Vec<u8>> {
        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "artifact host returned status {}",
                response.status()
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Writes to a sibling temp file and renames it over `path`
///
/// The temp file is removed if either step fails.
async fn write_atomically(path: &Path, bytes: &[u8]) -> AppResult<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".part");
    let tmp = PathBuf::from(tmp);

    let io_error = |e: std::io::Error| {
        AppError::SourceUnavailable(format!("Failed to write {}: {}", path.display(), e))
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
    }

    let written = match tokio::fs::write(&tmp, bytes).await {
        Ok(()) => tokio::fs::rename(&tmp, path).await,
        Err(e) => Err(e),
    };
    if let Err(e) = written {
        if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
            if cleanup.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %tmp.display(), error = %cleanup, "Failed to remove partial download");
            }
        }
        return Err(io_error(e));
    }
    Ok(())
}

async fn parse_blocking<T, F>(parse: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> AppResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(parse)
        .await
        .map_err(|e| AppError::Internal(format!("Artifact parser panicked: {}", e)))?
}
