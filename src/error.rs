use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Selected title is not in the catalog. Recoverable, reported to the caller.
    #[error("Movie not found in database: {0}")]
    ItemNotFound(String),

    /// Catalog and similarity matrix disagree on dimensions. Fatal at startup.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// An artifact could not be fetched or parsed. Fatal at startup.
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::ItemNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::ShapeMismatch(_)
            | AppError::SourceUnavailable(_)
            | AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_not_found_maps_to_404() {
        let response = AppError::ItemNotFound("Avatar".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_startup_faults_map_to_500() {
        let shape = AppError::ShapeMismatch("5 items, 4 rows".to_string()).into_response();
        let source = AppError::SourceUnavailable("gone".to_string()).into_response();
        assert_eq!(shape.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(source.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_item_not_found_message() {
        let err = AppError::ItemNotFound("Avatar".to_string());
        assert_eq!(err.to_string(), "Movie not found in database: Avatar");
    }
}
