use axum::{extract::State, Extension, Json};

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{RecommendationRequest, RecommendationResponse},
    routes::AppState,
};

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    tracing::info!(
        request_id = %request_id,
        title = %request.title,
        "Processing recommendation request"
    );

    let recommendations = state
        .recommender
        .recommend(&request.title)
        .await
        .inspect_err(|e| {
            tracing::info!(request_id = %request_id, error = %e, "Recommendation request rejected");
        })?;

    Ok(Json(RecommendationResponse {
        title: request.title,
        recommendations,
    }))
}
