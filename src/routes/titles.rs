use axum::{extract::State, Json};

use crate::routes::AppState;

/// Handler listing every selectable title in catalog order
pub async fn list(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.recommender.list_titles())
}
