//! POST /api/v1/compare

use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};

use crate::{
    error::ApiResult,
    models::{CompareRequest, ComparisonReport},
    services::compare_addresses,
    AppState,
};

pub async fn compare(
    State(state): State<AppState>,
    payload: Result<Json<CompareRequest>, JsonRejection>,
) -> ApiResult<Json<ComparisonReport>> {
    let Json(request) = payload?;
    let report = compare_addresses(&state.orchestrator, &request.addresses).await?;
    Ok(Json(report))
}

pub fn compare_routes() -> Router<AppState> {
    Router::new().route("/api/v1/compare", post(compare))
}
