//! Analysis submission and polling
//!
//! POST /api/v1/analysis, GET /api/v1/analysis/:request_id

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::{
    error::{AnalysisError, ApiResult},
    models::{AnalysisRequest, StatusView, SubmitReceipt},
    AppState,
};

/// POST /api/v1/analysis
///
/// Returns as soon as the request is queued; poll the status endpoint for the result.
pub async fn submit_analysis(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> ApiResult<Json<SubmitReceipt>> {
    let Json(request) = payload?;
    let receipt = state.lifecycle.submit(request).await?;
    Ok(Json(receipt))
}

/// GET /api/v1/analysis/:request_id
pub async fn get_analysis(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> ApiResult<Json<StatusView>> {
    let request_id = Uuid::parse_str(request_id.trim())
        .map_err(|_| AnalysisError::BadRequest(format!("Malformed request id: {}", request_id)))?;

    let view = state.lifecycle.get_status(request_id).await?;
    tracing::debug!(request_id = %request_id, status = ?view.status(), "Status polled");
    Ok(Json(view))
}

pub fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/analysis", post(submit_analysis))
        .route("/api/v1/analysis/:request_id", get(get_analysis))
}
