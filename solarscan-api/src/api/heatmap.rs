//! GET /api/v1/heatmap

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{
    error::ApiResult,
    models::{FeatureCollection, HeatmapMetric},
    services::build_heatmap,
    AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct HeatmapQuery {
    pub region: Option<String>,
    pub metric: Option<String>,
}

pub async fn heatmap(
    State(state): State<AppState>,
    query: Result<Query<HeatmapQuery>, QueryRejection>,
) -> ApiResult<Json<FeatureCollection>> {
    let Query(query) = query?;
    let region = query.region.unwrap_or_else(|| "gyeonggi".to_string());
    let metric: HeatmapMetric = query
        .metric
        .as_deref()
        .unwrap_or("solar_radiation")
        .parse()?;

    let collection = build_heatmap(
        &region,
        metric,
        state.orchestrator.predictor(),
        state.orchestrator.economics(),
    )?;
    Ok(Json(collection))
}

pub fn heatmap_routes() -> Router<AppState> {
    Router::new().route("/api/v1/heatmap", get(heatmap))
}
