//! Scan endpoint

use axum::{extract::State, routing::post, Json, Router};
use footprint_common::QueryInputs;
use tracing::warn;

use crate::error::{ApiError, ApiResult};
use crate::services::ScanReport;
use crate::AppState;

/// POST /scan
///
/// 400 when the query has no identifying field, 500 on pipeline failure.
pub async fn run_scan(
    State(state): State<AppState>,
    Json(query): Json<QueryInputs>,
) -> ApiResult<Json<ScanReport>> {
    let report = state.pipeline.scan(&query).await.map_err(|e| {
        warn!("Scan rejected: {}", e);
        ApiError::from(e)
    })?;
    Ok(Json(report))
}

/// Build scan routes
pub fn scan_routes() -> Router<AppState> {
    Router::new().route("/scan", post(run_scan))
}
