//! Handler for link statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns visit statistics for a short link.
///
/// # Endpoint
///
/// `GET /stats/{key}`
///
/// # Response
///
/// ```json
/// {
///   "total_clicks": 3,
///   "browsers": { "Chrome 120.0.0.0": 2, "Firefox 121.0": 1 },
///   "countries": { "DE": 1, "Unknown": 2 },
///   "os": { "Windows 10": 2, "Linux": 1 }
/// }
/// ```
///
/// Inactive and expired links still report their statistics.
///
/// # Errors
///
/// Returns 404 Not Found if the key does not exist.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.stats_service.aggregate(&key).await?;
    Ok(Json(stats.into()))
}
