//! Player endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::{ApiError, ApiResponse, WindowParams};
use crate::api::state::AppState;
use crate::query::{attendance as player_attendance, top_players, AttendanceEntry, PlayerMetric, PlayerTotals};

/// Query parameters for the player ranking
#[derive(Debug, Deserialize)]
pub struct TopPlayersParams {
    pub metric: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    pub days: Option<i64>,
}

fn default_limit() -> usize {
    3
}

/// GET /api/players/top - Home guild players ranked by a metric
pub async fn top(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TopPlayersParams>,
) -> Result<Json<ApiResponse<Vec<PlayerTotals>>>, ApiError> {
    let metric = match params.metric.as_deref() {
        Some(name) => name
            .parse::<PlayerMetric>()
            .map_err(|e| ApiError::bad_request(e.to_string()))?,
        None => PlayerMetric::default(),
    };
    let days = WindowParams { days: params.days }.days()?;
    let records = state.records(days);

    Ok(Json(ApiResponse::list(top_players(
        &records,
        &state.roster,
        metric,
        params.limit.min(100),
    ))))
}

/// GET /api/attendance - Attendance per home guild player
pub async fn attendance(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WindowParams>,
) -> Result<Json<ApiResponse<Vec<AttendanceEntry>>>, ApiError> {
    let records = state.records(params.days()?);
    Ok(Json(ApiResponse::list(player_attendance(&records, &state.roster))))
}
