//! Aggregate endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use super::{ApiError, ApiResponse, WindowParams};
use crate::api::state::AppState;
use crate::query::{
    enemy_guilds, guild_stats, DailyStats, EnemyGuildStats, GuildStats, HistorySummary,
    DEFAULT_DAILY_DAYS,
};

/// GET /api/stats/daily - Per-day aggregate, oldest day first
pub async fn daily(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WindowParams>,
) -> Result<Json<ApiResponse<Vec<DailyStats>>>, ApiError> {
    let days = params.days_or(DEFAULT_DAILY_DAYS)?;
    Ok(Json(ApiResponse::list(state.store.daily_stats(days))))
}

/// GET /api/stats/summary - Totals over the window or the whole history
pub async fn summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WindowParams>,
) -> Result<Json<ApiResponse<HistorySummary>>, ApiError> {
    let days = params.days()?;
    Ok(Json(ApiResponse::new(state.store.summary(days))))
}

/// GET /api/guild - Home guild record
pub async fn guild(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WindowParams>,
) -> Result<Json<ApiResponse<GuildStats>>, ApiError> {
    let records = state.records(params.days()?);
    Ok(Json(ApiResponse::new(guild_stats(&records, &state.roster))))
}

/// GET /api/enemies - Enemy guild totals, most battles first
pub async fn enemies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WindowParams>,
) -> Result<Json<ApiResponse<Vec<EnemyGuildStats>>>, ApiError> {
    let records = state.records(params.days()?);
    Ok(Json(ApiResponse::list(enemy_guilds(&records, &state.roster))))
}
