//! Battle endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiResponse, WindowParams};
use crate::api::state::AppState;
use crate::query::{battle_breakdown, BattleBreakdown, DEFAULT_WINDOW_DAYS};
use crate::types::BattleRecord;

#[derive(Debug, Default, Deserialize)]
pub struct BattleListParams {
    pub days: Option<i64>,
    pub min_members: Option<u64>,
}

/// GET /api/battles - Battles in the window, newest first
pub async fn list_battles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BattleListParams>,
) -> Result<Json<ApiResponse<Vec<BattleRecord>>>, ApiError> {
    let days = WindowParams { days: params.days }.days_or(DEFAULT_WINDOW_DAYS)?;
    let battles = match params.min_members {
        Some(min) => state.store.battles_with_min_members(&state.roster, min, days),
        None => state.store.battles_by_timeframe(days),
    };
    Ok(Json(ApiResponse::list(battles)))
}

#[derive(Debug, Serialize)]
pub struct BattleDetail {
    pub battle: BattleRecord,
    pub breakdown: BattleBreakdown,
}

/// GET /api/battles/:id - One battle with its side breakdown
pub async fn get_battle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<BattleDetail>>, ApiError> {
    let battle = state
        .store
        .battle_by_id(&id)
        .ok_or_else(|| ApiError::not_found(format!("battle '{}' not found", id)))?;
    let breakdown = battle_breakdown(&battle, &state.roster);

    Ok(Json(ApiResponse::new(BattleDetail { battle, breakdown })))
}
