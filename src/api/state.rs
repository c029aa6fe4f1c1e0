//! Shared state for HTTP handlers

use std::sync::Arc;

use chrono::Utc;

use crate::query::battles_within;
use crate::store::HistoryStore;
use crate::types::{BattleRecord, GuildRoster};

pub struct AppState {
    pub store: Arc<HistoryStore>,
    pub roster: GuildRoster,
}

impl AppState {
    pub fn new(store: Arc<HistoryStore>, roster: GuildRoster) -> Self {
        Self { store, roster }
    }

    /// History limited to the last `days` days, or all of it
    pub fn records(&self, days: Option<i64>) -> Vec<BattleRecord> {
        let history = self.store.history();
        match days {
            Some(days) => battles_within(&history, days, Utc::now()),
            None => history,
        }
    }
}
