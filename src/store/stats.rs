//! Store statistics
//!
//! Disk usage and coverage of the persisted history and its backups.

use std::fs;

use serde::Serialize;

use crate::types::BattleTime;

use super::error::StoreResult;
use super::history::HistoryStore;

/// Snapshot of the store's size and coverage
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreStats {
    pub battles: usize,
    /// Size of the history file in bytes
    pub history_size: u64,
    pub backup_count: usize,
    /// Total size of all backups in bytes
    pub backup_size: u64,
    pub oldest_battle: Option<BattleTime>,
    pub newest_battle: Option<BattleTime>,
}

impl StoreStats {
    pub fn total_size(&self) -> u64 {
        self.history_size + self.backup_size
    }

    /// Format size in human-readable format
    pub fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;

        if bytes >= MB {
            format!("{:.2} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.2} KB", bytes as f64 / KB as f64)
        } else {
            format!("{} B", bytes)
        }
    }
}

impl HistoryStore {
    /// Collect statistics about the history file and its backups
    pub fn stats(&self) -> StoreResult<StoreStats> {
        let history = self.history();
        let backups = self.backups()?;

        let history_size = match fs::metadata(&self.config().history_path) {
            Ok(metadata) => metadata.len(),
            Err(_) => 0,
        };

        Ok(StoreStats {
            battles: history.len(),
            history_size,
            backup_count: backups.len(),
            backup_size: backups.iter().map(|b| b.size).sum(),
            oldest_battle: history.iter().map(|r| r.time).min(),
            newest_battle: history.iter().map(|r| r.time).max(),
        })
    }
}
