//! History Store
//!
//! Owns the persisted battle history:
//! - `HistoryStore`: load, deduplicating merge, retention trim, save
//! - `BackupRotation`: timestamped copies of the history, pruned to a bound
//! - `StoreStats`: disk usage and coverage
//!
//! # Write path
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ new      │──►│ load     │──►│ dedupe by  │──►│ sort newest  │──►│ trim older   │
//! │ records  │   │ history  │   │ battle_id  │   │ first        │   │ than 90 days │
//! └──────────┘   └──────────┘   └────────────┘   └──────────────┘   └──────┬───────┘
//!                                                                          │
//!              ┌───────────────┐   ┌──────────────────────┐   ┌───────────▼──┐
//!              │ prune backups │◄──│ write .tmp + rename  │◄──│ backup old   │
//!              │ keep newest 10│   │ battle_history.json  │   │ history file │
//!              └───────────────┘   └──────────────────────┘   └──────────────┘
//! ```

mod backup;
mod config;
mod error;
mod history;
mod stats;

pub use backup::{BackupInfo, BackupRotation};
pub use config::{StoreConfig, HISTORY_FILE_NAME, MAX_BACKUPS, MAX_HISTORY_DAYS};
pub use error::{StoreError, StoreResult};
pub use history::{
    apply_retention, merge_records, sort_newest_first, validate_batch, HistoryStore,
    LoadOutcome, MergeOutcome, PersistStatus, SaveReport, REQUIRED_FIELDS,
};
pub use stats::StoreStats;
