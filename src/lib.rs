//! Guild Battle History
//!
//! Durable, deduplicated history of a guild's battles with time-windowed
//! statistics on top.
//!
//! # Modules
//!
//! - `types`: Battle records, guild stats, roster and guild roles
//! - `normalizer`: Raw upstream payloads to canonical battle records
//! - `store`: History file with dedupe merge, retention, atomic save, backups
//! - `query`: Time windows, daily aggregate, summary, guild and player views
//! - `ingest`: Source trait plus normalize-then-merge pipeline
//! - `protocol` / `server` / `tools`: JSON-RPC tool server over stdio
//! - `api`: Read-only HTTP API
//! - `utils`: Atomic file writes and time helpers
//!
//! # Example
//!
//! ```no_run
//! use battle_history::{GuildRoster, HistoryStore, StoreConfig};
//! use battle_history::ingest::ingest;
//!
//! let store = HistoryStore::new(StoreConfig::new("data"));
//! let roster = GuildRoster::new("guild-id", "We Profit").with_alliance("PROFIT");
//!
//! let payloads: Vec<serde_json::Value> = Vec::new();
//! let outcome = ingest(&store, &payloads, &roster);
//! println!("added {} battles", outcome.merge.added);
//!
//! for day in store.daily_stats(30) {
//!     println!("{} wins={} kd={:.2}", day.date, day.wins, day.kd_ratio);
//! }
//! ```

pub mod api;
pub mod ingest;
pub mod normalizer;
pub mod protocol;
pub mod query;
pub mod server;
pub mod store;
pub mod tools;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use normalizer::{normalize_batch, normalize_battle, NormalizeError, NormalizeReport};
pub use query::{DailyStats, HistorySummary, WinPolicy};
pub use server::ToolServer;
pub use store::{HistoryStore, LoadOutcome, MergeOutcome, PersistStatus, StoreConfig, StoreError};
pub use types::{
    BattleDetails, BattleRecord, GuildBattleStats, GuildRole, GuildRoster, McpResult,
    PlayerBattleStats,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
