//! History Store - durable, deduplicated battle history
//!
//! The store owns the single persisted collection of [`BattleRecord`]s.
//! Every merge runs load, dedupe, sort, trim and save under one write lock,
//! so callers never see a half-applied merge.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::BattleRecord;
use crate::utils::{atomic_write, is_at_or_after, remove_stale_temp, window_start};

use super::backup::{BackupInfo, BackupRotation};
use super::config::StoreConfig;
use super::error::{StoreError, StoreResult};

/// Fields every incoming record must carry
pub const REQUIRED_FIELDS: [&str; 7] = [
    "battle_id", "time", "players", "kills", "deaths", "fame", "details",
];

/// What a load found on disk
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// No history file yet
    Missing,
    Loaded(Vec<BattleRecord>),
    /// File present but unusable; treated as an empty history
    Corrupt { reason: String },
}

impl LoadOutcome {
    pub fn records(&self) -> &[BattleRecord] {
        match self {
            LoadOutcome::Loaded(records) => records,
            _ => &[],
        }
    }

    pub fn into_records(self) -> Vec<BattleRecord> {
        match self {
            LoadOutcome::Loaded(records) => records,
            _ => Vec::new(),
        }
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, LoadOutcome::Corrupt { .. })
    }
}

/// Whether a merge reached the disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum PersistStatus {
    Saved,
    /// Nothing changed, so nothing was written
    Unchanged,
    Failed(String),
}

/// Result of [`HistoryStore::merge`]
#[derive(Debug, Clone, Serialize)]
pub struct MergeOutcome {
    /// The new authoritative history, newest first
    #[serde(skip)]
    pub history: Vec<BattleRecord>,
    pub received: usize,
    pub added: usize,
    pub duplicates: usize,
    pub expired: usize,
    /// The previous file was unusable and has been replaced
    pub replaced_invalid: bool,
    pub persisted: PersistStatus,
}

impl MergeOutcome {
    pub fn is_persisted(&self) -> bool {
        !matches!(self.persisted, PersistStatus::Failed(_))
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

/// What a save did besides writing the history
#[derive(Debug, Clone, Default)]
pub struct SaveReport {
    pub backup: Option<PathBuf>,
    pub pruned_backups: usize,
}

/// Handle on the persisted battle history
pub struct HistoryStore {
    config: StoreConfig,
    backups: BackupRotation,
    /// Lazily loaded copy of the persisted history
    cache: RwLock<Option<Vec<BattleRecord>>>,
    /// Serialises load-merge-save sequences
    write_lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(config: StoreConfig) -> Self {
        let backups = BackupRotation::new(&config);
        Self {
            config,
            backups,
            cache: RwLock::new(None),
            write_lock: Mutex::new(()),
        }
    }

    /// Store configured from `BATTLE_*` environment variables
    pub fn from_env() -> Self {
        Self::new(StoreConfig::from_env())
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Read the history from disk and refresh the in-memory copy
    ///
    /// Never fails: a missing file is an empty history and an unreadable
    /// one is logged and treated as empty. Waits for a running merge.
    pub fn load(&self) -> LoadOutcome {
        let _guard = self.write_lock.lock();
        self.load_locked()
    }

    /// [`load`](Self::load) for callers already holding `write_lock`
    fn load_locked(&self) -> LoadOutcome {
        let outcome = match self.read_history() {
            Ok(Some(records)) => {
                log::info!(
                    "HISTORY_LOADED battles={} path={}",
                    records.len(),
                    self.config.history_path.display()
                );
                LoadOutcome::Loaded(records)
            }
            Ok(None) => {
                log::info!(
                    "HISTORY_MISSING path={} starting empty",
                    self.config.history_path.display()
                );
                LoadOutcome::Missing
            }
            Err(e) => {
                log::error!(
                    "HISTORY_CORRUPT path={} error={} starting empty",
                    self.config.history_path.display(),
                    e
                );
                LoadOutcome::Corrupt {
                    reason: e.to_string(),
                }
            }
        };

        *self.cache.write() = Some(outcome.records().to_vec());
        outcome
    }

    /// Current history, newest first, loading it on first access
    pub fn history(&self) -> Vec<BattleRecord> {
        if let Some(records) = self.cache.read().as_ref() {
            return records.clone();
        }

        let _guard = self.write_lock.lock();
        // A merge may have filled the cache while we waited
        if let Some(records) = self.cache.read().as_ref() {
            return records.clone();
        }
        self.load_locked().into_records()
    }

    /// Drop the in-memory copy and read the file again
    pub fn reload(&self) -> Vec<BattleRecord> {
        self.load().into_records()
    }

    /// Merge a batch into the persisted history
    pub fn merge(&self, batch: Vec<BattleRecord>) -> MergeOutcome {
        self.merge_at(batch, Utc::now())
    }

    /// [`merge`](Self::merge) with an explicit clock for the retention cutoff
    pub fn merge_at(&self, batch: Vec<BattleRecord>, now: DateTime<Utc>) -> MergeOutcome {
        let _guard = self.write_lock.lock();

        self.clear_stale_temp();
        let loaded = self.load_locked();
        let replaced_invalid = loaded.is_corrupt();
        if replaced_invalid {
            log::warn!("HISTORY_REPLACED reason=invalid existing history");
        }

        let received = batch.len();
        let (mut merged, added, duplicates) = merge_records(loaded.into_records(), batch);
        sort_newest_first(&mut merged);

        let cutoff = window_start(now, self.config.max_history_days);
        let expired = apply_retention(&mut merged, cutoff);

        if duplicates > 0 {
            log::info!("DUPLICATES_IGNORED count={}", duplicates);
        }

        let persisted = if added == 0 && expired == 0 && !replaced_invalid {
            log::info!("MERGE_UNCHANGED battles={}", merged.len());
            PersistStatus::Unchanged
        } else {
            match self.write_history(&merged) {
                Ok(_) => PersistStatus::Saved,
                Err(e) => {
                    log::error!("HISTORY_SAVE_FAILED error={}", e);
                    PersistStatus::Failed(e.to_string())
                }
            }
        };

        if let PersistStatus::Failed(_) = persisted {
            // The disk still holds the previous history
            *self.cache.write() = None;
        } else {
            *self.cache.write() = Some(merged.clone());
        }

        log::info!(
            "HISTORY_MERGED received={} added={} duplicates={} expired={} battles={}",
            received,
            added,
            duplicates,
            expired,
            merged.len()
        );

        MergeOutcome {
            history: merged,
            received,
            added,
            duplicates,
            expired,
            replaced_invalid,
            persisted,
        }
    }

    /// Validate and merge records supplied as JSON objects
    ///
    /// If any object lacks a required field the whole batch is rejected and
    /// the history is left untouched.
    pub fn merge_json(&self, batch: &[Value]) -> StoreResult<MergeOutcome> {
        let records = match validate_batch(batch) {
            Ok(records) => records,
            Err(e) => {
                log::error!("MERGE_REJECTED error={}", e);
                return Err(e);
            }
        };
        Ok(self.merge(records))
    }

    /// Back up the current file, write `records`, then prune old backups
    ///
    /// A failed backup is logged and does not stop the write.
    pub fn save(&self, records: &[BattleRecord]) -> StoreResult<SaveReport> {
        let _guard = self.write_lock.lock();
        self.clear_stale_temp();
        self.write_history(records)
    }

    /// [`save`](Self::save) for callers already holding `write_lock`
    fn write_history(&self, records: &[BattleRecord]) -> StoreResult<SaveReport> {
        let history_path = &self.config.history_path;
        let mut report = SaveReport::default();

        if history_path.exists() {
            match self.backups.create_backup(history_path) {
                Ok(path) => report.backup = Some(path),
                Err(e) => log::warn!("BACKUP_FAILED error={}", e),
            }
        }

        let content = serde_json::to_string_pretty(records)?;
        atomic_write(history_path, &content)?;
        log::info!(
            "HISTORY_SAVED battles={} path={}",
            records.len(),
            history_path.display()
        );

        report.pruned_backups = match self.backups.cleanup_old_backups(self.config.max_backups) {
            Ok(count) => count,
            Err(e) => {
                log::warn!("BACKUP_CLEANUP_FAILED error={}", e);
                0
            }
        };

        *self.cache.write() = Some(records.to_vec());
        Ok(report)
    }

    /// Backups on disk, newest first
    pub fn backups(&self) -> StoreResult<Vec<BackupInfo>> {
        self.backups.list_backups()
    }

    /// Remove a temp file left by an interrupted save; needs `write_lock`
    fn clear_stale_temp(&self) {
        let path = &self.config.history_path;
        match remove_stale_temp(path) {
            Ok(true) => log::warn!("STALE_TEMP_REMOVED path={}", path.display()),
            Ok(false) => {}
            Err(e) => log::warn!("STALE_TEMP_CLEANUP_FAILED error={}", e),
        }
    }

    fn read_history(&self) -> StoreResult<Option<Vec<BattleRecord>>> {
        let path = &self.config.history_path;

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;
        let items = value
            .as_array()
            .ok_or_else(|| StoreError::InvalidFormat("expected a JSON array".to_string()))?;

        if let Some(index) = items.iter().position(|item| item.get("battle_id").is_none()) {
            return Err(StoreError::InvalidFormat(format!(
                "record {} has no battle_id",
                index
            )));
        }

        let mut records: Vec<BattleRecord> = serde_json::from_value(value)?;
        sort_newest_first(&mut records);
        Ok(Some(records))
    }
}

/// Union `incoming` into `existing`, first write wins per `battle_id`
///
/// Returns the merged list with the number of records added and dropped as
/// duplicates. Duplicates inside `incoming` itself are dropped too.
pub fn merge_records(
    existing: Vec<BattleRecord>,
    incoming: Vec<BattleRecord>,
) -> (Vec<BattleRecord>, usize, usize) {
    let mut seen: HashSet<String> = existing.iter().map(|r| r.battle_id.clone()).collect();
    let mut merged = existing;
    let mut added = 0;
    let mut duplicates = 0;

    for record in incoming {
        if seen.insert(record.battle_id.clone()) {
            merged.push(record);
            added += 1;
        } else {
            duplicates += 1;
        }
    }

    (merged, added, duplicates)
}

/// Canonical order: most recent battle first
pub fn sort_newest_first(records: &mut [BattleRecord]) {
    records.sort_by(|a, b| b.time.cmp(&a.time));
}

/// Drop records older than `cutoff`, returning how many were removed
pub fn apply_retention(records: &mut Vec<BattleRecord>, cutoff: DateTime<Utc>) -> usize {
    let before = records.len();
    records.retain(|r| is_at_or_after(&r.time, cutoff));
    before - records.len()
}

/// Check required fields and decode a batch of JSON records
pub fn validate_batch(batch: &[Value]) -> StoreResult<Vec<BattleRecord>> {
    for (index, item) in batch.iter().enumerate() {
        if let Some(field) = REQUIRED_FIELDS.iter().find(|f| item.get(**f).is_none()) {
            return Err(StoreError::MissingField { index, field });
        }
    }

    batch
        .iter()
        .map(|item| BattleRecord::deserialize(item).map_err(StoreError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BattleDetails;
    use chrono::{Duration, TimeZone};
    use serde_json::json;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn record(id: &str, days_ago: i64, kills: u64, deaths: u64) -> BattleRecord {
        let time = (now() - Duration::days(days_ago)).fixed_offset();
        BattleRecord {
            battle_id: id.to_string(),
            time,
            player_count: 1,
            kills,
            deaths,
            fame: kills * 1000,
            details: BattleDetails {
                id: id.to_string(),
                time,
                guilds: Default::default(),
                total_fame: None,
            },
        }
    }

    fn store(temp_dir: &TempDir) -> HistoryStore {
        HistoryStore::new(StoreConfig::new(temp_dir.path()))
    }

    fn ids(records: &[BattleRecord]) -> Vec<&str> {
        records.iter().map(|r| r.battle_id.as_str()).collect()
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let outcome = store(&temp_dir).load();

        assert!(matches!(outcome, LoadOutcome::Missing));
        assert!(outcome.records().is_empty());
    }

    #[test]
    fn test_load_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        fs::write(&store.config().history_path, "{not json").unwrap();

        assert!(store.load().is_corrupt());
        assert!(store.history().is_empty());
    }

    #[test]
    fn test_load_rejects_records_without_identity() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        fs::write(&store.config().history_path, r#"[{"time": "2024-05-01T00:00:00Z"}]"#).unwrap();

        match store.load() {
            LoadOutcome::Corrupt { reason } => assert!(reason.contains("battle_id")),
            other => panic!("expected corrupt, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_into_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        let outcome = store.merge_at(
            vec![record("b", 2, 1, 1), record("a", 1, 1, 1), record("c", 3, 1, 1)],
            now(),
        );

        assert_eq!(outcome.added, 3);
        assert_eq!(outcome.persisted, PersistStatus::Saved);
        assert_eq!(ids(&outcome.history), vec!["a", "b", "c"]);
        assert_eq!(ids(&store.reload()), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_first_write_wins() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        store.merge_at(vec![record("a", 1, 10, 2)], now());
        let outcome = store.merge_at(vec![record("a", 1, 99, 99), record("b", 2, 1, 1)], now());

        assert_eq!(outcome.added, 1);
        assert_eq!(outcome.duplicates, 1);
        let a = outcome.history.iter().find(|r| r.battle_id == "a").unwrap();
        assert_eq!((a.kills, a.deaths), (10, 2));
    }

    #[test]
    fn test_duplicates_within_batch() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        let outcome = store.merge_at(vec![record("a", 1, 5, 0), record("a", 1, 7, 0)], now());

        assert_eq!(outcome.added, 1);
        assert_eq!(outcome.duplicates, 1);
        assert_eq!(outcome.history[0].kills, 5);
    }

    #[test]
    fn test_all_duplicates_skip_save() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        store.merge_at(vec![record("a", 1, 1, 1)], now());
        let outcome = store.merge_at(vec![record("a", 1, 1, 1)], now());

        assert_eq!(outcome.persisted, PersistStatus::Unchanged);
        assert!(store.backups().unwrap().is_empty());
    }

    #[test]
    fn test_retention_on_empty_batch() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        let old = vec![
            record("d0", 0, 1, 1),
            record("d30", 30, 1, 1),
            record("d89", 89, 1, 1),
            record("d95", 95, 1, 1),
            record("d100", 100, 1, 1),
        ];
        store.save(&old).unwrap();

        let outcome = store.merge_at(Vec::new(), now());

        assert_eq!(outcome.expired, 2);
        assert_eq!(outcome.persisted, PersistStatus::Saved);
        assert_eq!(ids(&outcome.history), vec!["d0", "d30", "d89"]);
        assert_eq!(ids(&store.reload()), vec!["d0", "d30", "d89"]);
    }

    #[test]
    fn test_corrupt_history_is_replaced() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        fs::write(&store.config().history_path, r#"[{"id": 1}]"#).unwrap();

        let outcome = store.merge_at(vec![record("a", 1, 1, 1)], now());

        assert!(outcome.replaced_invalid);
        assert_eq!(ids(&store.reload()), vec!["a"]);
        // The unusable file was still backed up before being replaced
        assert_eq!(store.backups().unwrap().len(), 1);
    }

    #[test]
    fn test_save_failure_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        // A directory where the history file should be makes the rename fail
        let history_path = temp_dir.path().join("history.json");
        fs::create_dir_all(history_path.join("occupied")).unwrap();
        let store = HistoryStore::new(
            StoreConfig::new(temp_dir.path()).with_history_path(&history_path),
        );

        let outcome = store.merge_at(vec![record("a", 1, 1, 1)], now());

        assert!(!outcome.is_persisted());
        assert_eq!(ids(&outcome.history), vec!["a"]);
    }

    #[test]
    fn test_merge_json_rejects_missing_field() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        store.merge_at(vec![record("a", 1, 1, 1)], now());

        let mut incomplete = serde_json::to_value(record("b", 1, 1, 1)).unwrap();
        incomplete.as_object_mut().unwrap().remove("fame");

        let err = store.merge_json(&[incomplete]).unwrap_err();
        assert!(matches!(err, StoreError::MissingField { index: 0, field: "fame" }));
        assert_eq!(ids(&store.history()), vec!["a"]);
    }

    #[test]
    fn test_validate_batch_decodes_records() {
        let value = json!({
            "battle_id": 5,
            "time": "2024-05-01T20:15:00Z",
            "players": 3, "kills": 2, "deaths": 1, "fame": 10,
            "details": {"id": 5, "time": "2024-05-01T20:15:00Z", "guilds": {}}
        });

        let records = validate_batch(&[value]).unwrap();
        assert_eq!(records[0].battle_id, "5");
        assert_eq!(records[0].player_count, 3);
    }

    #[test]
    fn test_backups_are_bounded() {
        let temp_dir = TempDir::new().unwrap();
        let store = HistoryStore::new(StoreConfig::new(temp_dir.path()).with_max_backups(3));

        for i in 0..6 {
            store.merge_at(vec![record(&format!("b{}", i), 1, 1, 1)], now());
        }

        assert!(store.backups().unwrap().len() <= 3);
        assert_eq!(store.history().len(), 6);
    }

    #[test]
    fn test_stale_temp_removed_before_write() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        let temp = store.config().history_path.with_extension("tmp");
        fs::write(&temp, "[").unwrap();

        // Readers leave it alone
        store.load();
        store.reload();
        assert!(temp.exists());

        let outcome = store.merge_at(vec![record("a", 1, 1, 1)], now());

        assert_eq!(outcome.persisted, PersistStatus::Saved);
        assert!(!temp.exists());
        assert_eq!(store.reload().len(), 1);
    }
}
