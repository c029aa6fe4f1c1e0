//! History store configuration

use std::env;
use std::path::{Path, PathBuf};

/// Default retention horizon in days
pub const MAX_HISTORY_DAYS: i64 = 90;

/// Default number of backups kept
pub const MAX_BACKUPS: usize = 10;

/// File name of the history inside a data directory
pub const HISTORY_FILE_NAME: &str = "battle_history.json";

/// Configuration for the [`HistoryStore`](super::HistoryStore)
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the persisted history (JSON array)
    pub history_path: PathBuf,
    /// Directory holding timestamped copies of the history
    pub backup_dir: PathBuf,
    /// Records older than this many days are pruned on write
    pub max_history_days: i64,
    /// Backups kept after each save
    pub max_backups: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            history_path: PathBuf::from(HISTORY_FILE_NAME),
            backup_dir: PathBuf::from("backups"),
            max_history_days: MAX_HISTORY_DAYS,
            max_backups: MAX_BACKUPS,
        }
    }
}

impl StoreConfig {
    /// Keep the history and its backups under `data_dir`
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            history_path: data_dir.join(HISTORY_FILE_NAME),
            backup_dir: data_dir.join("backups"),
            ..Default::default()
        }
    }

    pub fn with_history_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.history_path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_backup_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.backup_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Retention horizon; a non-positive value is ignored with a warning
    pub fn with_max_history_days(mut self, days: i64) -> Self {
        if days > 0 {
            self.max_history_days = days;
        } else {
            log::warn!("CONFIG_IGNORED key=max_history_days value={} reason=must be positive", days);
        }
        self
    }

    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    /// Build a config from the environment
    ///
    /// | Variable                  | Effect                                  |
    /// |---------------------------|-----------------------------------------|
    /// | `BATTLE_DATA_DIR`         | base directory (default: current dir)   |
    /// | `BATTLE_HISTORY_FILE`     | history file path                       |
    /// | `BATTLE_BACKUP_DIR`       | backup directory                        |
    /// | `BATTLE_MAX_HISTORY_DAYS` | retention horizon                       |
    /// | `BATTLE_MAX_BACKUPS`      | backups kept                            |
    ///
    /// Relative paths resolve against the current directory.
    pub fn from_env() -> Self {
        let current_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let data_dir = env_path("BATTLE_DATA_DIR", &current_dir).unwrap_or(current_dir.clone());

        let mut config = Self::new(&data_dir);

        if let Some(path) = env_path("BATTLE_HISTORY_FILE", &current_dir) {
            config.history_path = path;
        }
        if let Some(dir) = env_path("BATTLE_BACKUP_DIR", &current_dir) {
            config.backup_dir = dir;
        }
        if let Some(days) = env_number("BATTLE_MAX_HISTORY_DAYS") {
            config = config.with_max_history_days(days);
        }
        if let Some(count) = env_number("BATTLE_MAX_BACKUPS") {
            config.max_backups = count;
        }

        config
    }

    /// Stem used for backup file names, e.g. `battle_history`
    pub fn history_stem(&self) -> String {
        self.history_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("battle_history")
            .to_string()
    }
}

fn env_path(key: &str, base: &Path) -> Option<PathBuf> {
    let value = env::var(key).ok().filter(|v| !v.trim().is_empty())?;
    let path = PathBuf::from(value.trim());
    Some(if path.is_absolute() { path } else { base.join(path) })
}

fn env_number<T: std::str::FromStr>(key: &str) -> Option<T> {
    let value = env::var(key).ok()?;
    match value.trim().parse() {
        Ok(n) => Some(n),
        Err(_) => {
            log::warn!("CONFIG_IGNORED key={} value={:?} reason=not a number", key, value);
            None
        }
    }
}
