//! Backup rotation
//!
//! Before the history file is replaced, the current file is copied into the
//! backup directory as `<stem>_<YYYYmmdd_HHMMSS_micros>.json`. After the
//! write the directory is pruned to the configured number of copies, oldest
//! first by modification time.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::Utc;
use serde::Serialize;

use crate::utils::backup_stamp;

use super::config::StoreConfig;
use super::error::StoreResult;

/// Backup manager for the history file
#[derive(Debug, Clone)]
pub struct BackupRotation {
    backup_dir: PathBuf,
    prefix: String,
}

impl BackupRotation {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            backup_dir: config.backup_dir.clone(),
            prefix: format!("{}_", config.history_stem()),
        }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Copy `source` verbatim into the backup directory
    pub fn create_backup(&self, source: &Path) -> StoreResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir)?;

        let file_name = format!("{}{}.json", self.prefix, backup_stamp(Utc::now()));
        let backup_path = self.backup_dir.join(file_name);
        fs::copy(source, &backup_path)?;

        log::info!("BACKUP_CREATED path={}", backup_path.display());
        Ok(backup_path)
    }

    /// List backups, newest first
    pub fn list_backups(&self) -> StoreResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();
        for entry in fs::read_dir(&self.backup_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !self.is_backup(&path) {
                continue;
            }

            let metadata = entry.metadata()?;
            backups.push(BackupInfo {
                path,
                size: metadata.len(),
                modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            });
        }

        // Names carry the creation stamp, so they break mtime ties
        backups.sort_by(|a, b| {
            b.modified
                .cmp(&a.modified)
                .then_with(|| b.path.file_name().cmp(&a.path.file_name()))
        });

        Ok(backups)
    }

    /// Delete all but the `keep_count` most recent backups
    ///
    /// A backup that cannot be removed is logged and skipped. Returns the
    /// number of backups actually deleted.
    pub fn cleanup_old_backups(&self, keep_count: usize) -> StoreResult<usize> {
        let backups = self.list_backups()?;
        if backups.len() <= keep_count {
            return Ok(0);
        }

        let mut deleted = 0;
        for backup in &backups[keep_count..] {
            match fs::remove_file(&backup.path) {
                Ok(()) => {
                    deleted += 1;
                    log::info!("BACKUP_PRUNED path={}", backup.path.display());
                }
                Err(e) => {
                    log::error!("BACKUP_PRUNE_FAILED path={} error={}", backup.path.display(), e);
                }
            }
        }

        Ok(deleted)
    }

    /// Total size of all backups in bytes
    pub fn total_backup_size(&self) -> StoreResult<u64> {
        Ok(self.list_backups()?.iter().map(|b| b.size).sum())
    }

    fn is_backup(&self, path: &Path) -> bool {
        path.is_file()
            && path.extension().and_then(|e| e.to_str()) == Some("json")
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(&self.prefix))
    }
}

/// A backup file on disk
#[derive(Debug, Clone, Serialize)]
pub struct BackupInfo {
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
    #[serde(skip)]
    pub modified: SystemTime,
}
