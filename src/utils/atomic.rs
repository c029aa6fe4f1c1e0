//! Atomic file writes
//!
//! The history file is rewritten wholesale on every save. Writers go
//! through a sibling `.tmp` file which is synced and then renamed over the
//! destination, so a concurrent reader sees either the old file or the new
//! one and never a truncated one.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for atomic operations
pub type AtomicResult<T> = Result<T, AtomicError>;

/// Errors that can occur during atomic operations
#[derive(Debug, Error)]
pub enum AtomicError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AtomicError {
    fn io(path: &Path, source: io::Error) -> Self {
        AtomicError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Temp path used while `path` is being rewritten
pub fn temp_path_for(path: &Path) -> PathBuf {
    path.with_extension("tmp")
}

/// Atomically replace `path` with `content`
///
/// 1. Write to `<path>.tmp`
/// 2. `sync_all()` the temp file
/// 3. Rename it over `path`
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> AtomicResult<()> {
    let path = path.as_ref();
    let temp_path = temp_path_for(path);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| AtomicError::io(parent, e))?;
    }

    let result = (|| {
        let mut file = File::create(&temp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(AtomicError::io(&temp_path, e));
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        AtomicError::io(path, e)
    })
}

/// Remove the temp file left behind by an interrupted write of `path`
///
/// Returns `true` if a stale temp file was found and removed.
pub fn remove_stale_temp<P: AsRef<Path>>(path: P) -> AtomicResult<bool> {
    let temp_path = temp_path_for(path.as_ref());

    match fs::remove_file(&temp_path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(AtomicError::io(&temp_path, e)),
    }
}
