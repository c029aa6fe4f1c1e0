//! Ingestion pipeline
//!
//! Raw upstream payloads come from a [`BattleSource`], go through the
//! normalizer and are merged into the [`HistoryStore`]. Retrieving the
//! payloads is the source's business; the store only ever sees the result.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::normalizer::{normalize_batch, SkippedBattle};
use crate::store::{HistoryStore, MergeOutcome};
use crate::types::GuildRoster;

/// Why a source could not supply payloads
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    InvalidFormat(String),
}

/// Supplier of raw upstream battle payloads
pub trait BattleSource: Send + Sync {
    /// Payloads for battles of `roster`'s guild from the last `days` days
    ///
    /// An empty result is normal; an error means nothing could be fetched.
    fn fetch(&self, roster: &GuildRoster, days: i64) -> Result<Vec<Value>, SourceError>;
}

/// Payloads saved to a local JSON file
///
/// The file holds either an array of payloads or an object with a
/// `battles` array.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BattleSource for FileSource {
    fn fetch(&self, _roster: &GuildRoster, _days: i64) -> Result<Vec<Value>, SourceError> {
        let content = fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let value: Value = serde_json::from_str(&content).map_err(|source| SourceError::Json {
            path: self.path.clone(),
            source,
        })?;

        match value {
            Value::Array(items) => Ok(items),
            Value::Object(mut map) => match map.remove("battles") {
                Some(Value::Array(items)) => Ok(items),
                _ => Err(SourceError::InvalidFormat(format!(
                    "{}: expected an array or a 'battles' array",
                    self.path.display()
                ))),
            },
            _ => Err(SourceError::InvalidFormat(format!(
                "{}: expected an array or a 'battles' array",
                self.path.display()
            ))),
        }
    }
}

/// What one ingestion run did
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub received: usize,
    pub normalized: usize,
    /// Payloads the home guild did not take part in
    pub filtered: usize,
    pub skipped: Vec<SkippedBattle>,
    pub merge: MergeOutcome,
    /// Set when the source failed and only retention was applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_error: Option<String>,
}

/// Normalize `payloads` for `roster` and merge the result into `store`
pub fn ingest(store: &HistoryStore, payloads: &[Value], roster: &GuildRoster) -> IngestOutcome {
    let report = normalize_batch(payloads, roster);
    let received = report.received();
    let filtered = report.filtered;
    let normalized = report.records.len();
    let skipped = report.skipped;

    let merge = store.merge(report.records);

    IngestOutcome {
        received,
        normalized,
        filtered,
        skipped,
        merge,
        fetch_error: None,
    }
}

/// Fetch from `source` and ingest whatever it returned
///
/// A failing source is logged and treated as an empty batch, so the store
/// still applies retention.
pub fn refresh(
    store: &HistoryStore,
    source: &dyn BattleSource,
    roster: &GuildRoster,
    days: i64,
) -> IngestOutcome {
    match source.fetch(roster, days) {
        Ok(payloads) => {
            log::info!("SOURCE_FETCHED payloads={} days={}", payloads.len(), days);
            ingest(store, &payloads, roster)
        }
        Err(e) => {
            log::warn!("SOURCE_FETCH_FAILED error={}", e);
            let mut outcome = ingest(store, &[], roster);
            outcome.fetch_error = Some(e.to_string());
            outcome
        }
    }
}
