//! Record Normalizer
//!
//! Turns raw upstream battle payloads into canonical [`BattleRecord`]s.
//!
//! ```text
//! raw payload ──► parse ──► home guild players? ──no──► (filtered)
//!                               │ yes
//!                               ▼
//!                 group every player by guild name ──► BattleRecord
//! ```
//!
//! A payload that cannot be parsed only costs that one battle: the batch
//! entry points collect the failure into the report and carry on.

mod raw;

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::types::{
    add_counter, BattleDetails, BattleRecord, CounterOverflow, GuildBattleStats, GuildRoster,
};
use crate::utils::parse_battle_time;

use raw::{RawBattle, RawPlayer};

/// Batches at least this large are normalized on the rayon pool
const PARALLEL_NORMALIZE_THRESHOLD: usize = 64;

/// Why a single raw payload could not be normalized
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("malformed battle payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid startTime '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("battle counters out of range: {0}")]
    CounterOverflow(#[from] CounterOverflow),
}

/// A raw payload that was skipped during batch normalization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedBattle {
    /// Upstream id, when the payload had a readable one
    pub battle_id: Option<String>,
    pub reason: String,
}

/// Outcome of normalizing a batch of raw payloads
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizeReport {
    pub records: Vec<BattleRecord>,
    /// Battles the home guild did not take part in
    pub filtered: usize,
    pub skipped: Vec<SkippedBattle>,
}

impl NormalizeReport {
    pub fn received(&self) -> usize {
        self.records.len() + self.filtered + self.skipped.len()
    }
}

/// Normalize one raw payload
///
/// Returns `Ok(None)` when no player in the payload belongs to the home
/// guild; such a battle is not tracked.
pub fn normalize_battle(
    payload: &Value,
    roster: &GuildRoster,
) -> Result<Option<BattleRecord>, NormalizeError> {
    let raw = RawBattle::deserialize(payload)?;
    let time = parse_battle_time(&raw.start_time).map_err(|source| {
        NormalizeError::InvalidTimestamp {
            value: raw.start_time.clone(),
            source,
        }
    })?;
    let battle_id = raw.id.into_string();
    let players: Vec<RawPlayer> = raw.players.into_vec();

    let home_players: Vec<&RawPlayer> = players
        .iter()
        .filter(|p| p.belongs_to(&roster.guild_id))
        .collect();

    if home_players.is_empty() {
        return Ok(None);
    }

    let player_count = home_players.len() as u64;
    let mut kills = 0;
    let mut deaths = 0;
    let mut fame = 0;
    for player in &home_players {
        let stats = player.to_stats();
        kills = add_counter(kills, stats.kills, "kills")?;
        deaths = add_counter(deaths, stats.deaths, "deaths")?;
        fame = add_counter(fame, stats.fame, "fame")?;
    }

    let mut guilds: BTreeMap<String, GuildBattleStats> = BTreeMap::new();
    for player in &players {
        let entry = guilds.entry(player.guild_label()).or_default();
        entry.record(player.to_stats())?;

        if player.belongs_to(&roster.guild_id) {
            continue;
        }
        if let Some(alliance) = player.alliance() {
            if roster.is_friendly_alliance(alliance) && !entry.is_allied() {
                entry.mark_allied(alliance);
            }
        }
    }

    Ok(Some(BattleRecord {
        battle_id: battle_id.clone(),
        time,
        player_count,
        kills,
        deaths,
        fame,
        details: BattleDetails {
            id: battle_id,
            time,
            guilds,
            total_fame: raw.total_fame,
        },
    }))
}

/// Normalize a batch of raw payloads, skipping the ones that fail
pub fn normalize_batch(payloads: &[Value], roster: &GuildRoster) -> NormalizeReport {
    let results: Vec<Result<Option<BattleRecord>, NormalizeError>> =
        if payloads.len() >= PARALLEL_NORMALIZE_THRESHOLD {
            payloads
                .par_iter()
                .map(|payload| normalize_battle(payload, roster))
                .collect()
        } else {
            payloads
                .iter()
                .map(|payload| normalize_battle(payload, roster))
                .collect()
        };

    let mut report = NormalizeReport::default();
    for (payload, result) in payloads.iter().zip(results) {
        match result {
            Ok(Some(record)) => report.records.push(record),
            Ok(None) => report.filtered += 1,
            Err(e) => {
                let battle_id = payload_id(payload);
                log::error!(
                    "BATTLE_SKIPPED battle_id={} reason={}",
                    battle_id.as_deref().unwrap_or("unknown"),
                    e
                );
                report.skipped.push(SkippedBattle {
                    battle_id,
                    reason: e.to_string(),
                });
            }
        }
    }

    log::info!(
        "BATCH_NORMALIZED received={} records={} filtered={} skipped={}",
        payloads.len(),
        report.records.len(),
        report.filtered,
        report.skipped.len()
    );

    report
}

fn payload_id(payload: &Value) -> Option<String> {
    match payload.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
