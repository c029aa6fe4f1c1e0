//! Time-window and lookup queries

use chrono::{DateTime, Utc};

use crate::types::{BattleRecord, GuildRoster};
use crate::utils::{is_at_or_after, window_start};

use super::home_guild;

/// Records with `time >= now - days`, in their existing order
pub fn battles_within(records: &[BattleRecord], days: i64, now: DateTime<Utc>) -> Vec<BattleRecord> {
    let cutoff = window_start(now, days);
    records
        .iter()
        .filter(|r| is_at_or_after(&r.time, cutoff))
        .cloned()
        .collect()
}

pub fn find_battle<'a>(records: &'a [BattleRecord], battle_id: &str) -> Option<&'a BattleRecord> {
    records.iter().find(|r| r.battle_id == battle_id)
}

/// Battles in the window where the home guild fielded at least `min_members`
pub fn battles_with_min_members(
    records: &[BattleRecord],
    roster: &GuildRoster,
    min_members: u64,
    days: i64,
    now: DateTime<Utc>,
) -> Vec<BattleRecord> {
    battles_within(records, days, now)
        .into_iter()
        .filter(|record| {
            home_guild(record, roster).is_some_and(|(_, stats)| stats.headcount() >= min_members)
        })
        .collect()
}
