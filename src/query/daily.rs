//! Per-day aggregate

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{kd_ratio, BattleRecord};

use super::window::battles_within;
use super::{win_rate, WinPolicy};

/// Aggregate of all battles that started on one calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub battles: usize,
    pub kills: u64,
    pub deaths: u64,
    pub fame: u64,
    pub kd_ratio: f64,
    pub wins: usize,
    /// Percentage of the day's battles won
    pub win_rate: f64,
}

/// Group records by the date part of their timestamp, oldest day first
///
/// The date is taken in the offset each record was stored with. A battle
/// is a win under [`WinPolicy::DailyAdvantage`].
pub fn aggregate_daily(records: &[BattleRecord]) -> Vec<DailyStats> {
    #[derive(Default)]
    struct Day {
        battles: usize,
        kills: u64,
        deaths: u64,
        fame: u64,
        wins: usize,
    }

    let mut days: BTreeMap<NaiveDate, Day> = BTreeMap::new();
    for record in records {
        let day = days.entry(record.time.date_naive()).or_default();
        day.battles += 1;
        day.kills = day.kills.saturating_add(record.kills);
        day.deaths = day.deaths.saturating_add(record.deaths);
        day.fame = day.fame.saturating_add(record.fame);
        if WinPolicy::DailyAdvantage.is_win(record.kills, record.deaths) {
            day.wins += 1;
        }
    }

    days.into_iter()
        .map(|(date, day)| DailyStats {
            date,
            battles: day.battles,
            kills: day.kills,
            deaths: day.deaths,
            fame: day.fame,
            kd_ratio: kd_ratio(day.kills, day.deaths),
            wins: day.wins,
            win_rate: win_rate(day.wins, day.battles),
        })
        .collect()
}

/// Daily aggregate over the last `days` days
pub fn daily_stats(records: &[BattleRecord], days: i64, now: DateTime<Utc>) -> Vec<DailyStats> {
    aggregate_daily(&battles_within(records, days, now))
}
