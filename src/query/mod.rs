//! Query Layer
//!
//! Read-only views over battle history. The free functions take a slice of
//! records so they can run over any snapshot; the `HistoryStore` methods at
//! the bottom run them against the store's current history.

mod daily;
mod guilds;
mod players;
mod summary;
mod window;

use chrono::Utc;

use crate::store::HistoryStore;
use crate::types::{BattleRecord, GuildBattleStats, GuildRole, GuildRoster};

pub use daily::{aggregate_daily, daily_stats, DailyStats};
pub use guilds::{
    battle_breakdown, enemy_guilds, guild_stats, BattleBreakdown, EnemyGuildStats, GuildStats,
    SideStats,
};
pub use players::{
    attendance, player_totals, top_players, AttendanceEntry, ParseMetricError, PlayerMetric,
    PlayerTotals,
};
pub use summary::{summarize, HistorySummary};
pub use window::{battles_with_min_members, battles_within, find_battle};

/// Default lookback for time-window queries, in days
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Default lookback for the daily aggregate, in days
pub const DEFAULT_DAILY_DAYS: i64 = 30;

/// Kill advantage a battle needs to count as a win in the daily aggregate
pub const DAILY_WIN_FACTOR: f64 = 1.6;

/// How a single battle's kills and deaths decide a win
///
/// The daily aggregate and the history summary have always used different
/// thresholds; both are kept so historical numbers do not shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinPolicy {
    /// `kills >= deaths * 1.6`
    DailyAdvantage,
    /// `kills > deaths`
    MoreKills,
    /// `kills >= max(1, deaths) * 1.6`, used by guild stats
    FlooredAdvantage,
}

impl WinPolicy {
    pub fn is_win(self, kills: u64, deaths: u64) -> bool {
        match self {
            WinPolicy::DailyAdvantage => kills as f64 >= deaths as f64 * DAILY_WIN_FACTOR,
            WinPolicy::MoreKills => kills > deaths,
            WinPolicy::FlooredAdvantage => kills as f64 >= deaths.max(1) as f64 * DAILY_WIN_FACTOR,
        }
    }
}

/// Wins as a percentage of battles, 0 when there were no battles
pub fn win_rate(wins: usize, battles: usize) -> f64 {
    if battles == 0 {
        0.0
    } else {
        wins as f64 / battles as f64 * 100.0
    }
}

/// Sum of `values`, pinned at `u64::MAX` instead of wrapping
pub(crate) fn saturating_total(values: impl Iterator<Item = u64>) -> u64 {
    values.fold(0, u64::saturating_add)
}

/// The home guild's entry in a battle's details
pub(crate) fn home_guild<'a>(
    record: &'a BattleRecord,
    roster: &GuildRoster,
) -> Option<(&'a str, &'a GuildBattleStats)> {
    record
        .details
        .guilds
        .iter()
        .find(|(name, stats)| roster.role_of(name, stats) == GuildRole::Home)
        .map(|(name, stats)| (name.as_str(), stats))
}

impl HistoryStore {
    /// Battles from the last `days` days, newest first
    pub fn battles_by_timeframe(&self, days: i64) -> Vec<BattleRecord> {
        battles_within(&self.history(), days, Utc::now())
    }

    /// Battles from the last `days` days where the home guild fielded at
    /// least `min_members`
    pub fn battles_with_min_members(
        &self,
        roster: &GuildRoster,
        min_members: u64,
        days: i64,
    ) -> Vec<BattleRecord> {
        battles_with_min_members(&self.history(), roster, min_members, days, Utc::now())
    }

    /// Per-day aggregates over the last `days` days, oldest day first
    pub fn daily_stats(&self, days: i64) -> Vec<DailyStats> {
        daily_stats(&self.history(), days, Utc::now())
    }

    /// Summary over the last `days` days, or the whole history
    pub fn summary(&self, days: Option<i64>) -> HistorySummary {
        let history = self.history();
        match days {
            Some(days) => summarize(&battles_within(&history, days, Utc::now())),
            None => summarize(&history),
        }
    }

    pub fn battle_by_id(&self, battle_id: &str) -> Option<BattleRecord> {
        find_battle(&self.history(), battle_id).cloned()
    }
}
