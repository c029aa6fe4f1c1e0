//! Whole-history summary

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{kd_ratio, BattleRecord};

use super::{saturating_total, win_rate, WinPolicy};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub battles: usize,
    pub kills: u64,
    pub deaths: u64,
    pub fame: u64,
    pub kd_ratio: f64,
    /// Battles with more kills than deaths
    pub wins: usize,
    pub win_rate: f64,
    pub first_day: Option<NaiveDate>,
    pub last_day: Option<NaiveDate>,
}

/// Totals over `records`; a battle is a win under [`WinPolicy::MoreKills`]
pub fn summarize(records: &[BattleRecord]) -> HistorySummary {
    let kills = saturating_total(records.iter().map(|r| r.kills));
    let deaths = saturating_total(records.iter().map(|r| r.deaths));
    let wins = records
        .iter()
        .filter(|r| WinPolicy::MoreKills.is_win(r.kills, r.deaths))
        .count();

    HistorySummary {
        battles: records.len(),
        kills,
        deaths,
        fame: saturating_total(records.iter().map(|r| r.fame)),
        kd_ratio: kd_ratio(kills, deaths),
        wins,
        win_rate: win_rate(wins, records.len()),
        first_day: records.iter().map(|r| r.time).min().map(|t| t.date_naive()),
        last_day: records.iter().map(|r| r.time).max().map(|t| t.date_naive()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::fixtures::simple;

    #[test]
    fn test_summary_uses_more_kills_rule() {
        let records = vec![
            simple("a", 1, 10, 5),
            simple("b", 2, 4, 10),
            // Counts here but not in the daily aggregate
            simple("c", 3, 10, 7),
        ];

        let summary = summarize(&records);

        assert_eq!(summary.battles, 3);
        assert_eq!(summary.wins, 2);
        assert_eq!((summary.kills, summary.deaths), (24, 22));
        assert!((summary.kd_ratio - 24.0 / 22.0).abs() < f64::EPSILON);
        assert!(summary.first_day <= summary.last_day);
    }

    #[test]
    fn test_summary_saturates_huge_counters() {
        let records = vec![simple("a", 1, u64::MAX, 1), simple("b", 2, 5, 1)];

        let summary = summarize(&records);

        assert_eq!(summary.kills, u64::MAX);
        assert_eq!(summary.deaths, 2);
        assert_eq!(summary.wins, 2);
    }

    #[test]
    fn test_empty_summary() {
        let summary = summarize(&[]);
        assert_eq!(summary, HistorySummary::default());
    }
}
