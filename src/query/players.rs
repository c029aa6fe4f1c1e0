//! Per-player aggregates for the home guild

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{kd_ratio, BattleRecord, GuildRoster};

use super::home_guild;

/// A home guild player's totals across battles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerTotals {
    pub name: String,
    pub kills: u64,
    pub deaths: u64,
    pub fame: u64,
    pub battles: usize,
    pub kd_ratio: f64,
}

/// Ranking key for [`top_players`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerMetric {
    #[default]
    Kills,
    Deaths,
    Fame,
    Battles,
    KdRatio,
}

#[derive(Debug, Error)]
#[error("unknown player metric '{0}' (expected kills, deaths, fame, battles or kd_ratio)")]
pub struct ParseMetricError(String);

impl FromStr for PlayerMetric {
    type Err = ParseMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kills" => Ok(PlayerMetric::Kills),
            "deaths" => Ok(PlayerMetric::Deaths),
            "fame" => Ok(PlayerMetric::Fame),
            "battles" => Ok(PlayerMetric::Battles),
            "kd_ratio" | "kd" => Ok(PlayerMetric::KdRatio),
            _ => Err(ParseMetricError(s.to_string())),
        }
    }
}

impl fmt::Display for PlayerMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlayerMetric::Kills => "kills",
            PlayerMetric::Deaths => "deaths",
            PlayerMetric::Fame => "fame",
            PlayerMetric::Battles => "battles",
            PlayerMetric::KdRatio => "kd_ratio",
        };
        f.write_str(name)
    }
}

impl PlayerMetric {
    fn value(self, totals: &PlayerTotals) -> f64 {
        match self {
            PlayerMetric::Kills => totals.kills as f64,
            PlayerMetric::Deaths => totals.deaths as f64,
            PlayerMetric::Fame => totals.fame as f64,
            PlayerMetric::Battles => totals.battles as f64,
            PlayerMetric::KdRatio => totals.kd_ratio,
        }
    }
}

/// Totals per home guild player, keyed by name
pub fn player_totals(records: &[BattleRecord], roster: &GuildRoster) -> BTreeMap<String, PlayerTotals> {
    let mut totals: BTreeMap<String, PlayerTotals> = BTreeMap::new();

    for record in records {
        let Some((_, stats)) = home_guild(record, roster) else {
            continue;
        };
        let mut counted: HashSet<&str> = HashSet::new();
        for player in &stats.players {
            let entry = totals
                .entry(player.name.clone())
                .or_insert_with(|| PlayerTotals {
                    name: player.name.clone(),
                    ..Default::default()
                });
            entry.kills = entry.kills.saturating_add(player.kills);
            entry.deaths = entry.deaths.saturating_add(player.deaths);
            entry.fame = entry.fame.saturating_add(player.fame);
            if counted.insert(player.name.as_str()) {
                entry.battles += 1;
            }
        }
    }

    for entry in totals.values_mut() {
        entry.kd_ratio = kd_ratio(entry.kills, entry.deaths);
    }
    totals
}

/// The `limit` best home guild players by `metric`, highest first
///
/// Ties keep alphabetical order.
pub fn top_players(
    records: &[BattleRecord],
    roster: &GuildRoster,
    metric: PlayerMetric,
    limit: usize,
) -> Vec<PlayerTotals> {
    let mut players: Vec<PlayerTotals> = player_totals(records, roster).into_values().collect();
    players.sort_by(|a, b| metric.value(b).total_cmp(&metric.value(a)));
    players.truncate(limit);
    players
}

/// How often a home guild player showed up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    pub name: String,
    pub battles_participated: usize,
    /// Percentage of all battles in the input
    pub attendance_rate: f64,
}

/// Attendance per home guild player, highest rate first
pub fn attendance(records: &[BattleRecord], roster: &GuildRoster) -> Vec<AttendanceEntry> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

    for record in records {
        let Some((_, stats)) = home_guild(record, roster) else {
            continue;
        };
        // A name listed twice in one battle still attended once
        let present: HashSet<&str> = stats.players.iter().map(|p| p.name.as_str()).collect();
        for name in present {
            *counts.entry(name).or_insert(0) += 1;
        }
    }

    let total = records.len();
    let mut entries: Vec<AttendanceEntry> = counts
        .into_iter()
        .map(|(name, battles)| AttendanceEntry {
            name: name.to_string(),
            battles_participated: battles,
            attendance_rate: battles as f64 / total as f64 * 100.0,
        })
        .collect();

    entries.sort_by(|a, b| b.attendance_rate.total_cmp(&a.attendance_rate));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::fixtures::{battle, guild, player};

    fn roster() -> GuildRoster {
        GuildRoster::new("g-1", "We Profit")
    }

    fn records() -> Vec<BattleRecord> {
        vec![
            battle(
                "1",
                1,
                vec![
                    ("We Profit", guild(vec![player("Aria", 5, 1, 500), player("Bram", 1, 0, 100)])),
                    ("Raiders", guild(vec![player("Zed", 9, 9, 900)])),
                ],
            ),
            battle(
                "2",
                2,
                vec![("We Profit", guild(vec![player("Aria", 2, 3, 200), player("Cora", 4, 0, 50)]))],
            ),
            battle("3", 3, vec![("Raiders", guild(vec![player("Zed", 1, 1, 10)]))]),
        ]
    }

    #[test]
    fn test_player_totals_only_home_guild() {
        let totals = player_totals(&records(), &roster());

        assert_eq!(totals.len(), 3);
        assert!(!totals.contains_key("Zed"));
        let aria = &totals["Aria"];
        assert_eq!((aria.kills, aria.deaths, aria.battles), (7, 4, 2));
        assert_eq!(aria.kd_ratio, 7.0 / 4.0);
    }

    #[test]
    fn test_repeated_name_counts_one_battle() {
        let records = vec![battle(
            "1",
            1,
            vec![("We Profit", guild(vec![player("Aria", 2, 1, 10), player("Aria", 3, 0, 20)]))],
        )];

        let totals = player_totals(&records, &roster());
        let aria = &totals["Aria"];
        assert_eq!(aria.battles, 1);
        assert_eq!((aria.kills, aria.deaths, aria.fame), (5, 1, 30));
        assert_eq!(attendance(&records, &roster())[0].battles_participated, aria.battles);
    }

    #[test]
    fn test_top_players_by_metric() {
        let by_kills = top_players(&records(), &roster(), PlayerMetric::Kills, 2);
        let names: Vec<&str> = by_kills.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Aria", "Cora"]);

        let by_kd = top_players(&records(), &roster(), PlayerMetric::KdRatio, 1);
        assert_eq!(by_kd[0].name, "Cora");

        assert!(top_players(&[], &roster(), PlayerMetric::Fame, 3).is_empty());
    }

    #[test]
    fn test_parse_metric() {
        assert_eq!("KILLS".parse::<PlayerMetric>().unwrap(), PlayerMetric::Kills);
        assert_eq!("kd_ratio".parse::<PlayerMetric>().unwrap(), PlayerMetric::KdRatio);
        assert!("assists".parse::<PlayerMetric>().is_err());
        assert_eq!(PlayerMetric::KdRatio.to_string(), "kd_ratio");
    }

    #[test]
    fn test_attendance_rate() {
        let entries = attendance(&records(), &roster());

        assert_eq!(entries[0].name, "Aria");
        assert_eq!(entries[0].battles_participated, 2);
        assert!((entries[0].attendance_rate - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(entries.len(), 3);
    }
}
