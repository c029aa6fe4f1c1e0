//! Guild-level views: home guild record, enemies, per-battle sides

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{kd_ratio, BattleRecord, GuildBattleStats, GuildRole, GuildRoster};

use super::players::{player_totals, PlayerTotals};
use super::{home_guild, win_rate, WinPolicy};

/// The home guild's record over a set of battles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuildStats {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alliance: Option<String>,
    pub total_battles: usize,
    pub total_kills: u64,
    pub total_deaths: u64,
    pub total_fame: u64,
    pub battles_won: usize,
    pub win_rate: f64,
    pub kd_ratio: f64,
    pub players: BTreeMap<String, PlayerTotals>,
}

/// Totals from the home guild's detail entries
///
/// `total_battles` counts every input battle, including ones where the home
/// guild has no detail entry. Wins use [`WinPolicy::FlooredAdvantage`].
pub fn guild_stats(records: &[BattleRecord], roster: &GuildRoster) -> GuildStats {
    let mut stats = GuildStats {
        name: roster.guild_name.clone(),
        alliance: roster.alliance_name.clone(),
        total_battles: records.len(),
        ..Default::default()
    };

    for record in records {
        let Some((_, home)) = home_guild(record, roster) else {
            continue;
        };
        stats.total_kills = stats.total_kills.saturating_add(home.total_kills);
        stats.total_deaths = stats.total_deaths.saturating_add(home.total_deaths);
        stats.total_fame = stats.total_fame.saturating_add(home.total_fame);
        if WinPolicy::FlooredAdvantage.is_win(home.total_kills, home.total_deaths) {
            stats.battles_won += 1;
        }
    }

    stats.win_rate = win_rate(stats.battles_won, stats.total_battles);
    stats.kd_ratio = kd_ratio(stats.total_kills, stats.total_deaths);
    stats.players = player_totals(records, roster);
    stats
}

/// An opposing guild's totals across the battles it appeared in
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnemyGuildStats {
    pub name: String,
    pub kills: u64,
    pub deaths: u64,
    pub fame: u64,
    pub battles: usize,
    pub kd_ratio: f64,
}

/// Every guild that was neither home nor allied, most battles first
pub fn enemy_guilds(records: &[BattleRecord], roster: &GuildRoster) -> Vec<EnemyGuildStats> {
    let mut enemies: BTreeMap<&str, EnemyGuildStats> = BTreeMap::new();

    for record in records {
        for (name, guild) in &record.details.guilds {
            if roster.role_of(name, guild) != GuildRole::Enemy {
                continue;
            }
            let entry = enemies.entry(name.as_str()).or_insert_with(|| EnemyGuildStats {
                name: name.clone(),
                ..Default::default()
            });
            entry.kills = entry.kills.saturating_add(guild.total_kills);
            entry.deaths = entry.deaths.saturating_add(guild.total_deaths);
            entry.fame = entry.fame.saturating_add(guild.total_fame);
            entry.battles += 1;
        }
    }

    let mut enemies: Vec<EnemyGuildStats> = enemies
        .into_values()
        .map(|mut e| {
            e.kd_ratio = kd_ratio(e.kills, e.deaths);
            e
        })
        .collect();
    enemies.sort_by(|a, b| b.battles.cmp(&a.battles));
    enemies
}

/// One side of a battle, summed over its guilds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideStats {
    pub guilds: Vec<String>,
    pub players: u64,
    pub kills: u64,
    pub deaths: u64,
    pub fame: u64,
    pub kd_ratio: f64,
}

impl SideStats {
    fn add(&mut self, name: &str, guild: &GuildBattleStats) {
        self.guilds.push(name.to_string());
        self.players = self.players.saturating_add(guild.headcount());
        self.kills = self.kills.saturating_add(guild.total_kills);
        self.deaths = self.deaths.saturating_add(guild.total_deaths);
        self.fame = self.fame.saturating_add(guild.total_fame);
        self.kd_ratio = kd_ratio(self.kills, self.deaths);
    }
}

/// A single battle split into home, allied and enemy sides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleBreakdown {
    pub battle_id: String,
    pub home: SideStats,
    pub allied: SideStats,
    pub enemy: SideStats,
}

pub fn battle_breakdown(record: &BattleRecord, roster: &GuildRoster) -> BattleBreakdown {
    let mut breakdown = BattleBreakdown {
        battle_id: record.battle_id.clone(),
        ..Default::default()
    };

    for (name, guild) in &record.details.guilds {
        let side = match roster.role_of(name, guild) {
            GuildRole::Home => &mut breakdown.home,
            GuildRole::Allied => &mut breakdown.allied,
            GuildRole::Enemy => &mut breakdown.enemy,
        };
        side.add(name, guild);
    }

    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::fixtures::{battle, guild, player};

    fn roster() -> GuildRoster {
        GuildRoster::new("g-1", "We Profit").with_alliance("PROFIT")
    }

    fn allied(players: Vec<crate::types::PlayerBattleStats>) -> GuildBattleStats {
        let mut stats = guild(players);
        stats.mark_allied("PROFIT");
        stats
    }

    fn records() -> Vec<BattleRecord> {
        vec![
            battle(
                "1",
                1,
                vec![
                    ("We Profit", guild(vec![player("Aria", 8, 2, 800), player("Bram", 0, 3, 0)])),
                    ("Friends", allied(vec![player("Fin", 2, 0, 100)])),
                    ("Raiders", guild(vec![player("Zed", 5, 8, 400)])),
                ],
            ),
            battle(
                "2",
                2,
                vec![
                    ("We Profit", guild(vec![player("Aria", 1, 0, 100)])),
                    ("Raiders", guild(vec![player("Zed", 0, 1, 0)])),
                    ("Outsiders", guild(vec![player("Ola", 2, 2, 20)])),
                ],
            ),
            battle("3", 3, vec![("Raiders", guild(Vec::new()))]),
        ]
    }

    #[test]
    fn test_guild_stats_floored_wins() {
        let stats = guild_stats(&records(), &roster());

        assert_eq!(stats.total_battles, 3);
        assert_eq!((stats.total_kills, stats.total_deaths), (9, 5));
        // 8 kills vs 5 deaths meets 1.6 exactly; 1 kill vs a floored death does not
        assert_eq!(stats.battles_won, 1);
        assert!((stats.win_rate - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.players["Aria"].battles, 2);
        assert_eq!(stats.alliance.as_deref(), Some("PROFIT"));
    }

    #[test]
    fn test_enemy_guilds_exclude_home_and_allies() {
        let enemies = enemy_guilds(&records(), &roster());
        let names: Vec<&str> = enemies.iter().map(|e| e.name.as_str()).collect();

        assert_eq!(names, vec!["Raiders", "Outsiders"]);
        assert_eq!(enemies[0].battles, 3);
        assert_eq!((enemies[0].kills, enemies[0].deaths), (5, 9));
    }

    #[test]
    fn test_battle_breakdown_sides() {
        let mut record = records().remove(0);
        record
            .details
            .guilds
            .get_mut("Raiders")
            .unwrap()
            .player_count = Some(30);

        let breakdown = battle_breakdown(&record, &roster());

        assert_eq!(breakdown.home.players, 2);
        assert_eq!(breakdown.home.kills, 8);
        assert_eq!(breakdown.allied.guilds, vec!["Friends".to_string()]);
        assert_eq!(breakdown.enemy.players, 30);
        assert_eq!(breakdown.enemy.kd_ratio, 5.0 / 8.0);
    }
}
