//! Battle record types persisted in the history file

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{add_counter, id_from_string_or_number, kd_ratio, BattleTime, CounterOverflow};

/// One player's line in a battle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerBattleStats {
    pub name: String,
    #[serde(default)]
    pub kills: u64,
    #[serde(default)]
    pub deaths: u64,
    #[serde(default)]
    pub fame: u64,
}

/// Accumulated stats for one guild taking part in a battle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildBattleStats {
    #[serde(default)]
    pub players: Vec<PlayerBattleStats>,
    #[serde(default)]
    pub total_kills: u64,
    #[serde(default)]
    pub total_deaths: u64,
    #[serde(default)]
    pub total_fame: u64,
    /// Authoritative head count when individual players are not tracked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alliance: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alliance_name: Option<String>,
}

impl GuildBattleStats {
    /// Append a player and fold their counters into the guild totals
    ///
    /// On overflow the guild is left unchanged.
    pub fn record(&mut self, player: PlayerBattleStats) -> Result<(), CounterOverflow> {
        let kills = add_counter(self.total_kills, player.kills, "kills")?;
        let deaths = add_counter(self.total_deaths, player.deaths, "deaths")?;
        let fame = add_counter(self.total_fame, player.fame, "fame")?;

        self.total_kills = kills;
        self.total_deaths = deaths;
        self.total_fame = fame;
        self.players.push(player);
        Ok(())
    }

    /// Flag this guild as part of the friendly alliance
    pub fn mark_allied(&mut self, alliance_name: &str) {
        self.alliance = Some(true);
        self.alliance_name = Some(alliance_name.to_string());
    }

    pub fn is_allied(&self) -> bool {
        self.alliance == Some(true)
    }

    /// `player_count` wins over the length of the tracked player list
    pub fn headcount(&self) -> u64 {
        self.player_count.unwrap_or(self.players.len() as u64)
    }

    pub fn kd_ratio(&self) -> f64 {
        kd_ratio(self.total_kills, self.total_deaths)
    }
}

/// Per-guild breakdown of a single battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleDetails {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub time: BattleTime,
    #[serde(default)]
    pub guilds: BTreeMap<String, GuildBattleStats>,
    /// Fame of the whole battle across every side, as reported upstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_fame: Option<u64>,
}

/// A battle as seen from the tracked guild, one per historical battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleRecord {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub battle_id: String,
    pub time: BattleTime,
    #[serde(rename = "players")]
    pub player_count: u64,
    pub kills: u64,
    pub deaths: u64,
    pub fame: u64,
    pub details: BattleDetails,
}

impl BattleRecord {
    pub fn kd_ratio(&self) -> f64 {
        kd_ratio(self.kills, self.deaths)
    }

    /// Look up a guild in the details by name, ignoring ASCII case
    pub fn guild(&self, name: &str) -> Option<(&str, &GuildBattleStats)> {
        self.details
            .guilds
            .iter()
            .find(|(guild, _)| guild.eq_ignore_ascii_case(name))
            .map(|(guild, stats)| (guild.as_str(), stats))
    }
}
