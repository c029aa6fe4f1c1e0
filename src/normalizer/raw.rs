//! Upstream battle payload shapes

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::PlayerBattleStats;

/// Battle id as sent upstream, numeric or string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Number(u64),
    Text(String),
}

impl RawId {
    pub(crate) fn into_string(self) -> String {
        match self {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

/// One battle object as returned by the game info API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawBattle {
    pub id: RawId,
    pub start_time: String,
    #[serde(default)]
    pub total_fame: Option<u64>,
    pub players: RawPlayers,
}

/// Players are keyed by player id in battle detail responses and listed
/// plainly in some exports
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawPlayers {
    Keyed(BTreeMap<String, RawPlayer>),
    Listed(Vec<RawPlayer>),
}

impl RawPlayers {
    pub(crate) fn into_vec(self) -> Vec<RawPlayer> {
        match self {
            RawPlayers::Keyed(map) => map.into_values().collect(),
            RawPlayers::Listed(list) => list,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawPlayer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub guild_id: Option<String>,
    #[serde(default)]
    pub guild_name: Option<String>,
    #[serde(default)]
    pub alliance_name: Option<String>,
    #[serde(default)]
    pub kills: Option<u64>,
    #[serde(default)]
    pub deaths: Option<u64>,
    #[serde(default)]
    pub kill_fame: Option<u64>,
}

impl RawPlayer {
    pub(crate) fn belongs_to(&self, guild_id: &str) -> bool {
        self.guild_id.as_deref() == Some(guild_id)
    }

    pub(crate) fn guild_label(&self) -> String {
        non_empty(self.guild_name.as_deref()).unwrap_or("Unknown").to_string()
    }

    pub(crate) fn alliance(&self) -> Option<&str> {
        non_empty(self.alliance_name.as_deref())
    }

    pub(crate) fn to_stats(&self) -> PlayerBattleStats {
        PlayerBattleStats {
            name: non_empty(self.name.as_deref()).unwrap_or("Unknown").to_string(),
            kills: self.kills.unwrap_or(0),
            deaths: self.deaths.unwrap_or(0),
            fame: self.kill_fame.unwrap_or(0),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
