//! Home guild identity and guild classification

use std::env;

use serde::{Deserialize, Serialize};

use super::GuildBattleStats;

/// Side a guild fought on, relative to the home guild
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuildRole {
    Home,
    Allied,
    Enemy,
}

/// Identity of the tracked guild and its friendly alliance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildRoster {
    pub guild_id: String,
    pub guild_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alliance_name: Option<String>,
}

impl GuildRoster {
    pub fn new(guild_id: impl Into<String>, guild_name: impl Into<String>) -> Self {
        Self {
            guild_id: guild_id.into(),
            guild_name: guild_name.into(),
            alliance_name: None,
        }
    }

    pub fn with_alliance(mut self, alliance_name: impl Into<String>) -> Self {
        self.alliance_name = Some(alliance_name.into());
        self
    }

    /// Read the roster from `BATTLE_GUILD_ID`, `BATTLE_GUILD_NAME` and
    /// `BATTLE_ALLIANCE_NAME`. Missing variables leave the fields empty.
    pub fn from_env() -> Self {
        let alliance_name = env::var("BATTLE_ALLIANCE_NAME")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            guild_id: env::var("BATTLE_GUILD_ID").unwrap_or_default(),
            guild_name: env::var("BATTLE_GUILD_NAME").unwrap_or_default(),
            alliance_name,
        }
    }

    /// Both the upstream guild id and display name are known
    pub fn is_configured(&self) -> bool {
        !self.guild_id.is_empty() && !self.guild_name.is_empty()
    }

    pub fn is_home_guild(&self, guild_name: &str) -> bool {
        !self.guild_name.is_empty() && self.guild_name.eq_ignore_ascii_case(guild_name)
    }

    /// Case-insensitive match against the configured friendly alliance
    pub fn is_friendly_alliance(&self, alliance_name: &str) -> bool {
        match &self.alliance_name {
            Some(ours) => !alliance_name.is_empty() && ours.eq_ignore_ascii_case(alliance_name),
            None => false,
        }
    }

    /// Classify a guild entry of a stored battle
    pub fn role_of(&self, guild_name: &str, stats: &GuildBattleStats) -> GuildRole {
        if self.is_home_guild(guild_name) {
            GuildRole::Home
        } else if stats.is_allied()
            || stats
                .alliance_name
                .as_deref()
                .is_some_and(|name| self.is_friendly_alliance(name))
        {
            GuildRole::Allied
        } else {
            GuildRole::Enemy
        }
    }
}
