//! Data types for the battle history store
//!
//! This module contains the canonical record shapes shared by the
//! normalizer, the history store and the query layer.

mod battle;
mod roster;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

pub use battle::{BattleDetails, BattleRecord, GuildBattleStats, PlayerBattleStats};
pub use roster::{GuildRole, GuildRoster};

/// Timezone-aware battle timestamp, kept in the offset it was recorded with
pub type BattleTime = DateTime<FixedOffset>;

/// Result type for tool and transport operations
pub type McpResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Kills over deaths, with deaths floored at 1
pub fn kd_ratio(kills: u64, deaths: u64) -> f64 {
    kills as f64 / deaths.max(1) as f64
}

/// A kills, deaths or fame total no longer fits in a `u64`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} total overflowed")]
pub struct CounterOverflow {
    pub field: &'static str,
}

/// `total + value`, or [`CounterOverflow`] naming `field`
pub fn add_counter(total: u64, value: u64, field: &'static str) -> Result<u64, CounterOverflow> {
    total.checked_add(value).ok_or(CounterOverflow { field })
}

/// Upstream ids are numeric, stored ids are strings; accept both
pub(crate) fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Unsigned(n) => n.to_string(),
        RawId::Signed(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kd_ratio_floors_deaths() {
        assert_eq!(kd_ratio(7, 0), 7.0);
        assert_eq!(kd_ratio(0, 0), 0.0);
        assert_eq!(kd_ratio(14, 15), 14.0 / 15.0);
    }

    #[test]
    fn test_add_counter() {
        assert_eq!(add_counter(2, 3, "kills"), Ok(5));
        assert_eq!(
            add_counter(u64::MAX, 1, "fame"),
            Err(CounterOverflow { field: "fame" })
        );
    }
}
