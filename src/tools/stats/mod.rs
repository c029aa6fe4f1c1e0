//! Stats tools

mod get_attendance;
mod get_daily_stats;
mod get_enemy_guilds;
mod get_guild_stats;
mod get_summary;
mod get_top_players;

pub use get_attendance::GetAttendanceTool;
pub use get_daily_stats::GetDailyStatsTool;
pub use get_enemy_guilds::GetEnemyGuildsTool;
pub use get_guild_stats::GetGuildStatsTool;
pub use get_summary::GetSummaryTool;
pub use get_top_players::GetTopPlayersTool;
