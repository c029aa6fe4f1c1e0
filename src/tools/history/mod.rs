//! History tools

mod get_battle;
mod get_battles;
mod get_store_stats;

pub use get_battle::GetBattleTool;
pub use get_battles::GetBattlesTool;
pub use get_store_stats::GetStoreStatsTool;
