//! Utility functions and helpers
//!
//! Timestamp helpers and the atomic file writer used by the history store.

pub mod atomic;
pub mod time;

pub use atomic::{atomic_write, remove_stale_temp, AtomicError, AtomicResult};
pub use time::{backup_stamp, is_at_or_after, parse_battle_time, window_start};
