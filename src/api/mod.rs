//! Read-only HTTP API over the battle history
//!
//! - `GET /health`
//! - `GET /api/battles?days=&min_members=` - battles in the window, newest first
//! - `GET /api/battles/:id` - one battle with its side breakdown
//! - `GET /api/stats/daily?days=` - per-day aggregate
//! - `GET /api/stats/summary?days=` - totals
//! - `GET /api/guild?days=` - home guild record
//! - `GET /api/players/top?metric=&limit=&days=` - player ranking
//! - `GET /api/enemies?days=` - enemy guild totals
//! - `GET /api/attendance?days=` - player attendance

pub mod http;
pub mod rest;
pub mod state;

pub use http::{create_router, serve};
pub use state::AppState;
