//! Battle History Server - Binary Entry Point
//!
//! Serves the JSON-RPC tool server on stdio by default, or the read-only
//! HTTP API with `--http`.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use battle_history::api::{self, AppState};
use battle_history::ingest::{refresh, FileSource};
use battle_history::protocol::ServerInfo;
use battle_history::query::DEFAULT_WINDOW_DAYS;
use battle_history::server::ToolServer;
use battle_history::store::{HistoryStore, StoreConfig};
use battle_history::tools::{register_all_tools, ToolContext};
use battle_history::types::{GuildRoster, McpResult};

#[derive(Parser, Debug)]
#[command(author, version, about = "Guild battle history store")]
struct Args {
    /// Serve the HTTP API on this address instead of JSON-RPC on stdio
    #[arg(long)]
    http: Option<SocketAddr>,
    /// Directory holding the history file and backups (overrides the BATTLE_* paths)
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Ingest raw battle payloads from this JSON file before serving
    #[arg(long)]
    ingest: Option<PathBuf>,
    /// Lookback passed to the ingest source, in days
    #[arg(long, default_value_t = DEFAULT_WINDOW_DAYS)]
    days: i64,
}

fn main() -> McpResult<()> {
    // stdout carries JSON-RPC responses
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();

    let config = match &args.data_dir {
        Some(dir) => {
            let env = StoreConfig::from_env();
            StoreConfig::new(dir)
                .with_max_history_days(env.max_history_days)
                .with_max_backups(env.max_backups)
        }
        None => StoreConfig::from_env(),
    };
    let store = Arc::new(HistoryStore::new(config));
    let roster = GuildRoster::from_env();
    if !roster.is_configured() {
        log::warn!("ROSTER_INCOMPLETE set BATTLE_GUILD_ID and BATTLE_GUILD_NAME to ingest battles");
    }

    if let Some(path) = &args.ingest {
        let outcome = refresh(&store, &FileSource::new(path), &roster, args.days);
        log::info!(
            "STARTUP_INGEST normalized={} added={} battles={}",
            outcome.normalized,
            outcome.merge.added,
            outcome.merge.history_len()
        );
    }

    match args.http {
        Some(addr) => {
            let state = Arc::new(AppState::new(store, roster));
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(api::serve(addr, state))?;
            Ok(())
        }
        None => {
            let ctx = Arc::new(ToolContext::new(store, roster));
            let mut server = ToolServer::with_info(ServerInfo::default());
            register_all_tools(&mut server, ctx);
            server.run_stdio()
        }
    }
}
