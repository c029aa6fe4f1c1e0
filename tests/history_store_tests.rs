//! Integration tests for the battle history store

use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use battle_history::ingest::ingest;
use battle_history::query::{aggregate_daily, summarize};
use battle_history::store::{HistoryStore, PersistStatus, StoreConfig};
use battle_history::types::{BattleDetails, BattleRecord, GuildRoster};
use battle_history::normalize_battle;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};
use tempfile::TempDir;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn record(id: &str, hours_ago: i64, kills: u64, deaths: u64) -> BattleRecord {
    let time = (now() - Duration::hours(hours_ago)).fixed_offset();
    BattleRecord {
        battle_id: id.to_string(),
        time,
        player_count: 3,
        kills,
        deaths,
        fame: kills * 1000,
        details: BattleDetails {
            id: id.to_string(),
            time,
            guilds: Default::default(),
            total_fame: None,
        },
    }
}

fn setup() -> (TempDir, HistoryStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = HistoryStore::new(StoreConfig::new(temp_dir.path()));
    (temp_dir, store)
}

#[test]
fn test_empty_store_merge_round_trips() {
    let (_temp_dir, store) = setup();

    let outcome = store.merge_at(
        vec![record("2", 5, 1, 1), record("1", 1, 2, 0), record("3", 9, 0, 4)],
        now(),
    );

    let ids: Vec<&str> = outcome.history.iter().map(|r| r.battle_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(outcome.persisted, PersistStatus::Saved);

    // A fresh handle reads the same records back from disk
    let reopened = HistoryStore::new(store.config().clone());
    let reloaded = reopened.history();
    assert_eq!(reloaded, outcome.history);
}

#[test]
fn test_persisted_file_shape() {
    let (_temp_dir, store) = setup();
    store.merge_at(vec![record("173256294", 1, 18, 9)], now());

    let content = fs::read_to_string(&store.config().history_path).unwrap();
    let value: Value = serde_json::from_str(&content).unwrap();
    let first = &value[0];

    assert_eq!(first["battle_id"], "173256294");
    assert_eq!(first["players"], 3);
    assert_eq!(first["time"], "2024-06-01T11:00:00+00:00");
    assert_eq!(first["details"]["time"], "2024-06-01T11:00:00+00:00");
}

#[test]
fn test_idempotent_merge() {
    let (_temp_dir, store) = setup();
    let batch = vec![record("a", 1, 1, 1), record("b", 2, 2, 2)];

    let once = store.merge_at(batch.clone(), now()).history;
    let twice = store.merge_at(batch, now());

    assert_eq!(twice.history, once);
    assert_eq!(twice.added, 0);
    assert_eq!(twice.persisted, PersistStatus::Unchanged);
}

#[test]
fn test_retention_trims_on_empty_merge() {
    let (_temp_dir, store) = setup();
    let days = [0, 20, 60, 95, 100];
    let old: Vec<BattleRecord> = days
        .iter()
        .map(|d| record(&format!("d{}", d), d * 24, 1, 1))
        .collect();
    store.save(&old).unwrap();

    let outcome = store.merge_at(Vec::new(), now());

    assert_eq!(outcome.expired, 2);
    assert_eq!(outcome.persisted, PersistStatus::Saved);
    let cutoff = now() - Duration::days(90);
    assert!(outcome.history.iter().all(|r| r.time >= cutoff));
    // The save was preceded by a backup of the untrimmed file
    assert_eq!(store.backups().unwrap().len(), 1);
}

#[test]
fn test_backup_count_bounded() {
    let temp_dir = TempDir::new().unwrap();
    let store = HistoryStore::new(StoreConfig::new(temp_dir.path()).with_max_backups(2));

    for i in 0..5 {
        store.merge_at(vec![record(&format!("r{}", i), i, 1, 1)], now());
    }

    assert!(store.backups().unwrap().len() <= 2);
}

#[test]
fn test_corrupt_file_recovers() {
    let (_temp_dir, store) = setup();
    fs::write(&store.config().history_path, "this is not json").unwrap();

    assert!(store.history().is_empty());

    let outcome = store.merge_at(vec![record("a", 1, 1, 1)], now());
    assert!(outcome.replaced_invalid);
    assert_eq!(store.reload().len(), 1);
}

#[test]
fn test_validation_failure_leaves_history() {
    let (_temp_dir, store) = setup();
    store.merge_at(vec![record("a", 1, 1, 1)], now());

    let result = store.merge_json(&[json!({"battle_id": "b", "time": "2024-06-01T00:00:00Z"})]);

    assert!(result.is_err());
    assert_eq!(store.reload().len(), 1);
}

#[test]
fn test_concurrent_merges_keep_every_battle() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(HistoryStore::new(StoreConfig::new(temp_dir.path())));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..5 {
                    let id = format!("t{}-{}", t, i);
                    store.merge_at(vec![record(&id, i, 1, 1)], now());
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.reload().len(), 20);
}

#[test]
fn test_saves_succeed_while_readers_reload() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(HistoryStore::new(StoreConfig::new(temp_dir.path())));
    let done = Arc::new(AtomicBool::new(false));

    let reader = {
        let store = Arc::clone(&store);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut reads = 0usize;
            while !done.load(Ordering::Relaxed) {
                store.reload();
                store.history();
                reads += 1;
            }
            reads
        })
    };

    let mut failures = Vec::new();
    for i in 0..100 {
        let outcome = store.merge_at(vec![record(&format!("r{}", i), 1, 1, 1)], now());
        if let PersistStatus::Failed(reason) = outcome.persisted {
            failures.push(reason);
        }
    }
    done.store(true, Ordering::Relaxed);
    assert!(reader.join().unwrap() > 0);

    assert!(failures.is_empty(), "failed saves: {:?}", failures);
    assert_eq!(store.reload().len(), 100);
    assert!(!store.config().history_path.with_extension("tmp").exists());
}

#[test]
fn test_daily_and_summary_thresholds() {
    let records = vec![record("a", 1, 10, 5), record("b", 2, 4, 10)];

    let days = aggregate_daily(&records);
    assert_eq!(days.len(), 1);
    assert_eq!(days[0].wins, 1);
    assert!((days[0].kd_ratio - 14.0 / 15.0).abs() < f64::EPSILON);

    let summary = summarize(&records);
    assert_eq!(summary.wins, 1);
    assert_eq!(summary.battles, 2);
}

#[test]
fn test_normalizer_skips_foreign_battles() {
    let roster = GuildRoster::new("home-id", "We Profit");
    let payload = json!({
        "id": 1,
        "startTime": "2024-05-01T20:15:00Z",
        "totalFame": 100,
        "players": {
            "x": {"name": "Zed", "guildId": "other", "guildName": "Raiders", "kills": 1, "deaths": 0, "killFame": 10}
        }
    });

    assert!(normalize_battle(&payload, &roster).unwrap().is_none());
}

#[test]
fn test_ingest_keeps_detail_consistency() {
    let (_temp_dir, store) = setup();
    let roster = GuildRoster::new("home-id", "We Profit");
    let start = (Utc::now() - Duration::hours(1)).to_rfc3339();
    let payload = json!({
        "id": "77",
        "startTime": start,
        "totalFame": 5000,
        "players": [
            {"name": "Aria", "guildId": "home-id", "guildName": "We Profit", "kills": 3, "deaths": 1, "killFame": 300},
            {"name": "Bram", "guildId": "home-id", "guildName": "We Profit", "kills": 2, "deaths": 2, "killFame": 200},
            {"name": "Zed", "guildId": "enemy", "guildName": "Raiders", "kills": 3, "deaths": 5, "killFame": 400}
        ]
    });

    ingest(&store, &[payload], &roster);

    let battle = &store.history()[0];
    let home = &battle.details.guilds["We Profit"];
    assert_eq!(battle.kills, home.total_kills);
    assert_eq!(battle.deaths, home.total_deaths);
    assert_eq!(battle.fame, home.total_fame);
    assert_eq!(battle.player_count, 2);
    assert_eq!(battle.details.total_fame, Some(5000));
}

#[test]
fn test_overflowing_battle_does_not_sink_the_batch() {
    let (_temp_dir, store) = setup();
    let roster = GuildRoster::new("home-id", "We Profit");
    let start = (Utc::now() - Duration::hours(1)).to_rfc3339();
    let home = |name: &str, kills: u64| {
        json!({"name": name, "guildId": "home-id", "guildName": "We Profit", "kills": kills, "deaths": 0, "killFame": 10})
    };
    let good = json!({"id": 1, "startTime": start, "players": [home("Aria", 3)]});
    let bad = json!({"id": 2, "startTime": start, "players": [home("Aria", u64::MAX), home("Bram", 1)]});

    let outcome = ingest(&store, &[good, bad], &roster);

    assert_eq!(outcome.normalized, 1);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].battle_id.as_deref(), Some("2"));
    assert_eq!(store.history()[0].battle_id, "1");
}
