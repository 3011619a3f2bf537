// Integration tests for the stats store
//
// These tests cover counter invariants, the bounded prediction history,
// persistence round trips, the shallow merge over defaults, and the
// load-time-only daily rollover (a documented quirk: a process that stays
// up across midnight keeps counting until the next restart).

use chrono::Utc;
use exo_habitat::scoring::Verdict;
use exo_habitat::stats::{StatsStore, HISTORY_LIMIT};
use std::path::PathBuf;
use tempfile::TempDir;

fn stats_path(dir: &TempDir) -> PathBuf {
    dir.path().join("model_stats.json")
}

fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

#[tokio::test]
async fn test_prediction_counters_always_sum() {
    let dir = TempDir::new().unwrap();
    let store = StatsStore::load(stats_path(&dir)).await;

    let n = 25;
    for i in 0..n {
        let verdict = if i % 3 == 0 {
            Verdict::Confirmed
        } else {
            Verdict::FalsePositive
        };
        store
            .record_prediction(vec![i as f64, 1.0, 1.0, 300.0], verdict, 0.6, String::new())
            .await;
    }

    let record = store.snapshot().await;
    assert_eq!(record.total_predictions, n);
    assert_eq!(
        record.confirmed_predictions + record.rejected_predictions,
        record.total_predictions,
        "Confirmed + rejected must always equal total"
    );
    assert_eq!(record.confirmed_predictions, 9);
    assert!((record.total_confidence - 0.6 * n as f64).abs() < 1e-9);
    assert!((record.average_confidence() - 0.6).abs() < 1e-9);
}

#[tokio::test]
async fn test_history_is_bounded_and_evicts_oldest() {
    let dir = TempDir::new().unwrap();
    let store = StatsStore::load(stats_path(&dir)).await;

    for i in 0..=(HISTORY_LIMIT as u64) {
        store
            .record_prediction(
                vec![i as f64, 0.0, 0.0, 0.0],
                Verdict::FalsePositive,
                0.0,
                String::new(),
            )
            .await;
    }

    let record = store.snapshot().await;
    assert_eq!(record.total_predictions, HISTORY_LIMIT as u64 + 1);
    assert_eq!(
        record.prediction_history.len(),
        HISTORY_LIMIT,
        "History must never exceed {} entries",
        HISTORY_LIMIT
    );

    // Entry 0 was evicted; entries 1..=100 remain, newest last
    assert_eq!(record.prediction_history[0].features[0], 1.0, "Oldest entry must be evicted first");
    assert_eq!(
        record.prediction_history.last().unwrap().features[0],
        HISTORY_LIMIT as f64
    );
}

#[tokio::test]
async fn test_save_load_round_trip_same_day() {
    let dir = TempDir::new().unwrap();
    let path = stats_path(&dir);

    let store = StatsStore::load(&path).await;
    store
        .record_prediction(
            vec![300.0, 1.0, 1.0, 300.0],
            Verdict::Confirmed,
            1.0,
            "Favorable orbital period".to_string(),
        )
        .await;
    store.record_api_call().await;
    store.save().await.unwrap();

    let reloaded = StatsStore::load(&path).await;
    assert_eq!(
        reloaded.snapshot().await,
        store.snapshot().await,
        "Reloading on the same calendar day must yield an identical record"
    );
}

#[tokio::test]
async fn test_day_rollover_resets_api_calls_at_load() {
    let dir = TempDir::new().unwrap();
    let path = stats_path(&dir);

    let store = StatsStore::load(&path).await;
    store.record_api_call().await;
    store.record_api_call().await;
    store.save().await.unwrap();

    // Age the persisted record to a prior day
    let mut persisted: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    persisted["last_reset"] = serde_json::Value::from("2000-01-01");
    persisted["api_calls_today"] = serde_json::Value::from(42);
    std::fs::write(&path, serde_json::to_vec(&persisted).unwrap()).unwrap();

    let reloaded = StatsStore::load(&path).await;
    let record = reloaded.snapshot().await;
    assert_eq!(record.api_calls_today, 0, "Stale day must reset the counter");
    assert_eq!(record.last_reset, today());
}

#[tokio::test]
async fn test_rollover_happens_only_at_load() {
    let dir = TempDir::new().unwrap();
    let path = stats_path(&dir);

    std::fs::write(
        &path,
        r#"{"api_calls_today": 42, "last_reset": "2000-01-01"}"#,
    )
    .unwrap();

    let store = StatsStore::load(&path).await;
    assert_eq!(store.snapshot().await.api_calls_today, 0);

    // In-process calls only ever increment; no per-call day check exists
    for _ in 0..5 {
        store.record_api_call().await;
    }
    store.save().await.unwrap();

    let reloaded = StatsStore::load(&path).await;
    assert_eq!(
        reloaded.snapshot().await.api_calls_today,
        5,
        "Same-day reload must preserve the accumulated count"
    );
}

#[tokio::test]
async fn test_missing_file_loads_defaults() {
    let dir = TempDir::new().unwrap();
    let store = StatsStore::load(dir.path().join("does-not-exist.json")).await;

    let record = store.snapshot().await;
    assert_eq!(record.total_predictions, 0);
    assert_eq!(record.api_calls_today, 0);
    assert!(record.prediction_history.is_empty());
    assert_eq!(record.last_updated, today());
}

#[tokio::test]
async fn test_corrupt_file_loads_defaults() {
    let dir = TempDir::new().unwrap();
    let path = stats_path(&dir);
    std::fs::write(&path, "definitely not json {").unwrap();

    let store = StatsStore::load(&path).await;
    assert_eq!(store.snapshot().await.total_predictions, 0);

    // The store must still be able to overwrite the corrupt file
    store.save().await.unwrap();
    let reloaded = StatsStore::load(&path).await;
    assert_eq!(reloaded.snapshot().await.total_predictions, 0);
}

#[tokio::test]
async fn test_partial_file_shallow_merges_over_defaults() {
    let dir = TempDir::new().unwrap();
    let path = stats_path(&dir);

    std::fs::write(&path, r#"{"total_predictions": 7, "total_confidence": 4.2}"#).unwrap();

    let store = StatsStore::load(&path).await;
    let record = store.snapshot().await;

    assert_eq!(record.total_predictions, 7, "Present fields overwrite defaults");
    assert!((record.total_confidence - 4.2).abs() < 1e-9);
    assert_eq!(
        record.model_type, "rule-based habitability classifier",
        "Absent fields keep their defaults"
    );
    assert_eq!(record.features_count, 4);
    assert!(record.prediction_history.is_empty());
}

#[tokio::test]
async fn test_save_creates_parent_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("data").join("stats.json");

    let store = StatsStore::load(&path).await;
    store.record_api_call().await;
    store.save().await.unwrap();

    assert!(path.exists(), "Save must create missing parent directories");
}
