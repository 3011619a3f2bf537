use super::record::{today, PredictionEntry, StatsRecord, HISTORY_LIMIT};
use crate::scoring::Verdict;
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

/// Single authoritative store for usage/accuracy statistics, synchronized
/// to a JSON file.
///
/// The record lives behind one async mutex; every mutation happens under a
/// single lock acquisition, so counter updates are never observed partially.
/// Persistence is best-effort: the file is overwritten in full, the last
/// writer wins, and failures are logged rather than surfaced to callers.
pub struct StatsStore {
    path: PathBuf,
    record: Mutex<StatsRecord>,
}

impl StatsStore {
    /// Load persisted statistics from `path`, falling back to defaults when
    /// the file is absent or unparsable.
    ///
    /// Fields present in the file overwrite defaults field-by-field; absent
    /// fields keep their default. After the merge, `api_calls_today` is reset
    /// if the persisted `last_reset` day differs from today, and
    /// `last_updated` is stamped with today regardless.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let mut record = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<StatsRecord>(&bytes) {
                Ok(record) => {
                    info!(
                        "Loaded persisted stats from {} ({} predictions recorded)",
                        path.display(),
                        record.total_predictions
                    );
                    record
                }
                Err(e) => {
                    warn!(
                        "Persisted stats at {} are unparsable ({}), starting fresh",
                        path.display(),
                        e
                    );
                    StatsRecord::default()
                }
            },
            Err(_) => {
                info!("No persisted stats at {}, starting fresh", path.display());
                StatsRecord::default()
            }
        };

        let day = today();
        record.roll_over_if_new_day(&day);
        record.last_updated = day;

        Self {
            path,
            record: Mutex::new(record),
        }
    }

    /// Path of the persistence file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize the current record and overwrite the persistence file.
    ///
    /// Callers log failures with `warn!` and move on; persistence is an
    /// observability mechanism, not a consistency guarantee.
    pub async fn save(&self) -> Result<()> {
        let json = {
            let record = self.record.lock().await;
            serde_json::to_vec_pretty(&*record).context("Failed to serialize stats record")?
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write stats to {}", self.path.display()))
    }

    /// Count one API call against today's counter.
    ///
    /// The daily rollover is checked only at load time, never here: a process
    /// that stays up across midnight keeps accumulating until it restarts.
    pub async fn record_api_call(&self) {
        let mut record = self.record.lock().await;
        record.api_calls_today += 1;
    }

    /// Record one prediction outcome: bump the counters, add the confidence
    /// to the running sum, and append a history entry (evicting the oldest
    /// once the history holds `HISTORY_LIMIT` entries).
    pub async fn record_prediction(
        &self,
        features: Vec<f64>,
        verdict: Verdict,
        confidence: f64,
        reasoning: String,
    ) {
        let entry = PredictionEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            features,
            prediction: verdict,
            confidence,
            reasoning,
        };

        let mut record = self.record.lock().await;
        record.total_predictions += 1;
        if verdict.is_confirmed() {
            record.confirmed_predictions += 1;
        } else {
            record.rejected_predictions += 1;
        }
        record.total_confidence += confidence;

        record.prediction_history.push(entry);
        if record.prediction_history.len() > HISTORY_LIMIT {
            let excess = record.prediction_history.len() - HISTORY_LIMIT;
            record.prediction_history.drain(..excess);
        }
    }

    /// Immutable copy of the current record for serialization; the live
    /// structure is never handed out.
    pub async fn snapshot(&self) -> StatsRecord {
        self.record.lock().await.clone()
    }
}
