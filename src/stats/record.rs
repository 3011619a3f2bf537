use crate::scoring::Verdict;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of history entries kept in the record
pub const HISTORY_LIMIT: usize = 100;

/// One recorded prediction in the rolling history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionEntry {
    /// Unique entry ID
    pub id: Uuid,

    /// When the prediction was made
    pub timestamp: DateTime<Utc>,

    /// Input feature vector as received
    pub features: Vec<f64>,

    /// Classification outcome
    pub prediction: Verdict,

    /// Confidence score (0.0 to 1.0)
    pub confidence: f64,

    /// Rule descriptions (or upstream output payload) behind the verdict
    pub reasoning: String,
}

/// The sole persisted entity: usage and accuracy statistics for the service.
///
/// Every field carries a serde default so that loading a persisted record is
/// a shallow merge: fields present in the file overwrite the default, fields
/// absent keep it. This is the only schema-evolution mechanism; there is no
/// version field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsRecord {
    /// Static descriptive label for the classifier
    #[serde(default = "default_model_type")]
    pub model_type: String,

    /// Size of the reference training set (configuration constant)
    #[serde(default = "default_training_samples")]
    pub training_samples: u64,

    /// Number of input features (configuration constant)
    #[serde(default = "default_features_count")]
    pub features_count: u64,

    /// Date string (YYYY-MM-DD), set at process start
    #[serde(default = "today")]
    pub last_updated: String,

    #[serde(default)]
    pub total_predictions: u64,

    #[serde(default)]
    pub confirmed_predictions: u64,

    #[serde(default)]
    pub rejected_predictions: u64,

    /// Running sum of per-prediction confidences; the average is derived as
    /// `total_confidence / total_predictions` when predictions exist
    #[serde(default)]
    pub total_confidence: f64,

    /// Most recent predictions, newest last, bounded to `HISTORY_LIMIT`
    #[serde(default)]
    pub prediction_history: Vec<PredictionEntry>,

    /// Process-start timestamp; a persisted value survives restarts
    #[serde(default = "Utc::now")]
    pub start_time: DateTime<Utc>,

    /// Calls counted since the last daily rollover
    #[serde(default)]
    pub api_calls_today: u64,

    /// Day string (YYYY-MM-DD) used to detect the daily rollover
    #[serde(default = "today")]
    pub last_reset: String,
}

impl Default for StatsRecord {
    fn default() -> Self {
        Self {
            model_type: default_model_type(),
            training_samples: default_training_samples(),
            features_count: default_features_count(),
            last_updated: today(),
            total_predictions: 0,
            confirmed_predictions: 0,
            rejected_predictions: 0,
            total_confidence: 0.0,
            prediction_history: Vec::new(),
            start_time: Utc::now(),
            api_calls_today: 0,
            last_reset: today(),
        }
    }
}

impl StatsRecord {
    /// Reset the daily counter if the stored day differs from `day`.
    ///
    /// Called only when the record is loaded from disk. A long-running
    /// process that crosses midnight keeps counting until the next restart.
    pub fn roll_over_if_new_day(&mut self, day: &str) {
        if self.last_reset != day {
            self.api_calls_today = 0;
            self.last_reset = day.to_string();
        }
    }

    /// Average confidence over all recorded predictions, 0.0 when empty
    pub fn average_confidence(&self) -> f64 {
        if self.total_predictions == 0 {
            0.0
        } else {
            self.total_confidence / self.total_predictions as f64
        }
    }
}

/// Current calendar day as YYYY-MM-DD (UTC)
pub fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

fn default_model_type() -> String {
    "rule-based habitability classifier".to_string()
}

fn default_training_samples() -> u64 {
    9564
}

fn default_features_count() -> u64 {
    4
}
