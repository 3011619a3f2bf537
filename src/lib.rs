pub mod config;
pub mod http;
pub mod scoring;
pub mod stats;

pub use config::Config;
pub use http::{create_router, AppState};
pub use scoring::{assess, Assessment, Features, Verdict, FEATURE_COUNT};
pub use stats::{PredictionEntry, StatsRecord, StatsStore, HISTORY_LIMIT};
