//! Usage and accuracy statistics
//!
//! This module provides the `StatsStore` abstraction that manages:
//! - The in-memory `StatsRecord` (counters, confidence sum, history)
//! - Load-time merge with the persisted JSON file and daily rollover
//! - Best-effort full-file persistence after mutations
//! - Immutable snapshots for the stats endpoint

mod record;
mod store;

pub use record::{PredictionEntry, StatsRecord, HISTORY_LIMIT};
pub use store::StatsStore;
