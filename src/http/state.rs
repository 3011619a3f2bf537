use crate::config::UpstreamConfig;
use crate::stats::StatsStore;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The single authoritative stats store
    pub stats: Arc<StatsStore>,

    /// Client for outbound TAP and prediction API calls
    pub http: reqwest::Client,

    /// Upstream endpoints and timeout
    pub upstream: UpstreamConfig,
}

impl AppState {
    pub fn new(stats: Arc<StatsStore>, upstream: UpstreamConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(upstream.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            stats,
            http,
            upstream,
        })
    }
}
