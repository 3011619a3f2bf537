use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub stats: StatsConfig,
    pub upstream: UpstreamConfig,
    pub web: WebConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct StatsConfig {
    /// Path of the persisted stats JSON file
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the TAP sync endpoint queries are proxied to
    pub tap_url: String,

    /// URL of the external prediction API
    pub prediction_url: String,

    /// Timeout applied to all outbound requests
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct WebConfig {
    /// Directory holding the prebuilt web client
    pub static_dir: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
