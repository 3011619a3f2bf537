//! HTTP API server for the web client and external callers
//!
//! This module provides the REST surface of the service:
//! - GET /tap/sync - Proxy a catalog query to the upstream TAP endpoint
//! - POST /predict - Score a feature vector with the rule-based classifier
//! - POST /ai/predict - Forward a request to the external prediction API
//! - GET /api/stats - Usage/accuracy statistics snapshot
//! - GET /health - Health check
//! - Static assets with index fallback for everything else

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
