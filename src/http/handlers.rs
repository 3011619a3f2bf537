use super::state::AppState;
use crate::scoring::{self, Features, Verdict};
use crate::stats::StatsRecord;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TapSyncParams {
    /// ADQL query to forward to the TAP endpoint (required)
    pub query: Option<String>,

    /// Output format requested from the TAP endpoint (default: json)
    pub format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Exactly 4 values: [period, radius, distance, temperature]
    pub features: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: Verdict,
    pub confidence: f64,
    pub reasoning: String,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub record: StatsRecord,

    /// Derived: total_confidence / total_predictions
    pub average_confidence: f64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /tap/sync?query=...&format=...
/// Proxy a catalog query to the upstream TAP endpoint
pub async fn tap_sync(
    State(state): State<AppState>,
    Query(params): Query<TapSyncParams>,
) -> impl IntoResponse {
    let query = match params.query.filter(|q| !q.is_empty()) {
        Some(q) => q,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Missing required parameter: query".to_string(),
                }),
            )
                .into_response();
        }
    };

    let format = params.format.unwrap_or_else(|| "json".to_string());

    info!("Proxying TAP query ({} chars, format={})", query.len(), format);

    let response = match state
        .http
        .get(&state.upstream.tap_url)
        .query(&[("query", query.as_str()), ("format", format.as_str())])
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => {
            error!("TAP request failed: {}", e);
            return (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: format!("TAP request failed: {}", e),
                }),
            )
                .into_response();
        }
    };

    if !response.status().is_success() {
        error!("TAP endpoint returned {}", response.status());
        return (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: format!("TAP endpoint returned {}", response.status()),
            }),
        )
            .into_response();
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/json")
        .to_string();

    let body = match response.bytes().await {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to read TAP response body: {}", e);
            return (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: format!("Failed to read TAP response: {}", e),
                }),
            )
                .into_response();
        }
    };

    // Stats are touched only once the upstream call has succeeded
    state.stats.record_api_call().await;
    persist_stats(&state).await;

    (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response()
}

/// POST /predict
/// Score a feature vector with the rule-based classifier
pub async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> impl IntoResponse {
    let features = match Features::try_from(req.features.as_slice()) {
        Ok(f) => f,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response();
        }
    };

    let assessment = scoring::assess(&features);

    info!(
        "Scored candidate: {} (confidence {:.2})",
        assessment.verdict, assessment.confidence
    );

    state
        .stats
        .record_prediction(
            req.features,
            assessment.verdict,
            assessment.confidence,
            assessment.reasoning.clone(),
        )
        .await;
    persist_stats(&state).await;

    (
        StatusCode::OK,
        Json(PredictResponse {
            prediction: assessment.verdict,
            confidence: assessment.confidence,
            reasoning: assessment.reasoning,
        }),
    )
        .into_response()
}

/// POST /ai/predict
/// Forward the request body verbatim to the external prediction API
pub async fn ai_predict(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    info!("Forwarding prediction request to {}", state.upstream.prediction_url);

    let response = match state
        .http
        .post(&state.upstream.prediction_url)
        .json(&body)
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => {
            error!("Prediction API request failed: {}", e);
            return (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: format!("Prediction API request failed: {}", e),
                }),
            )
                .into_response();
        }
    };

    if !response.status().is_success() {
        error!("Prediction API returned {}", response.status());
        return (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: format!("Prediction API returned {}", response.status()),
            }),
        )
            .into_response();
    }

    let upstream: serde_json::Value = match response.json().await {
        Ok(v) => v,
        Err(e) => {
            error!("Prediction API returned invalid JSON: {}", e);
            return (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: format!("Prediction API returned invalid JSON: {}", e),
                }),
            )
                .into_response();
        }
    };

    // Record the external outcome using the response's confidence when present
    let confidence = upstream
        .get("confidence")
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let verdict = match upstream.get("prediction").and_then(|v| v.as_str()) {
        Some("CONFIRMED") => Verdict::Confirmed,
        _ => Verdict::FalsePositive,
    };
    let features = body
        .get("features")
        .and_then(|v| v.as_array())
        .map(|a| a.iter().filter_map(|v| v.as_f64()).collect())
        .unwrap_or_default();
    let reasoning = upstream
        .get("reasoning")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| upstream.to_string());

    state
        .stats
        .record_prediction(features, verdict, confidence, reasoning)
        .await;
    persist_stats(&state).await;

    (StatusCode::OK, Json(upstream)).into_response()
}

/// GET /api/stats
/// Snapshot of the usage/accuracy statistics; counts as an API call
pub async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    state.stats.record_api_call().await;
    persist_stats(&state).await;

    let record = state.stats.snapshot().await;
    let average_confidence = record.average_confidence();

    (
        StatusCode::OK,
        Json(StatsResponse {
            record,
            average_confidence,
        }),
    )
        .into_response()
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Best-effort persistence after a mutation; failures are logged, never
/// surfaced to the HTTP caller.
async fn persist_stats(state: &AppState) {
    if let Err(e) = state.stats.save().await {
        warn!("Failed to persist stats: {:#}", e);
    }
}
