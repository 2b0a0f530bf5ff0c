//! Health check endpoint.

use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use super::SERVICE_NAME;

/// GET /health - Liveness check.
///
/// Returns 200 immediately with the current server time. No provider or
/// configuration checks are made.
pub async fn health() -> Json<Value> {
    Json(json!({
        "ok": true,
        "service": SERVICE_NAME,
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}
