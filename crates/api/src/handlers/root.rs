use axum::Json;
use serde_json::{json, Value};

use super::SERVICE_NAME;

/// GET / - Service status.
pub async fn root() -> Json<Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "status": "running",
    }))
}
