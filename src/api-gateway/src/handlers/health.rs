//! Health check handlers

use axum::Json;
use serde_json::{json, Value};

/// Simple liveness probe
pub async fn liveness() -> Json<Value> {
    Json(json!({
        "success": true,
        "status": "alive",
        "timestamp": chrono::Utc::now()
    }))
}
