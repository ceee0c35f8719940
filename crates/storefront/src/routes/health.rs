//! Health check route.

use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};

/// Liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({
        "ok": true,
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}
