use axum::Json;
use serde_json::{json, Value};

/// Connectivity probe, served without authentication.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
