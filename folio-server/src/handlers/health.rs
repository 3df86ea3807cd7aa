use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::infra::app_state::AppState;

pub async fn ping_handler() -> Json<Value> {
    debug!("Ping endpoint called");
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<Value>) {
    let mut health_status = json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {}
    });

    let mut is_unhealthy = false;

    match state.catalog().ping().await {
        Ok(()) => {
            health_status["checks"]["database"] = json!({
                "status": "healthy"
            });
        }
        Err(e) => {
            warn!(error = %e, "health check: catalog store unreachable");
            health_status["checks"]["database"] = json!({
                "status": "unhealthy"
            });
            is_unhealthy = true;
        }
    }

    if is_unhealthy {
        health_status["status"] = json!("unhealthy");
        (StatusCode::SERVICE_UNAVAILABLE, Json(health_status))
    } else {
        (StatusCode::OK, Json(health_status))
    }
}
