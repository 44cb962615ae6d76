// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Security Level: None (completely public access)
// Middleware: None (no authentication or authorization)

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

pub mod auth;
pub mod debug;

/// GET / - service descriptor
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "IoT Energy API",
            "version": version,
            "description": "Electric energy monitoring backend: authentication, devices and reference data",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/api/auth/login, /api/auth/register, /api/auth/logout (public); /api/auth/me (protected)",
                "profile": "/api/profile (protected)",
                "devices": "/api/devices[/:device_id[/history]], /api/devices/data (protected)",
                "admin": "/api/admin/* (admin only)",
                "users": "/api/users[/:id] (admin only)",
            }
        }
    }))
}

/// GET /health - database liveness
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.db.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "message": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database": "unavailable"
                    }
                })),
            )
        }
    }
}
