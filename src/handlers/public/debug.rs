// handlers/public/debug.rs - environment and database probes
//
// Mounted only when `api.enable_debug_endpoints` is set. Secrets are never
// echoed: the reports carry presence, lengths and a password-free database URL.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentReport {
    pub environment: &'static str,
    pub has_database: bool,
    pub has_jwt_secret: bool,
    pub has_session_secret: bool,
    pub database_preview: String,
    pub jwt_secret_length: String,
    pub public_url: String,
}

fn presence(set: bool) -> &'static str {
    if set {
        "Set"
    } else {
        "Missing"
    }
}

/// Database URL with the password removed, or "Missing"
pub fn redact_database_url(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "Missing".to_string();
    };

    match url::Url::parse(raw) {
        Ok(mut parsed) => {
            if parsed.password().is_some() && parsed.set_password(Some("****")).is_err() {
                return "Unparseable".to_string();
            }
            parsed.to_string()
        }
        Err(_) => "Unparseable".to_string(),
    }
}

pub fn environment_report(state: &AppState) -> EnvironmentReport {
    let config = &state.config;
    let secret = &config.security.jwt_secret;

    EnvironmentReport {
        environment: config.environment_name(),
        has_database: config.database.url.is_some(),
        has_jwt_secret: !secret.is_empty(),
        has_session_secret: !config.security.session_secret.is_empty(),
        database_preview: redact_database_url(config.database.url.as_deref()),
        jwt_secret_length: if secret.is_empty() {
            "Missing".to_string()
        } else {
            format!("{} characters", secret.len())
        },
        public_url: config.api.public_url.clone(),
    }
}

/// GET /api/health-check
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "Environment check completed",
        "data": {
            "environment": environment_report(&state),
            "timestamp": Utc::now(),
        }
    }))
}

/// GET /api/debug/env
pub async fn debug_env(State(state): State<AppState>) -> impl IntoResponse {
    let config = &state.config;

    Json(json!({
        "success": true,
        "message": "Environment check",
        "data": {
            "environment": {
                "APP_ENV": config.environment_name(),
                "DATABASE_URL": presence(config.database.url.is_some()),
                "JWT_SECRET": presence(!config.security.jwt_secret.is_empty()),
                "NEXTAUTH_SECRET": presence(!config.security.session_secret.is_empty()),
                "NEXT_PUBLIC_API_URL": config.api.public_url,
            },
            "timestamp": Utc::now(),
        }
    }))
}

/// GET /api/debug/db - `NOW()` and `version()`; 500 with the driver error on failure
pub async fn debug_db(State(state): State<AppState>) -> impl IntoResponse {
    let connection_string = presence(state.config.database.url.is_some());

    match state.db.server_info().await {
        Ok(info) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Database connected successfully",
                "data": {
                    "currentTime": info.current_time,
                    "postgresVersion": info.postgres_version,
                    "connectionString": connection_string,
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Database probe failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "message": "Database connection failed",
                    "error": e.to_string(),
                    "connectionString": connection_string,
                })),
            )
        }
    }
}
