// handlers/public/auth/logout.rs - POST /api/auth/logout handler

use axum::extract::State;
use serde_json::Value;

use crate::auth::expired_session_cookie;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Clears the session cookie. Tokens are stateless, so nothing is revoked.
pub async fn logout_post(State(state): State<AppState>) -> ApiResult<Value> {
    Ok(ApiResponse::message_only("Logout successful").with_cookie(expired_session_cookie(&state.config.security)))
}
