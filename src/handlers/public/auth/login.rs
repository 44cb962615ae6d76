// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::extract::{rejection::JsonRejection, Json, State};
use cookie::SameSite;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::{issue_token, session_cookie, TokenIdentity};
use crate::database::models::UserSummary;
use crate::error::ApiError;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{UserError, UserService};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionData {
    pub user: UserSummary,
    pub token: String,
}

/**
 * POST /api/auth/login - Authenticate credentials and receive a token
 *
 * Input: `{ "email": "admin@iot-energy.com", "password": "Admin123!" }`
 *
 * Output: `{ success, message: "Login successful", data: { user, token } }`
 * plus an `auth-token` cookie (SameSite=Lax, 7 days).
 *
 * Unknown email and wrong password share one message; inactive accounts are
 * told so. Both are 401.
 */
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<SessionData> {
    let request = json_body(payload)?;

    let (email, password) = match (request.email.as_deref(), request.password.as_deref()) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => (email, password),
        _ => return Err(ApiError::bad_request("Email and password are required")),
    };

    let user = match UserService::new(state.db.clone()).authenticate(email, password).await {
        Ok(user) => user,
        Err(err @ (UserError::InvalidCredentials | UserError::Inactive)) => {
            warn!("Login failed for {}: {}", email, err);
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };

    let security = &state.config.security;
    let token = issue_token(
        &TokenIdentity {
            user_id: user.id,
            email: &user.email,
            role: &user.role,
        },
        security,
    )?;

    info!("User {} logged in", user.email);
    Ok(ApiResponse::success(SessionData {
        user: user.summary(),
        token: token.clone(),
    })
    .with_message("Login successful")
    .with_cookie(session_cookie(&token, security, SameSite::Lax)))
}
