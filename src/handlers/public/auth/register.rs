// handlers/public/auth/register.rs - POST /api/auth/register handler

use axum::extract::{rejection::JsonRejection, Json, State};
use cookie::SameSite;
use serde::Deserialize;
use tracing::info;

use super::login::SessionData;
use crate::auth::{is_valid_email, issue_token, session_cookie, validate_strength, TokenIdentity};
use crate::error::ApiError;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{NewUser, UserService};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// POST /api/auth/register - create a `user` account and sign it in (201)
pub async fn register_post(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<SessionData> {
    let request = json_body(payload)?;

    let (email, password) = match (request.email, request.password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => (email, password),
        _ => return Err(ApiError::bad_request("Email and password are required")),
    };

    if !is_valid_email(&email) {
        return Err(ApiError::bad_request("Invalid email format"));
    }
    validate_strength(&password).map_err(ApiError::bad_request)?;

    let users = UserService::new(state.db.clone());
    if users.find_by_email(&email).await?.is_some() {
        return Err(ApiError::conflict("Email already exists"));
    }

    let user = users
        .create(&NewUser {
            email,
            password,
            first_name: request.first_name,
            last_name: request.last_name,
            role: None,
        })
        .await?;

    let security = &state.config.security;
    let token = issue_token(
        &TokenIdentity {
            user_id: user.id,
            email: &user.email,
            role: &user.role,
        },
        security,
    )?;

    info!("Registered user {}", user.email);
    Ok(ApiResponse::created(SessionData {
        user: user.summary(),
        token: token.clone(),
    })
    .with_message("Registration successful")
    .with_cookie(session_cookie(&token, security, SameSite::Strict)))
}
