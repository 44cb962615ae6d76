// handlers/protected/auth.rs - identity of the current token

use axum::extract::State;
use serde::Serialize;

use crate::database::models::UserSummary;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::UserService;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MeData {
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct ProfileData {
    pub user: ProfileUser,
}

#[derive(Debug, Serialize)]
pub struct ProfileUser {
    pub id: i32,
    pub email: String,
    pub role: String,
}

/// GET /api/auth/me - re-reads the account so role and name changes show up
/// before the token expires. 404 when the account is gone or deactivated.
pub async fn me_get(State(state): State<AppState>, user: AuthUser) -> ApiResult<MeData> {
    let account = UserService::new(state.db.clone())
        .find_by_id(user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::success(MeData {
        user: account.summary(),
    })
    .with_message("Authenticated"))
}

/// GET /api/profile - identity straight from the token, no database access
pub async fn profile_get(user: AuthUser) -> ApiResult<ProfileData> {
    Ok(ApiResponse::success(ProfileData {
        user: ProfileUser {
            id: user.user_id,
            email: user.email,
            role: user.role,
        },
    })
    .with_message("Profile retrieved successfully"))
}
