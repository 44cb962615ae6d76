// handlers/elevated/dashboard.rs - admin overview

use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{DashboardService, DashboardSummary, LoginStats, UserService};
use crate::state::AppState;

const RECENT_LOGIN_LIMIT: i64 = 10;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub admin_data: DashboardSummary,
    pub requested_by: AuthUser,
}

#[derive(Debug, Serialize)]
pub struct RecentUser {
    pub id: i32,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
    pub last_login: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl From<User> for RecentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            last_login: user.last_login,
            is_active: user.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginStatsData {
    pub stats: LoginStats,
    pub recent_users: Vec<RecentUser>,
}

/// GET /api/admin/dashboard
pub async fn dashboard_get(State(state): State<AppState>, user: AuthUser) -> ApiResult<DashboardData> {
    let summary = DashboardService::new(state.db.clone()).summary().await?;

    Ok(ApiResponse::success(DashboardData {
        admin_data: summary,
        requested_by: user,
    })
    .with_message("Admin data retrieved successfully"))
}

/// GET /api/admin/login-stats
pub async fn login_stats_get(State(state): State<AppState>) -> ApiResult<LoginStatsData> {
    let users = UserService::new(state.db.clone());
    let (stats, recent) = futures::try_join!(users.login_stats(), users.recent_logins(RECENT_LOGIN_LIMIT))?;

    Ok(ApiResponse::success(LoginStatsData {
        stats,
        recent_users: recent.into_iter().map(RecentUser::from).collect(),
    }))
}
