// handlers/elevated/users.rs - user administration (/api/users)

use axum::extract::{
    rejection::{JsonRejection, PathRejection},
    Json, Path, State,
};
use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::is_valid_email;
use crate::database::models::User;
use crate::error::ApiError;
use crate::handlers::{json_body, path_param};
use crate::middleware::{ApiResponse, ApiResult, ANY_USER};
use crate::services::{format_last_login, NewUser, UserService, UserUpdate};
use crate::state::AppState;

/// User as presented to the admin screens; `L` is the last-login rendering
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUser<L: Serialize> {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
    pub status: &'static str,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: L,
}

impl<L: Serialize> ApiUser<L> {
    fn from_user(user: User, last_login: L) -> Self {
        Self {
            id: user.id,
            name: user.display_name(),
            status: if user.is_active { "Active" } else { "Inactive" },
            is_active: user.is_active,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
            last_login,
        }
    }
}

fn detail(user: User) -> ApiUser<Option<DateTime<Utc>>> {
    let last_login = user.last_login;
    ApiUser::from_user(user, last_login)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListData {
    pub users: Vec<ApiUser<String>>,
    pub total_users: usize,
    pub active_users: usize,
    pub admins: usize,
    pub new_this_month: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub password: Option<String>,
}

fn check_role(role: Option<&str>) -> Result<(), ApiError> {
    match role {
        Some(role) if !ANY_USER.contains(&role) => {
            Err(ApiError::bad_request(format!("Invalid role. Allowed roles: {}", ANY_USER.join(", "))))
        }
        _ => Ok(()),
    }
}

pub fn summarize(users: Vec<User>, now: DateTime<Utc>) -> UserListData {
    let month_ago = now.checked_sub_months(Months::new(1)).unwrap_or(now);

    let active_users = users.iter().filter(|u| u.is_active).count();
    let admins = users.iter().filter(|u| u.role == "admin").count();
    let new_this_month = users.iter().filter(|u| u.created_at > month_ago).count();

    let users: Vec<ApiUser<String>> = users
        .into_iter()
        .map(|user| {
            let label = format_last_login(user.last_login, now);
            ApiUser::from_user(user, label)
        })
        .collect();

    UserListData {
        total_users: users.len(),
        users,
        active_users,
        admins,
        new_this_month,
    }
}

/// GET /api/users - all accounts, newest first, with totals
pub async fn users_get(State(state): State<AppState>) -> ApiResult<UserListData> {
    let users = UserService::new(state.db.clone()).list().await?;
    Ok(ApiResponse::success(summarize(users, Utc::now())).with_message("Users retrieved successfully"))
}

/// POST /api/users
pub async fn users_post(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<ApiUser<Option<DateTime<Utc>>>> {
    let request = json_body(payload)?;

    let (email, password) = match (request.email, request.password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => (email, password),
        _ => return Err(ApiError::bad_request("Email and password are required")),
    };
    if !is_valid_email(&email) {
        return Err(ApiError::bad_request("Invalid email format"));
    }
    check_role(request.role.as_deref())?;

    let users = UserService::new(state.db.clone());
    if users.find_by_email(&email).await?.is_some() {
        return Err(ApiError::conflict("User with this email already exists"));
    }

    let created = users
        .create(&NewUser {
            email,
            password,
            first_name: request.first_name,
            last_name: request.last_name,
            role: request.role,
        })
        .await?;

    Ok(ApiResponse::created(detail(created)).with_message("User created successfully"))
}

/// GET /api/users/:id
pub async fn user_get(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<ApiUser<Option<DateTime<Utc>>>> {
    let user = UserService::new(state.db.clone()).get(path_param(id)?).await?;
    Ok(ApiResponse::success(detail(user)).with_message("User retrieved successfully"))
}

/**
 * PUT /api/users/:id
 *
 * Input: `{ name, email, role?, status?, password? }`. `name` is split on the
 * first whitespace into first and last name; `status: "Active"` activates,
 * any other status deactivates; an absent role or status keeps the current
 * value; a blank password leaves the hash untouched.
 */
pub async fn user_put(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiResult<ApiUser<Option<DateTime<Utc>>>> {
    let id = path_param(id)?;
    let request = json_body(payload)?;

    let email = match request.email {
        Some(email) if !email.is_empty() => email,
        _ => return Err(ApiError::bad_request("Email is required")),
    };
    if !is_valid_email(&email) {
        return Err(ApiError::bad_request("Invalid email format"));
    }
    check_role(request.role.as_deref())?;

    let updated = UserService::new(state.db.clone())
        .update(
            id,
            &UserUpdate {
                email,
                name: request.name,
                role: request.role,
                status: request.status,
                password: request.password,
            },
        )
        .await?;

    Ok(ApiResponse::success(detail(updated)).with_message("User updated successfully"))
}

/// DELETE /api/users/:id - hard delete; 404 when there was nothing to delete
pub async fn user_delete(State(state): State<AppState>, id: Result<Path<i32>, PathRejection>) -> ApiResult<Value> {
    UserService::new(state.db.clone()).delete(path_param(id)?).await?;
    Ok(ApiResponse::message_only("User deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn user(id: i32, role: &str, active: bool, created_days_ago: i64, now: DateTime<Utc>) -> User {
        User {
            id,
            email: format!("user{}@iot-energy.com", id),
            password_hash: "hash".to_string(),
            first_name: Some("Test".to_string()),
            last_name: None,
            role: role.to_string(),
            is_active: active,
            last_login: None,
            created_at: now - Duration::days(created_days_ago),
            updated_at: now,
        }
    }

    #[test]
    fn totals_and_labels() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 9, 0, 0).unwrap();
        let data = summarize(
            vec![
                user(1, "admin", true, 2, now),
                user(2, "user", false, 40, now),
                user(3, "manager", true, 10, now),
            ],
            now,
        );

        assert_eq!(data.total_users, 3);
        assert_eq!(data.active_users, 2);
        assert_eq!(data.admins, 1);
        assert_eq!(data.new_this_month, 2);

        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["users"][0]["lastLogin"], "Never");
        assert_eq!(value["users"][1]["status"], "Inactive");
        assert_eq!(value["users"][0]["name"], "Test");
        assert!(value["users"][0].get("password_hash").is_none());
    }

    #[test]
    fn role_must_be_known() {
        assert!(check_role(None).is_ok());
        assert!(check_role(Some("manager")).is_ok());
        assert_eq!(check_role(Some("root")).unwrap_err().status_code(), 400);
    }
}
