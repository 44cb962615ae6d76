use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::auth::{hash_password, verify_password, PasswordError};
use crate::database::models::User;
use crate::database::{Database, DatabaseError};

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is inactive")]
    Inactive,
}

/// Fields accepted when creating an account
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
}

/// Full replacement of the editable fields of an account
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: String,
    pub name: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub password: Option<String>,
}

/// Aggregates over active accounts
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginStats {
    pub total_users: i64,
    pub users_with_login: i64,
    pub users_never_logged_in: i64,
    pub recent_logins: i64,
}

pub const DEFAULT_ROLE: &str = "user";

pub struct UserService {
    db: Database,
}

impl UserService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        self.db
            .timed(
                "users.find_by_email",
                sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
                    .bind(email)
                    .fetch_optional(self.db.pool()),
            )
            .await
    }

    /// Active account by id; inactive accounts read as absent
    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, DatabaseError> {
        self.db
            .timed(
                "users.find_by_id",
                sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND is_active = true")
                    .bind(id)
                    .fetch_optional(self.db.pool()),
            )
            .await
    }

    pub async fn list(&self) -> Result<Vec<User>, DatabaseError> {
        self.db
            .timed(
                "users.list",
                sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC").fetch_all(self.db.pool()),
            )
            .await
    }

    /// Any account by id, active or not
    pub async fn get(&self, id: i32) -> Result<User, DatabaseError> {
        self.db
            .timed(
                "users.get",
                sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
                    .bind(id)
                    .fetch_optional(self.db.pool()),
            )
            .await?
            .ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))
    }

    pub async fn create(&self, new_user: &NewUser) -> Result<User, UserError> {
        let password_hash = hash_password(&new_user.password)?;
        let role = new_user.role.as_deref().unwrap_or(DEFAULT_ROLE);

        let result = self
            .db
            .timed(
                "users.create",
                sqlx::query_as::<_, User>(
                    "INSERT INTO users (email, password_hash, first_name, last_name, role, is_active) \
                     VALUES ($1, $2, $3, $4, $5, true) RETURNING *",
                )
                .bind(&new_user.email)
                .bind(&password_hash)
                .bind(&new_user.first_name)
                .bind(&new_user.last_name)
                .bind(role)
                .fetch_one(self.db.pool()),
            )
            .await;

        match result {
            Ok(user) => {
                info!("Created user {} with role {}", user.email, user.role);
                Ok(user)
            }
            Err(err) if err.is_unique_violation() => Err(DatabaseError::Conflict(
                "User with this email already exists".to_string(),
            )
            .into()),
            Err(err) => Err(err.into()),
        }
    }

    /// Insert unless the email is taken; `None` means the account already existed
    pub async fn create_if_absent(&self, new_user: &NewUser) -> Result<Option<User>, UserError> {
        let password_hash = hash_password(&new_user.password)?;
        let role = new_user.role.as_deref().unwrap_or(DEFAULT_ROLE);

        let created = self
            .db
            .timed(
                "users.create_if_absent",
                sqlx::query_as::<_, User>(
                    "INSERT INTO users (email, password_hash, first_name, last_name, role, is_active) \
                     VALUES ($1, $2, $3, $4, $5, true) \
                     ON CONFLICT (email) DO NOTHING RETURNING *",
                )
                .bind(&new_user.email)
                .bind(&password_hash)
                .bind(&new_user.first_name)
                .bind(&new_user.last_name)
                .bind(role)
                .fetch_optional(self.db.pool()),
            )
            .await?;
        Ok(created)
    }

    /// Insert, or reset password, name and role of the existing account with that email
    pub async fn upsert(&self, new_user: &NewUser) -> Result<User, UserError> {
        let password_hash = hash_password(&new_user.password)?;
        let role = new_user.role.as_deref().unwrap_or(DEFAULT_ROLE);

        let user = self
            .db
            .timed(
                "users.upsert",
                sqlx::query_as::<_, User>(
                    "INSERT INTO users (email, password_hash, first_name, last_name, role, is_active) \
                     VALUES ($1, $2, $3, $4, $5, true) \
                     ON CONFLICT (email) DO UPDATE SET \
                     password_hash = EXCLUDED.password_hash, \
                     first_name = EXCLUDED.first_name, \
                     last_name = EXCLUDED.last_name, \
                     role = EXCLUDED.role, \
                     is_active = true, \
                     updated_at = CURRENT_TIMESTAMP \
                     RETURNING *",
                )
                .bind(&new_user.email)
                .bind(&password_hash)
                .bind(&new_user.first_name)
                .bind(&new_user.last_name)
                .bind(role)
                .fetch_one(self.db.pool()),
            )
            .await?;
        Ok(user)
    }

    pub async fn update(&self, id: i32, update: &UserUpdate) -> Result<User, UserError> {
        self.get(id).await?;

        let (taken,): (bool,) = self
            .db
            .timed(
                "users.email_taken",
                sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1 AND id <> $2)")
                    .bind(&update.email)
                    .bind(id)
                    .fetch_one(self.db.pool()),
            )
            .await?;
        if taken {
            return Err(DatabaseError::Conflict("Email is already taken by another user".to_string()).into());
        }

        let (first_name, last_name) = split_name(update.name.as_deref());
        let is_active = update.status.as_deref().map(|status| status == "Active");
        let password_hash = match update.password.as_deref().map(str::trim) {
            Some(password) if !password.is_empty() => Some(hash_password(password)?),
            _ => None,
        };

        let user = self
            .db
            .timed(
                "users.update",
                sqlx::query_as::<_, User>(
                    "UPDATE users SET email = $2, first_name = $3, last_name = $4, \
                     role = COALESCE($5, role), is_active = COALESCE($6, is_active), \
                     password_hash = COALESCE($7, password_hash), updated_at = NOW() \
                     WHERE id = $1 RETURNING *",
                )
                .bind(id)
                .bind(&update.email)
                .bind(first_name)
                .bind(last_name)
                .bind(&update.role)
                .bind(is_active)
                .bind(password_hash)
                .fetch_optional(self.db.pool()),
            )
            .await?
            .ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))?;

        info!("Updated user {}", user.id);
        Ok(user)
    }

    pub async fn delete(&self, id: i32) -> Result<(), DatabaseError> {
        let result = self
            .db
            .timed(
                "users.delete",
                sqlx::query("DELETE FROM users WHERE id = $1").bind(id).execute(self.db.pool()),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("User not found".to_string()));
        }
        info!("Deleted user {}", id);
        Ok(())
    }

    /// Check credentials and stamp `last_login` on success
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, UserError> {
        let user = self.find_by_email(email).await?.ok_or(UserError::InvalidCredentials)?;

        if !user.is_active {
            return Err(UserError::Inactive);
        }
        if !verify_password(password, &user.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }

        self.db
            .timed(
                "users.touch_last_login",
                sqlx::query(
                    "UPDATE users SET last_login = CURRENT_TIMESTAMP, updated_at = CURRENT_TIMESTAMP WHERE id = $1",
                )
                .bind(user.id)
                .execute(self.db.pool()),
            )
            .await?;
        debug!("Updated last_login for user {}", user.id);

        Ok(user)
    }

    pub async fn login_stats(&self) -> Result<LoginStats, DatabaseError> {
        let (total_users, users_with_login, recent_logins): (i64, i64, i64) = self
            .db
            .timed(
                "users.login_stats",
                sqlx::query_as(
                    "SELECT COUNT(*), \
                     COUNT(*) FILTER (WHERE last_login IS NOT NULL), \
                     COUNT(*) FILTER (WHERE last_login >= NOW() - INTERVAL '24 hours') \
                     FROM users WHERE is_active = true",
                )
                .fetch_one(self.db.pool()),
            )
            .await?;

        Ok(LoginStats {
            total_users,
            users_with_login,
            users_never_logged_in: total_users - users_with_login,
            recent_logins,
        })
    }

    pub async fn recent_logins(&self, limit: i64) -> Result<Vec<User>, DatabaseError> {
        self.db
            .timed(
                "users.recent_logins",
                sqlx::query_as::<_, User>(
                    "SELECT * FROM users WHERE last_login IS NOT NULL ORDER BY last_login DESC LIMIT $1",
                )
                .bind(limit)
                .fetch_all(self.db.pool()),
            )
            .await
    }
}

/// Split a display name on whitespace: first word, then the rest
pub fn split_name(name: Option<&str>) -> (Option<String>, Option<String>) {
    let mut parts = name.unwrap_or("").split_whitespace();
    let first = parts.next().map(str::to_string);
    let rest = parts.collect::<Vec<_>>().join(" ");
    let last = if rest.is_empty() { None } else { Some(rest) };
    (first, last)
}

/// Relative "last login" label used by the user list
pub fn format_last_login(last_login: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(last_login) = last_login else {
        return "Never".to_string();
    };

    let elapsed = now.signed_duration_since(last_login);
    let plural = |n: i64, unit: &str| format!("{} {}{} ago", n, unit, if n > 1 { "s" } else { "" });

    if elapsed < Duration::minutes(1) {
        "Just now".to_string()
    } else if elapsed < Duration::hours(1) {
        plural(elapsed.num_minutes(), "minute")
    } else if elapsed < Duration::days(1) {
        plural(elapsed.num_hours(), "hour")
    } else if elapsed < Duration::days(7) {
        plural(elapsed.num_days(), "day")
    } else if elapsed < Duration::days(30) {
        plural(elapsed.num_days() / 7, "week")
    } else {
        last_login.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn splits_on_first_space() {
        assert_eq!(
            split_name(Some("Somchai Jai Dee")),
            (Some("Somchai".to_string()), Some("Jai Dee".to_string()))
        );
        assert_eq!(split_name(Some("  Somchai  ")), (Some("Somchai".to_string()), None));
        assert_eq!(split_name(None), (None, None));
    }

    #[test]
    fn last_login_labels() {
        let now = Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap();
        let ago = |d: Duration| Some(now - d);

        assert_eq!(format_last_login(None, now), "Never");
        assert_eq!(format_last_login(ago(Duration::seconds(20)), now), "Just now");
        assert_eq!(format_last_login(ago(Duration::minutes(1)), now), "1 minute ago");
        assert_eq!(format_last_login(ago(Duration::minutes(45)), now), "45 minutes ago");
        assert_eq!(format_last_login(ago(Duration::hours(3)), now), "3 hours ago");
        assert_eq!(format_last_login(ago(Duration::days(1)), now), "1 day ago");
        assert_eq!(format_last_login(ago(Duration::days(15)), now), "2 weeks ago");
        assert_eq!(format_last_login(ago(Duration::days(45)), now), "2024-05-16");
    }
}
