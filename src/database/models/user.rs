use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of the `users` table, including the password hash
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The user fields returned by the auth endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
    pub id: i32,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
}

impl User {
    /// "first last" trimmed, falling back to the email when both are blank
    pub fn display_name(&self) -> String {
        let name = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        );
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: self.role.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: Option<&str>, last: Option<&str>) -> User {
        let now = Utc::now();
        User {
            id: 1,
            email: "user@iot-energy.com".to_string(),
            password_hash: "hash".to_string(),
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
            role: "user".to_string(),
            is_active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn display_name_joins_and_trims() {
        assert_eq!(user(Some("Somchai"), Some("Dee")).display_name(), "Somchai Dee");
        assert_eq!(user(Some("Somchai"), None).display_name(), "Somchai");
        assert_eq!(user(None, None).display_name(), "user@iot-energy.com");
    }

    #[test]
    fn summary_omits_password_hash() {
        let value = serde_json::to_value(user(Some("A"), Some("B")).summary()).unwrap();
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["first_name"], "A");
    }
}
