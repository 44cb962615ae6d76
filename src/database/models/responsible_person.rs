use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Contact row joined with its faculty's code and name
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ResponsiblePerson {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub faculty_id: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub faculty_name: Option<String>,
    pub faculty_code: Option<String>,
}

/// Body of a create or full update; `is_active` is only applied on update
#[derive(Debug, Clone, Deserialize)]
pub struct NewResponsiblePerson {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub faculty_id: Option<i32>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Listing filters taken from the query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponsiblePersonFilter {
    pub faculty_id: Option<i32>,
    pub is_active: Option<bool>,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_defaults_to_active() {
        let person: NewResponsiblePerson =
            serde_json::from_str(r#"{"name":"Somchai","email":"somchai@cmu.ac.th","faculty_id":2}"#).unwrap();
        assert!(person.is_active);
        assert_eq!(person.faculty_id, Some(2));
        assert!(person.phone.is_none());
    }
}
