use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Faculty {
    pub id: i32,
    pub faculty_code: String,
    pub faculty_name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewFaculty {
    pub faculty_code: String,
    pub faculty_name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}
