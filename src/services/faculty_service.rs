use tracing::info;

use crate::database::models::{Faculty, NewFaculty};
use crate::database::{Database, DatabaseError};

pub struct FacultyService {
    db: Database,
}

impl FacultyService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<Faculty>, DatabaseError> {
        self.db
            .timed(
                "faculties.list",
                sqlx::query_as::<_, Faculty>(
                    "SELECT id, faculty_code, faculty_name, contact_email, contact_phone, created_at, updated_at \
                     FROM faculties ORDER BY faculty_name ASC",
                )
                .fetch_all(self.db.pool()),
            )
            .await
    }

    pub async fn create(&self, faculty: &NewFaculty) -> Result<Faculty, DatabaseError> {
        let result = self
            .db
            .timed(
                "faculties.create",
                sqlx::query_as::<_, Faculty>(
                    "INSERT INTO faculties (faculty_code, faculty_name, contact_email, contact_phone) \
                     VALUES ($1, $2, $3, $4) RETURNING *",
                )
                .bind(&faculty.faculty_code)
                .bind(&faculty.faculty_name)
                .bind(&faculty.contact_email)
                .bind(&faculty.contact_phone)
                .fetch_one(self.db.pool()),
            )
            .await;

        match result {
            Err(err) if err.is_unique_violation() => Err(DatabaseError::Conflict(format!(
                "Faculty with code {} already exists",
                faculty.faculty_code
            ))),
            other => {
                let created = other?;
                info!("Created faculty {}", created.faculty_code);
                Ok(created)
            }
        }
    }

    /// Insert or refresh by faculty code
    pub async fn upsert(&self, faculty: &NewFaculty) -> Result<Faculty, DatabaseError> {
        self.db
            .timed(
                "faculties.upsert",
                sqlx::query_as::<_, Faculty>(
                    "INSERT INTO faculties (faculty_code, faculty_name, contact_email, contact_phone) \
                     VALUES ($1, $2, $3, $4) \
                     ON CONFLICT (faculty_code) DO UPDATE SET \
                     faculty_name = EXCLUDED.faculty_name, \
                     contact_email = EXCLUDED.contact_email, \
                     contact_phone = EXCLUDED.contact_phone, \
                     updated_at = NOW() \
                     RETURNING *",
                )
                .bind(&faculty.faculty_code)
                .bind(&faculty.faculty_name)
                .bind(&faculty.contact_email)
                .bind(&faculty.contact_phone)
                .fetch_one(self.db.pool()),
            )
            .await
    }

    pub async fn delete(&self, id: i32) -> Result<(), DatabaseError> {
        let result = self
            .db
            .timed(
                "faculties.delete",
                sqlx::query("DELETE FROM faculties WHERE id = $1").bind(id).execute(self.db.pool()),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Faculty not found".to_string()));
        }
        Ok(())
    }
}
