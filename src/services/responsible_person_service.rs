use tracing::info;

use crate::database::models::{NewResponsiblePerson, ResponsiblePerson, ResponsiblePersonFilter};
use crate::database::{Database, DatabaseError};

const PERSON_COLUMNS: &str = "rp.id, rp.name, rp.email, rp.phone, rp.department, rp.position, rp.faculty_id, \
    rp.is_active, rp.created_at, rp.updated_at, f.faculty_name, f.faculty_code";

pub struct ResponsiblePersonService {
    db: Database,
}

impl ResponsiblePersonService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Contacts ordered by name; absent filters match everything
    pub async fn list(&self, filter: &ResponsiblePersonFilter) -> Result<Vec<ResponsiblePerson>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM responsible_persons rp \
             LEFT JOIN faculties f ON rp.faculty_id = f.id \
             WHERE ($1::INTEGER IS NULL OR rp.faculty_id = $1) \
             AND ($2::BOOLEAN IS NULL OR rp.is_active = $2) \
             ORDER BY rp.name ASC",
            PERSON_COLUMNS
        );

        self.db
            .timed(
                "responsible_persons.list",
                sqlx::query_as::<_, ResponsiblePerson>(&sql)
                    .bind(filter.faculty_id)
                    .bind(filter.is_active)
                    .fetch_all(self.db.pool()),
            )
            .await
    }

    pub async fn create(&self, person: &NewResponsiblePerson) -> Result<ResponsiblePerson, DatabaseError> {
        let sql = format!(
            "WITH rp AS ( \
                INSERT INTO responsible_persons (name, email, phone, department, position, faculty_id) \
                VALUES ($1, $2, $3, $4, $5, $6) RETURNING * \
             ) SELECT {} FROM rp LEFT JOIN faculties f ON rp.faculty_id = f.id",
            PERSON_COLUMNS
        );

        let result = self
            .db
            .timed(
                "responsible_persons.create",
                sqlx::query_as::<_, ResponsiblePerson>(&sql)
                    .bind(&person.name)
                    .bind(&person.email)
                    .bind(&person.phone)
                    .bind(&person.department)
                    .bind(&person.position)
                    .bind(person.faculty_id)
                    .fetch_one(self.db.pool()),
            )
            .await;

        let created = result.map_err(|err| write_error(err, &person.email))?;
        info!("Created responsible person {}", created.email);
        Ok(created)
    }

    pub async fn update(&self, id: i32, person: &NewResponsiblePerson) -> Result<ResponsiblePerson, DatabaseError> {
        let sql = format!(
            "WITH rp AS ( \
                UPDATE responsible_persons SET \
                name = $2, email = $3, phone = $4, department = $5, position = $6, faculty_id = $7, \
                is_active = $8, updated_at = NOW() \
                WHERE id = $1 RETURNING * \
             ) SELECT {} FROM rp LEFT JOIN faculties f ON rp.faculty_id = f.id",
            PERSON_COLUMNS
        );

        let result = self
            .db
            .timed(
                "responsible_persons.update",
                sqlx::query_as::<_, ResponsiblePerson>(&sql)
                    .bind(id)
                    .bind(&person.name)
                    .bind(&person.email)
                    .bind(&person.phone)
                    .bind(&person.department)
                    .bind(&person.position)
                    .bind(person.faculty_id)
                    .bind(person.is_active)
                    .fetch_optional(self.db.pool()),
            )
            .await;

        result
            .map_err(|err| write_error(err, &person.email))?
            .ok_or_else(not_found)
    }

    /// Soft delete: the row stays, marked inactive, so device links survive
    pub async fn deactivate(&self, id: i32) -> Result<(), DatabaseError> {
        let result = self
            .db
            .timed(
                "responsible_persons.deactivate",
                sqlx::query("UPDATE responsible_persons SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
                    .bind(id)
                    .execute(self.db.pool()),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        info!("Deactivated responsible person {}", id);
        Ok(())
    }
}

fn not_found() -> DatabaseError {
    DatabaseError::NotFound("Responsible person not found".to_string())
}

fn write_error(err: DatabaseError, email: &str) -> DatabaseError {
    if err.is_unique_violation() {
        DatabaseError::Conflict(format!("Responsible person with email {} already exists", email))
    } else if err.is_foreign_key_violation() {
        DatabaseError::InvalidReference("Faculty does not exist".to_string())
    } else {
        err
    }
}
