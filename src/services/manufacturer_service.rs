use crate::database::models::{Manufacturer, NewManufacturer};
use crate::database::{Database, DatabaseError};

pub struct ManufacturerService {
    db: Database,
}

impl ManufacturerService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<Manufacturer>, DatabaseError> {
        self.db
            .timed(
                "manufacturers.list",
                sqlx::query_as::<_, Manufacturer>(
                    "SELECT id, name, country, created_at FROM manufacturers ORDER BY name ASC",
                )
                .fetch_all(self.db.pool()),
            )
            .await
    }

    pub async fn create(&self, manufacturer: &NewManufacturer) -> Result<Manufacturer, DatabaseError> {
        let result = self
            .db
            .timed(
                "manufacturers.create",
                sqlx::query_as::<_, Manufacturer>(
                    "INSERT INTO manufacturers (name, country) VALUES ($1, $2) \
                     RETURNING id, name, country, created_at",
                )
                .bind(&manufacturer.name)
                .bind(&manufacturer.country)
                .fetch_one(self.db.pool()),
            )
            .await;

        match result {
            Err(err) if err.is_unique_violation() => Err(DatabaseError::Conflict(format!(
                "Manufacturer {} already exists",
                manufacturer.name
            ))),
            other => other,
        }
    }

    pub async fn upsert(&self, manufacturer: &NewManufacturer) -> Result<Manufacturer, DatabaseError> {
        self.db
            .timed(
                "manufacturers.upsert",
                sqlx::query_as::<_, Manufacturer>(
                    "INSERT INTO manufacturers (name, country) VALUES ($1, $2) \
                     ON CONFLICT (name) DO UPDATE SET country = EXCLUDED.country \
                     RETURNING id, name, country, created_at",
                )
                .bind(&manufacturer.name)
                .bind(&manufacturer.country)
                .fetch_one(self.db.pool()),
            )
            .await
    }

    pub async fn delete(&self, id: i32) -> Result<(), DatabaseError> {
        let result = self
            .db
            .timed(
                "manufacturers.delete",
                sqlx::query("DELETE FROM manufacturers WHERE id = $1")
                    .bind(id)
                    .execute(self.db.pool()),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Manufacturer not found".to_string()));
        }
        Ok(())
    }
}
