use crate::database::models::{NewPowerSpec, PowerSpec};
use crate::database::{Database, DatabaseError};

pub struct PowerSpecService {
    db: Database,
}

impl PowerSpecService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<PowerSpec>, DatabaseError> {
        self.db
            .timed(
                "power_specifications.list",
                sqlx::query_as::<_, PowerSpec>(
                    "SELECT id, rated_voltage, rated_current, rated_power, power_phase, frequency, accuracy, created_at \
                     FROM power_specifications ORDER BY rated_power ASC, power_phase ASC",
                )
                .fetch_all(self.db.pool()),
            )
            .await
    }

    pub async fn create(&self, spec: &NewPowerSpec) -> Result<PowerSpec, DatabaseError> {
        let result = self
            .db
            .timed(
                "power_specifications.create",
                sqlx::query_as::<_, PowerSpec>(
                    "INSERT INTO power_specifications \
                     (rated_voltage, rated_current, rated_power, power_phase, frequency, accuracy) \
                     VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
                )
                .bind(spec.rated_voltage)
                .bind(spec.rated_current)
                .bind(spec.rated_power)
                .bind(&spec.power_phase)
                .bind(spec.frequency)
                .bind(&spec.accuracy)
                .fetch_one(self.db.pool()),
            )
            .await;

        match result {
            Err(err) if err.is_unique_violation() => Err(DatabaseError::Conflict(
                "An identical power specification already exists".to_string(),
            )),
            other => other,
        }
    }

    /// Insert unless an identical rating already exists; returns the stored row either way
    pub async fn upsert(&self, spec: &NewPowerSpec) -> Result<PowerSpec, DatabaseError> {
        self.db
            .timed(
                "power_specifications.upsert",
                sqlx::query_as::<_, PowerSpec>(
                    "INSERT INTO power_specifications \
                     (rated_voltage, rated_current, rated_power, power_phase, frequency, accuracy) \
                     VALUES ($1, $2, $3, $4, $5, $6) \
                     ON CONFLICT (rated_voltage, rated_current, rated_power, power_phase) \
                     DO UPDATE SET frequency = EXCLUDED.frequency, accuracy = EXCLUDED.accuracy \
                     RETURNING *",
                )
                .bind(spec.rated_voltage)
                .bind(spec.rated_current)
                .bind(spec.rated_power)
                .bind(&spec.power_phase)
                .bind(spec.frequency)
                .bind(&spec.accuracy)
                .fetch_one(self.db.pool()),
            )
            .await
    }

    pub async fn delete(&self, id: i32) -> Result<(), DatabaseError> {
        let result = self
            .db
            .timed(
                "power_specifications.delete",
                sqlx::query("DELETE FROM power_specifications WHERE id = $1")
                    .bind(id)
                    .execute(self.db.pool()),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Power specification not found".to_string()));
        }
        Ok(())
    }
}
