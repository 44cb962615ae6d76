use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::{Database, DatabaseError};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_users: i64,
    pub total_devices: i64,
    pub online_devices: i64,
    /// Sum of the latest cumulative energy reading of every device, in kWh
    pub total_energy: f64,
    pub system_status: &'static str,
    pub last_update: DateTime<Utc>,
}

pub struct DashboardService {
    db: Database,
}

impl DashboardService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn summary(&self) -> Result<DashboardSummary, DatabaseError> {
        let users = self.db.timed(
            "dashboard.users",
            sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM users WHERE is_active = true")
                .fetch_one(self.db.pool()),
        );
        let devices = self.db.timed(
            "dashboard.devices",
            sqlx::query_as::<_, (i64, i64, f64)>(
                "SELECT COUNT(*), \
                 COUNT(*) FILTER (WHERE dd.network_status = 'online'), \
                 COALESCE(SUM(dd.total_energy), 0)::DOUBLE PRECISION \
                 FROM devices d LEFT JOIN devices_data dd ON d.device_id = dd.device_id",
            )
            .fetch_one(self.db.pool()),
        );

        let ((total_users,), (total_devices, online_devices, total_energy)) = futures::try_join!(users, devices)?;

        Ok(DashboardSummary {
            total_users,
            total_devices,
            online_devices,
            total_energy,
            system_status: "active",
            last_update: Utc::now(),
        })
    }
}
