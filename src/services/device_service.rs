use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::info;

use crate::database::models::{Device, DeviceData, DeviceInfo, DeviceUpdate, NewDevice, NewDeviceData};
use crate::database::{Database, DatabaseError};

const DEVICE_INFO_SELECT: &str = "SELECT \
    d.device_id, d.device_name, d.faculty_id, f.faculty_code, f.faculty_name, \
    m.name AS manufacturer_name, ps.power_phase, ps.rated_power, \
    d.responsible_person_id, rp.name AS responsible_person_name, \
    d.building, d.floor, d.room, d.status, d.is_enabled, \
    dd.network_status, dd.voltage, dd.current_amperage, dd.power_factor, dd.frequency, \
    dd.active_power, dd.total_energy, dd.device_temperature, dd.last_data_received, \
    d.created_at, d.updated_at \
    FROM devices d \
    LEFT JOIN faculties f ON d.faculty_id = f.id \
    LEFT JOIN manufacturers m ON d.manufacturer_id = m.id \
    LEFT JOIN power_specifications ps ON d.power_spec_id = ps.id \
    LEFT JOIN responsible_persons rp ON d.responsible_person_id = rp.id \
    LEFT JOIN devices_data dd ON d.device_id = dd.device_id";

const DEVICE_DATA_COLUMNS: &str = "device_id, network_status, voltage, current_amperage, active_power, \
    total_energy, frequency, power_factor, device_temperature, last_data_received, updated_at";

/// Counts derived from the device listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStats {
    pub total_devices: usize,
    pub active_devices: usize,
    pub online_devices: usize,
    pub offline_devices: usize,
    pub error_devices: usize,
    pub devices_by_faculty: BTreeMap<String, usize>,
    pub devices_by_phase: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceList {
    pub devices: Vec<DeviceInfo>,
    pub stats: DeviceStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceDetail {
    pub device: DeviceInfo,
    pub data: Option<DeviceData>,
}

/// Snapshot joined with its device, as read by the faculty grouping
#[derive(Debug, Clone, FromRow)]
pub struct FacultyReadingRow {
    pub device_id: String,
    pub device_name: String,
    pub faculty: Option<String>,
    pub network_status: String,
    pub voltage: Option<f64>,
    pub current_amperage: Option<f64>,
    pub active_power: Option<f64>,
    pub total_energy: Option<f64>,
    pub frequency: Option<f64>,
    pub power_factor: Option<f64>,
    pub device_temperature: Option<f64>,
    pub last_data_received: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EnergyReading {
    pub voltage: Option<f64>,
    pub current: Option<f64>,
    pub active_power: Option<f64>,
    pub total_energy: Option<f64>,
    pub frequency: Option<f64>,
    pub power_factor: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FacultyReading {
    pub device_id: String,
    pub energy_data: EnergyReading,
    pub temperature: Option<f64>,
    pub network_status: String,
    #[serde(rename = "lastUpdate")]
    pub last_update: Option<DateTime<Utc>>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataByFaculty {
    pub devices_by_faculty: BTreeMap<String, BTreeMap<String, FacultyReading>>,
    pub total_devices: usize,
    pub timestamp: DateTime<Utc>,
}

pub struct DeviceService {
    db: Database,
}

impl DeviceService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<DeviceList, DatabaseError> {
        let sql = format!("{} ORDER BY f.faculty_name NULLS LAST, d.device_name", DEVICE_INFO_SELECT);
        let devices = self
            .db
            .timed("devices.list", sqlx::query_as::<_, DeviceInfo>(&sql).fetch_all(self.db.pool()))
            .await?;

        let stats = compute_stats(&devices);
        Ok(DeviceList { devices, stats })
    }

    pub async fn get(&self, device_id: &str) -> Result<DeviceDetail, DatabaseError> {
        let sql = format!("{} WHERE d.device_id = $1", DEVICE_INFO_SELECT);
        let device_query = self.db.timed(
            "devices.get",
            sqlx::query_as::<_, DeviceInfo>(&sql)
                .bind(device_id)
                .fetch_optional(self.db.pool()),
        );

        let (device, data) = futures::try_join!(device_query, self.latest_data(device_id))?;
        let device = device.ok_or_else(|| DatabaseError::NotFound(format!("Device with ID {} not found", device_id)))?;

        Ok(DeviceDetail { device, data })
    }

    /// The single stored snapshot, `None` when the device never reported
    pub async fn latest_data(&self, device_id: &str) -> Result<Option<DeviceData>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM devices_data WHERE device_id = $1 ORDER BY updated_at DESC LIMIT 1",
            DEVICE_DATA_COLUMNS
        );
        self.db
            .timed(
                "devices_data.latest",
                sqlx::query_as::<_, DeviceData>(&sql)
                    .bind(device_id)
                    .fetch_optional(self.db.pool()),
            )
            .await
    }

    pub async fn data_by_faculty(&self) -> Result<DataByFaculty, DatabaseError> {
        let rows = self
            .db
            .timed(
                "devices_data.by_faculty",
                sqlx::query_as::<_, FacultyReadingRow>(
                    "SELECT dd.device_id, d.device_name, f.faculty_code AS faculty, dd.network_status, \
                     dd.voltage, dd.current_amperage, dd.active_power, dd.total_energy, dd.frequency, \
                     dd.power_factor, dd.device_temperature, dd.last_data_received, dd.updated_at \
                     FROM devices_data dd \
                     JOIN devices d ON dd.device_id = d.device_id \
                     LEFT JOIN faculties f ON d.faculty_id = f.id \
                     ORDER BY dd.last_data_received DESC NULLS LAST",
                )
                .fetch_all(self.db.pool()),
            )
            .await?;

        Ok(group_by_faculty(rows, Utc::now()))
    }

    pub async fn create(&self, device: &NewDevice) -> Result<Device, DatabaseError> {
        let result = self
            .db
            .timed(
                "devices.create",
                sqlx::query_as::<_, Device>(
                    "INSERT INTO devices \
                     (device_id, device_name, faculty_id, manufacturer_id, power_spec_id, responsible_person_id, \
                      building, floor, room, status) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
                )
                .bind(&device.device_id)
                .bind(&device.device_name)
                .bind(device.faculty_id)
                .bind(device.manufacturer_id)
                .bind(device.power_spec_id)
                .bind(device.responsible_person_id)
                .bind(&device.building)
                .bind(&device.floor)
                .bind(&device.room)
                .bind(&device.status)
                .fetch_one(self.db.pool()),
            )
            .await;

        match result {
            Ok(created) => {
                info!("Registered device {}", created.device_id);
                Ok(created)
            }
            Err(err) if err.is_unique_violation() => Err(DatabaseError::Conflict(format!(
                "Device with ID {} already exists",
                device.device_id
            ))),
            Err(err) if err.is_foreign_key_violation() => Err(invalid_reference()),
            Err(err) => Err(err),
        }
    }

    /// Replace the editable columns of an existing device
    pub async fn update(&self, device_id: &str, update: &DeviceUpdate) -> Result<Device, DatabaseError> {
        let result = self
            .db
            .timed(
                "devices.update",
                sqlx::query_as::<_, Device>(
                    "UPDATE devices SET \
                     device_name = $2, faculty_id = $3, manufacturer_id = $4, power_spec_id = $5, \
                     responsible_person_id = $6, building = $7, floor = $8, room = $9, status = $10, \
                     is_enabled = $11, updated_at = NOW() \
                     WHERE device_id = $1 RETURNING *",
                )
                .bind(device_id)
                .bind(&update.device_name)
                .bind(update.faculty_id)
                .bind(update.manufacturer_id)
                .bind(update.power_spec_id)
                .bind(update.responsible_person_id)
                .bind(&update.building)
                .bind(&update.floor)
                .bind(&update.room)
                .bind(&update.status)
                .bind(update.is_enabled)
                .fetch_optional(self.db.pool()),
            )
            .await;

        match result {
            Ok(Some(updated)) => {
                info!("Updated device {}", device_id);
                Ok(updated)
            }
            Ok(None) => Err(DatabaseError::NotFound(format!("Device with ID {} not found", device_id))),
            Err(err) if err.is_foreign_key_violation() => Err(invalid_reference()),
            Err(err) => Err(err),
        }
    }

    /// Removes the device; its snapshot goes with it
    pub async fn delete(&self, device_id: &str) -> Result<(), DatabaseError> {
        let result = self
            .db
            .timed(
                "devices.delete",
                sqlx::query("DELETE FROM devices WHERE device_id = $1")
                    .bind(device_id)
                    .execute(self.db.pool()),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Device with ID {} not found", device_id)));
        }
        info!("Deleted device {}", device_id);
        Ok(())
    }

    /// Replace the stored snapshot for a device
    pub async fn upsert_data(&self, device_id: &str, data: &NewDeviceData) -> Result<DeviceData, DatabaseError> {
        let sql = format!(
            "INSERT INTO devices_data \
             (device_id, network_status, voltage, current_amperage, active_power, total_energy, \
              frequency, power_factor, device_temperature, last_data_received, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), NOW()) \
             ON CONFLICT (device_id) DO UPDATE SET \
             network_status = EXCLUDED.network_status, voltage = EXCLUDED.voltage, \
             current_amperage = EXCLUDED.current_amperage, active_power = EXCLUDED.active_power, \
             total_energy = EXCLUDED.total_energy, frequency = EXCLUDED.frequency, \
             power_factor = EXCLUDED.power_factor, device_temperature = EXCLUDED.device_temperature, \
             last_data_received = NOW(), updated_at = NOW() \
             RETURNING {}",
            DEVICE_DATA_COLUMNS
        );

        let result = self
            .db
            .timed(
                "devices_data.upsert",
                sqlx::query_as::<_, DeviceData>(&sql)
                    .bind(device_id)
                    .bind(&data.network_status)
                    .bind(data.voltage)
                    .bind(data.current_amperage)
                    .bind(data.active_power)
                    .bind(data.total_energy)
                    .bind(data.frequency)
                    .bind(data.power_factor)
                    .bind(data.device_temperature)
                    .fetch_one(self.db.pool()),
            )
            .await;

        match result {
            Err(err) if err.is_foreign_key_violation() => {
                Err(DatabaseError::NotFound(format!("Device with ID {} not found", device_id)))
            }
            other => other,
        }
    }
}

fn invalid_reference() -> DatabaseError {
    DatabaseError::InvalidReference(
        "Faculty, manufacturer, power specification or responsible person does not exist".to_string(),
    )
}

pub fn compute_stats(devices: &[DeviceInfo]) -> DeviceStats {
    let mut stats = DeviceStats {
        total_devices: devices.len(),
        ..DeviceStats::default()
    };

    for device in devices {
        if device.status == "active" {
            stats.active_devices += 1;
        }
        match device.network_status.as_deref() {
            Some("online") => stats.online_devices += 1,
            Some("offline") => stats.offline_devices += 1,
            Some("error") => stats.error_devices += 1,
            _ => {}
        }
        if let Some(faculty) = &device.faculty_name {
            *stats.devices_by_faculty.entry(faculty.clone()).or_default() += 1;
        }
        if let Some(phase) = &device.power_phase {
            *stats.devices_by_phase.entry(phase.clone()).or_default() += 1;
        }
    }

    stats
}

/// Faculty code, then device name (or id), to the latest reading
pub fn group_by_faculty(rows: Vec<FacultyReadingRow>, now: DateTime<Utc>) -> DataByFaculty {
    let total_devices = rows.len();
    let mut devices_by_faculty: BTreeMap<String, BTreeMap<String, FacultyReading>> = BTreeMap::new();

    for row in rows {
        let faculty = row.faculty.clone().unwrap_or_else(|| "unknown".to_string());
        let key = if row.device_name.is_empty() {
            row.device_id.clone()
        } else {
            row.device_name.clone()
        };

        let reading = FacultyReading {
            device_id: row.device_id,
            energy_data: EnergyReading {
                voltage: row.voltage,
                current: row.current_amperage,
                active_power: row.active_power,
                total_energy: row.total_energy,
                frequency: row.frequency,
                power_factor: row.power_factor,
            },
            temperature: row.device_temperature,
            network_status: row.network_status,
            last_update: row.last_data_received,
            timestamp: row.updated_at,
        };
        devices_by_faculty.entry(faculty).or_default().insert(key, reading);
    }

    DataByFaculty {
        devices_by_faculty,
        total_devices,
        timestamp: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(id: &str, faculty: Option<&str>, phase: Option<&str>, network: Option<&str>, status: &str) -> DeviceInfo {
        let now = Utc::now();
        DeviceInfo {
            device_id: id.to_string(),
            device_name: format!("Meter {}", id),
            faculty_id: None,
            faculty_code: None,
            faculty_name: faculty.map(str::to_string),
            manufacturer_name: None,
            power_phase: phase.map(str::to_string),
            rated_power: None,
            responsible_person_id: None,
            responsible_person_name: None,
            building: None,
            floor: None,
            room: None,
            status: status.to_string(),
            is_enabled: true,
            network_status: network.map(str::to_string),
            voltage: None,
            current_amperage: None,
            power_factor: None,
            frequency: None,
            active_power: None,
            total_energy: None,
            device_temperature: None,
            last_data_received: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn stats_count_by_status_faculty_and_phase() {
        let devices = vec![
            device("a", Some("Engineering"), Some("three"), Some("online"), "active"),
            device("b", Some("Engineering"), Some("single"), Some("offline"), "active"),
            device("c", Some("Architecture"), None, Some("error"), "maintenance"),
            device("d", None, Some("single"), None, "active"),
        ];

        let stats = compute_stats(&devices);
        assert_eq!(stats.total_devices, 4);
        assert_eq!(stats.active_devices, 3);
        assert_eq!(stats.online_devices, 1);
        assert_eq!(stats.offline_devices, 1);
        assert_eq!(stats.error_devices, 1);
        assert_eq!(stats.devices_by_faculty["Engineering"], 2);
        assert_eq!(stats.devices_by_phase["single"], 2);
    }

    #[test]
    fn empty_listing_has_zero_stats() {
        let stats = compute_stats(&[]);
        assert_eq!(stats, DeviceStats::default());
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["totalDevices"], 0);
    }

    #[test]
    fn groups_readings_under_faculty() {
        let now = Utc::now();
        let row = |id: &str, name: &str, faculty: Option<&str>| FacultyReadingRow {
            device_id: id.to_string(),
            device_name: name.to_string(),
            faculty: faculty.map(str::to_string),
            network_status: "online".to_string(),
            voltage: Some(230.1),
            current_amperage: Some(4.2),
            active_power: None,
            total_energy: None,
            frequency: Some(50.0),
            power_factor: None,
            device_temperature: Some(31.5),
            last_data_received: Some(now),
            updated_at: now,
        };

        let grouped = group_by_faculty(
            vec![
                row("pm-1", "Main panel", Some("engineering")),
                row("pm-2", "", Some("engineering")),
                row("pm-3", "Library", None),
            ],
            now,
        );

        assert_eq!(grouped.total_devices, 3);
        let engineering = &grouped.devices_by_faculty["engineering"];
        assert_eq!(engineering.len(), 2);
        assert!(engineering.contains_key("pm-2"));
        assert_eq!(engineering["Main panel"].energy_data.current, Some(4.2));
        assert!(grouped.devices_by_faculty["unknown"].contains_key("Library"));

        let value = serde_json::to_value(&grouped).unwrap();
        assert!(value["devicesByFaculty"]["engineering"]["Main panel"]["energy_data"].is_object());
        assert!(value["devicesByFaculty"]["engineering"]["Main panel"]["lastUpdate"].is_string());
    }
}
