use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of the `devices` registry
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Device {
    pub device_id: String,
    pub device_name: String,
    pub faculty_id: Option<i32>,
    pub manufacturer_id: Option<i32>,
    pub power_spec_id: Option<i32>,
    pub responsible_person_id: Option<i32>,
    pub building: Option<String>,
    pub floor: Option<String>,
    pub room: Option<String>,
    pub status: String,
    pub is_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The single latest telemetry snapshot of a device
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DeviceData {
    pub device_id: String,
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

/// Device joined with its reference data and latest snapshot
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeviceInfo {
    pub device_id: String,
    pub device_name: String,
    pub faculty_id: Option<i32>,
    pub faculty_code: Option<String>,
    pub faculty_name: Option<String>,
    pub manufacturer_name: Option<String>,
    pub power_phase: Option<String>,
    pub rated_power: Option<f64>,
    pub responsible_person_id: Option<i32>,
    pub responsible_person_name: Option<String>,
    pub building: Option<String>,
    pub floor: Option<String>,
    pub room: Option<String>,
    pub status: String,
    pub is_enabled: bool,
    pub network_status: Option<String>,
    pub voltage: Option<f64>,
    pub current_amperage: Option<f64>,
    pub power_factor: Option<f64>,
    pub frequency: Option<f64>,
    pub active_power: Option<f64>,
    pub total_energy: Option<f64>,
    pub device_temperature: Option<f64>,
    pub last_data_received: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDevice {
    pub device_id: String,
    pub device_name: String,
    pub faculty_id: Option<i32>,
    pub manufacturer_id: Option<i32>,
    pub power_spec_id: Option<i32>,
    pub responsible_person_id: Option<i32>,
    pub building: Option<String>,
    pub floor: Option<String>,
    pub room: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
}

/// Full replacement of a device's editable columns; the id never changes
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceUpdate {
    pub device_name: String,
    pub faculty_id: Option<i32>,
    pub manufacturer_id: Option<i32>,
    pub power_spec_id: Option<i32>,
    pub responsible_person_id: Option<i32>,
    pub building: Option<String>,
    pub floor: Option<String>,
    pub room: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
}

/// Body of a snapshot write; absent readings are stored as NULL
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewDeviceData {
    #[serde(default = "default_network_status")]
    pub network_status: String,
    pub voltage: Option<f64>,
    pub current_amperage: Option<f64>,
    pub active_power: Option<f64>,
    pub total_energy: Option<f64>,
    pub frequency: Option<f64>,
    pub power_factor: Option<f64>,
    pub device_temperature: Option<f64>,
}

pub const NETWORK_STATUSES: [&str; 3] = ["online", "offline", "error"];

fn default_status() -> String {
    "active".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_network_status() -> String {
    "online".to_string()
}

impl NewDeviceData {
    pub fn has_valid_network_status(&self) -> bool {
        NETWORK_STATUSES.contains(&self.network_status.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_body_defaults_to_online() {
        let data: NewDeviceData = serde_json::from_str(r#"{"voltage":229.8}"#).unwrap();
        assert_eq!(data.network_status, "online");
        assert_eq!(data.voltage, Some(229.8));
        assert!(data.active_power.is_none());
        assert!(data.has_valid_network_status());
    }

    #[test]
    fn new_device_defaults_to_active() {
        let device: NewDevice =
            serde_json::from_str(r#"{"device_id":"pm-eng-001","device_name":"Main panel"}"#).unwrap();
        assert_eq!(device.status, "active");
        assert!(device.faculty_id.is_none());
    }

    #[test]
    fn update_keeps_device_enabled_unless_told() {
        let update: DeviceUpdate =
            serde_json::from_str(r#"{"device_name":"Main panel","status":"maintenance","responsible_person_id":3}"#)
                .unwrap();
        assert!(update.is_enabled);
        assert_eq!(update.status, "maintenance");
        assert_eq!(update.responsible_person_id, Some(3));
    }
}
