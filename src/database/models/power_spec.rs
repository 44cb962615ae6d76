use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Rated electrical characteristics shared by many meters
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PowerSpec {
    pub id: i32,
    pub rated_voltage: f64,
    pub rated_current: f64,
    pub rated_power: f64,
    pub power_phase: String,
    pub frequency: f64,
    pub accuracy: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPowerSpec {
    pub rated_voltage: f64,
    pub rated_current: f64,
    pub rated_power: f64,
    #[serde(default = "default_phase")]
    pub power_phase: String,
    #[serde(default = "default_frequency")]
    pub frequency: f64,
    pub accuracy: Option<String>,
}

pub const PHASES: [&str; 2] = ["single", "three"];

fn default_phase() -> String {
    "single".to_string()
}

fn default_frequency() -> f64 {
    50.0
}

impl NewPowerSpec {
    pub fn has_valid_phase(&self) -> bool {
        PHASES.contains(&self.power_phase.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_single_phase_at_50hz() {
        let spec: NewPowerSpec = serde_json::from_str(
            r#"{"rated_voltage":230,"rated_current":5,"rated_power":1150}"#,
        )
        .unwrap();
        assert_eq!(spec.power_phase, "single");
        assert_eq!(spec.frequency, 50.0);
        assert!(spec.has_valid_phase());
    }

    #[test]
    fn rejects_unknown_phase() {
        let spec: NewPowerSpec = serde_json::from_str(
            r#"{"rated_voltage":400,"rated_current":10,"rated_power":6900,"power_phase":"two"}"#,
        )
        .unwrap();
        assert!(!spec.has_valid_phase());
    }
}
