use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Risk bucket computed by the service. The storage layer uses
/// `low/medium/high` while the API answers `Low/Moderate/High`; both decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(alias = "low")]
    Low,
    #[serde(alias = "moderate", alias = "medium", alias = "Medium")]
    Moderate,
    #[serde(alias = "high")]
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalReading {
    pub heart_rate: f64,
    pub blood_pressure_systolic: f64,
    pub blood_pressure_diastolic: f64,
    pub temperature: f64,
    pub oxygen_saturation: f64,
}

/// Readings as stored on a history row. Older rows may miss any of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedReading {
    #[serde(default)]
    pub heart_rate: Option<f64>,
    #[serde(default)]
    pub blood_pressure_systolic: Option<f64>,
    #[serde(default)]
    pub blood_pressure_diastolic: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub oxygen_saturation: Option<f64>,
}

impl From<VitalReading> for RecordedReading {
    fn from(reading: VitalReading) -> Self {
        Self {
            heart_rate: Some(reading.heart_rate),
            blood_pressure_systolic: Some(reading.blood_pressure_systolic),
            blood_pressure_diastolic: Some(reading.blood_pressure_diastolic),
            temperature: Some(reading.temperature),
            oxygen_saturation: Some(reading.oxygen_saturation),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalRecord {
    pub id: String,
    pub patient_id: String,
    #[serde(flatten)]
    pub reading: RecordedReading,
    #[serde(default)]
    pub risk_score: Option<f64>,
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub alert_triggered: bool,
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
}
