use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Two-level severity as surfaced by the alerts API. Storage-level labels
/// (`low`, `medium`, `high`) fold into `Warning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AlertSeverity {
    Warning,
    Critical,
}

impl AlertSeverity {
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("critical") {
            AlertSeverity::Critical
        } else {
            AlertSeverity::Warning
        }
    }
}

impl<'de> Deserialize<'de> for AlertSeverity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label
            .as_deref()
            .map(AlertSeverity::from_label)
            .unwrap_or(AlertSeverity::Warning))
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertSeverity::Warning => f.write_str("Warning"),
            AlertSeverity::Critical => f.write_str("Critical"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AlertWire")]
pub struct Alert {
    pub id: String,
    pub patient_id: String,
    pub vital_reading_id: Option<String>,
    pub alert_type: Option<String>,
    pub message: String,
    pub severity: AlertSeverity,
    pub acknowledged: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub patient_name: Option<String>,
}

#[derive(Deserialize)]
struct JoinedPatient {
    name: Option<String>,
}

// Accepts both the API's field names and the storage column names.
#[derive(Deserialize)]
struct AlertWire {
    id: String,
    patient_id: String,
    #[serde(default)]
    vital_reading_id: Option<String>,
    #[serde(default)]
    vital_id: Option<String>,
    #[serde(default)]
    alert_type: Option<String>,
    message: String,
    #[serde(default = "default_severity")]
    severity: AlertSeverity,
    #[serde(default)]
    acknowledged: Option<bool>,
    #[serde(default)]
    is_acknowledged: Option<bool>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    patient_name: Option<String>,
    #[serde(default)]
    patients: Option<JoinedPatient>,
}

fn default_severity() -> AlertSeverity {
    AlertSeverity::Warning
}

impl From<AlertWire> for Alert {
    fn from(wire: AlertWire) -> Self {
        Self {
            id: wire.id,
            patient_id: wire.patient_id,
            vital_reading_id: wire.vital_reading_id.or(wire.vital_id),
            alert_type: wire.alert_type,
            message: wire.message,
            severity: wire.severity,
            acknowledged: wire.acknowledged.or(wire.is_acknowledged).unwrap_or(false),
            created_at: wire.created_at,
            patient_name: wire
                .patient_name
                .or_else(|| wire.patients.and_then(|p| p.name)),
        }
    }
}
