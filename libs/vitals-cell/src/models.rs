use std::fmt;

use thiserror::Error;

use shared_models::{ApiError, RiskLevel, VitalRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VitalField {
    HeartRate,
    Systolic,
    Diastolic,
    Temperature,
    OxygenSaturation,
}

impl VitalField {
    pub const ALL: [VitalField; 5] = [
        VitalField::HeartRate,
        VitalField::Systolic,
        VitalField::Diastolic,
        VitalField::Temperature,
        VitalField::OxygenSaturation,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            VitalField::HeartRate => "Heart Rate (bpm)",
            VitalField::Systolic => "Systolic (mmHg)",
            VitalField::Diastolic => "Diastolic (mmHg)",
            VitalField::Temperature => "Temperature (°C)",
            VitalField::OxygenSaturation => "SpO2 (%)",
        }
    }

    /// Reference range shown next to the input.
    pub fn normal_range(&self) -> &'static str {
        match self {
            VitalField::HeartRate => "Normal: 60-100 bpm",
            VitalField::Systolic => "Normal: 90-120 mmHg",
            VitalField::Diastolic => "Normal: 60-80 mmHg",
            VitalField::Temperature => "Normal: 36.1-37.2 °C",
            VitalField::OxygenSaturation => "Normal: 95-100%",
        }
    }
}

impl fmt::Display for VitalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(String),

    #[error("{field} must be a number, got '{value}'")]
    InvalidNumber { field: String, value: String },

    #[error("{0}")]
    Api(#[from] ApiError),
}

impl FormError {
    /// Single message shown under the form.
    pub fn user_message(&self) -> String {
        match self {
            FormError::Api(err) => err.to_string(),
            other => other.to_string(),
        }
    }
}

/// Result screen for a freshly scored reading. Risk fields are shown as the
/// service returned them.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskResultView {
    pub record: VitalRecord,
    pub patient_name: Option<String>,
}

impl RiskResultView {
    pub fn new(record: VitalRecord, patient_name: Option<String>) -> Self {
        Self { record, patient_name }
    }

    pub fn level(&self) -> RiskLevel {
        self.record.risk_level.unwrap_or(RiskLevel::Low)
    }

    pub fn score(&self) -> f64 {
        self.record.risk_score.unwrap_or(0.0)
    }

    pub fn headline(&self) -> String {
        format!("{} Risk", self.level())
    }

    pub fn guidance(&self) -> &'static str {
        match self.level() {
            RiskLevel::High => "Your readings indicate elevated cardiovascular risk. Please review your recommendations carefully and consider seeking medical advice.",
            RiskLevel::Moderate => "Your readings show moderate risk. Lifestyle improvements like diet, exercise, and regular check-ups can help.",
            RiskLevel::Low => "Great news! Your readings are in a healthy range. Keep up your good habits and continue monitoring regularly.",
        }
    }

    pub fn recommendations(&self) -> &[String] {
        &self.record.recommendations
    }

    pub fn alert_triggered(&self) -> bool {
        self.record.alert_triggered
    }
}
