use std::fmt;

use serde::{Deserialize, Serialize};

use crate::vitals::RiskLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Improving,
    Stable,
    Worsening,
    #[serde(rename = "Insufficient data")]
    InsufficientData,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrendDirection::Improving => "Improving",
            TrendDirection::Stable => "Stable",
            TrendDirection::Worsening => "Worsening",
            TrendDirection::InsufficientData => "Insufficient data",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskDistribution {
    #[serde(alias = "Low", default)]
    pub low: u32,
    #[serde(alias = "Moderate", alias = "medium", default)]
    pub moderate: u32,
    #[serde(alias = "High", default)]
    pub high: u32,
}

impl RiskDistribution {
    pub fn total(&self) -> u32 {
        self.low + self.moderate + self.high
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalAverages {
    #[serde(default)]
    pub blood_pressure_systolic: Option<f64>,
    #[serde(default)]
    pub blood_pressure_diastolic: Option<f64>,
    #[serde(default)]
    pub heart_rate: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub oxygen_saturation: Option<f64>,
    #[serde(default)]
    pub risk_score: Option<f64>,
}

/// Server-computed aggregate; rendered as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsResult {
    pub patient_id: String,
    pub total_readings: u32,
    #[serde(default)]
    pub risk_distribution: RiskDistribution,
    #[serde(default)]
    pub averages: VitalAverages,
    #[serde(default)]
    pub deteriorating: bool,
    pub trend_direction: TrendDirection,
    #[serde(default)]
    pub latest_risk_level: Option<RiskLevel>,
}
