pub mod alert;
pub mod analytics;
pub mod assistant;
pub mod error;
pub mod patient;
pub mod vitals;

pub use alert::{Alert, AlertSeverity};
pub use analytics::{AnalyticsResult, RiskDistribution, TrendDirection, VitalAverages};
pub use assistant::{AssistantResponse, ChatRequest};
pub use error::ApiError;
pub use patient::{Gender, Patient, PatientCreate, PatientUpdate};
pub use vitals::{RecordedReading, RiskLevel, VitalReading, VitalRecord};
