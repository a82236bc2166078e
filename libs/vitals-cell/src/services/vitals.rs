use tracing::debug;

use shared_config::AppConfig;
use shared_http::{segment, ApiClient};
use shared_models::{ApiError, VitalReading, VitalRecord};

/// Number of readings fetched when the caller does not ask for a bound.
pub const DEFAULT_HISTORY_LIMIT: u32 = 30;

#[derive(Clone)]
pub struct VitalsService {
    api: ApiClient,
}

impl VitalsService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            api: ApiClient::new(config),
        }
    }

    pub fn with_client(api: ApiClient) -> Self {
        Self { api }
    }

    /// Newest-first history for a patient, at most `limit` entries.
    pub async fn history(&self, patient_id: &str, limit: u32) -> Result<Vec<VitalRecord>, ApiError> {
        debug!("Fetching up to {} vitals for patient {}", limit, patient_id);

        let path = format!("/vitals/{}?limit={}", segment(patient_id), limit);
        self.api.get(&path).await
    }

    /// Submits a reading; the service answers with the stored record plus its
    /// computed risk fields, recommendations and alert flag.
    pub async fn submit(&self, patient_id: &str, reading: &VitalReading) -> Result<VitalRecord, ApiError> {
        debug!("Submitting vitals for patient {}", patient_id);

        let path = format!("/vitals/{}", segment(patient_id));
        let record: VitalRecord = self.api.post(&path, reading).await?;

        debug!(
            "Vitals stored with ID: {} (risk level {:?}, alert triggered: {})",
            record.id, record.risk_level, record.alert_triggered
        );

        Ok(record)
    }
}
