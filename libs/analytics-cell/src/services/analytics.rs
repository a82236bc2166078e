use tracing::debug;

use shared_config::AppConfig;
use shared_http::{segment, ApiClient};
use shared_models::{AnalyticsResult, ApiError};

#[derive(Clone)]
pub struct AnalyticsService {
    api: ApiClient,
}

impl AnalyticsService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            api: ApiClient::new(config),
        }
    }

    pub fn with_client(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_analytics(&self, patient_id: &str) -> Result<AnalyticsResult, ApiError> {
        debug!("Fetching analytics for patient {}", patient_id);

        let path = format!("/analytics/{}", segment(patient_id));
        self.api.get(&path).await
    }
}
