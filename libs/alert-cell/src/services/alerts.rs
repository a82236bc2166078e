use async_trait::async_trait;
use tracing::debug;

use shared_config::AppConfig;
use shared_http::{segment, ApiClient};
use shared_models::{Alert, ApiError};

use crate::models::{AlertFilter, FeedScope};

/// Default size of the clinician-wide feed when no bound is given.
pub const DEFAULT_FEED_LIMIT: u32 = 50;

/// Where the alert feed gets its data from.
#[async_trait]
pub trait AlertSource: Send + Sync {
    async fn fetch(&self, scope: &FeedScope, filter: AlertFilter) -> Result<Vec<Alert>, ApiError>;

    async fn acknowledge(&self, alert_id: &str) -> Result<Alert, ApiError>;
}

#[derive(Clone)]
pub struct AlertService {
    api: ApiClient,
}

impl AlertService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            api: ApiClient::new(config),
        }
    }

    pub fn with_client(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn patient_alerts(
        &self,
        patient_id: &str,
        unacknowledged_only: bool,
    ) -> Result<Vec<Alert>, ApiError> {
        debug!(
            "Fetching alerts for patient {} (unacknowledged only: {})",
            patient_id, unacknowledged_only
        );

        let path = format!(
            "/alerts/{}?unacknowledged_only={}",
            segment(patient_id),
            unacknowledged_only
        );
        self.api.get(&path).await
    }

    pub async fn all_alerts(&self, limit: u32) -> Result<Vec<Alert>, ApiError> {
        debug!("Fetching latest {} alerts", limit);

        let path = format!("/alerts/?limit={}", limit);
        self.api.get(&path).await
    }

    /// Marks an alert acknowledged. Acknowledging an already acknowledged
    /// alert succeeds the same way.
    pub async fn acknowledge_alert(&self, alert_id: &str) -> Result<Alert, ApiError> {
        debug!("Acknowledging alert {}", alert_id);

        let path = format!("/alerts/{}/acknowledge", segment(alert_id));
        self.api.patch::<Alert, ()>(&path, None).await
    }
}

#[async_trait]
impl AlertSource for AlertService {
    async fn fetch(&self, scope: &FeedScope, filter: AlertFilter) -> Result<Vec<Alert>, ApiError> {
        match scope {
            FeedScope::Global { limit } => self.all_alerts(*limit).await,
            FeedScope::Patient { patient_id } => {
                self.patient_alerts(patient_id, filter == AlertFilter::Unacknowledged)
                    .await
            }
        }
    }

    async fn acknowledge(&self, alert_id: &str) -> Result<Alert, ApiError> {
        self.acknowledge_alert(alert_id).await
    }
}
