use tracing::{debug, warn};

use alert_cell::{AlertFeed, AlertFilter, AlertService, FeedScope};
use patient_cell::PatientService;
use shared_config::AppConfig;
use shared_http::ApiClient;
use shared_models::{Alert, AnalyticsResult, ApiError, Patient, RiskLevel, VitalRecord};
use vitals_cell::VitalsService;

use crate::models::{ANALYTICS_LOAD_ERROR, DASHBOARD_VITALS_LIMIT};
use crate::services::AnalyticsService;

/// A patient's own view: profile, recent readings, open alerts and, when
/// asked for, the analytics aggregate.
pub struct PatientDashboard {
    patient_id: String,
    patients: PatientService,
    vitals: VitalsService,
    alert_service: AlertService,
    analytics_service: AnalyticsService,
    patient: Option<Patient>,
    recent: Vec<VitalRecord>,
    alerts: AlertFeed,
    analytics: Option<AnalyticsResult>,
    analytics_error: Option<String>,
}

impl PatientDashboard {
    pub fn new(patient_id: impl Into<String>, config: &AppConfig) -> Self {
        Self::with_client(patient_id, ApiClient::new(config))
    }

    pub fn with_client(patient_id: impl Into<String>, api: ApiClient) -> Self {
        let patient_id = patient_id.into();
        let alerts = AlertFeed::new(
            FeedScope::Patient {
                patient_id: patient_id.clone(),
            },
            AlertFilter::Unacknowledged,
        );

        Self {
            patient_id,
            patients: PatientService::with_client(api.clone()),
            vitals: VitalsService::with_client(api.clone()),
            alert_service: AlertService::with_client(api.clone()),
            analytics_service: AnalyticsService::with_client(api),
            patient: None,
            recent: Vec::new(),
            alerts,
            analytics: None,
            analytics_error: None,
        }
    }

    pub fn patient(&self) -> Option<&Patient> {
        self.patient.as_ref()
    }

    pub fn recent_vitals(&self) -> &[VitalRecord] {
        &self.recent
    }

    pub fn latest_reading(&self) -> Option<&VitalRecord> {
        self.recent.first()
    }

    /// Risk level of the latest reading, `Low` when there is none.
    pub fn current_risk(&self) -> RiskLevel {
        self.latest_reading()
            .and_then(|r| r.risk_level)
            .unwrap_or(RiskLevel::Low)
    }

    pub fn open_alerts(&self) -> &[Alert] {
        self.alerts.alerts()
    }

    pub fn is_acknowledging(&self, alert_id: &str) -> bool {
        self.alerts.is_acknowledging(alert_id)
    }

    pub fn analytics(&self) -> Option<&AnalyticsResult> {
        self.analytics.as_ref()
    }

    pub fn analytics_error(&self) -> Option<&str> {
        self.analytics_error.as_deref()
    }

    /// Loads profile, the last few readings and open alerts together. On
    /// failure nothing is kept and the caller should leave the dashboard.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        debug!("Loading dashboard for patient {}", self.patient_id);

        let id = self.patient_id.as_str();
        let (patient, recent, alerts) = tokio::try_join!(
            self.patients.get_patient(id),
            self.vitals.history(id, DASHBOARD_VITALS_LIMIT),
            self.alert_service.patient_alerts(id, true),
        )?;

        self.patient = Some(patient);
        self.recent = recent;
        self.alerts.apply_fetch(Ok(alerts));
        Ok(())
    }

    pub async fn load_analytics(&mut self) {
        match self.analytics_service.get_analytics(&self.patient_id).await {
            Ok(result) => {
                self.analytics = Some(result);
                self.analytics_error = None;
            }
            Err(err) => {
                warn!("Analytics for patient {} unavailable: {}", self.patient_id, err);
                self.analytics_error = Some(ANALYTICS_LOAD_ERROR.to_string());
            }
        }
    }

    /// Drops the alert from the open list straight away.
    pub async fn acknowledge(&mut self, alert_id: &str) -> bool {
        if !self.alerts.begin_acknowledge(alert_id) {
            return false;
        }

        let result = self.alert_service.acknowledge_alert(alert_id).await;
        self.alerts.finish_acknowledge(alert_id, result);
        true
    }
}
