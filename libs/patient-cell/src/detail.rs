use tracing::{debug, info, warn};

use alert_cell::{AlertFeed, AlertFilter, AlertService, FeedScope};
use shared_config::AppConfig;
use shared_http::ApiClient;
use shared_models::{Alert, ApiError, Patient, PatientUpdate, VitalRecord};
use vitals_cell::{FormError, RiskResultView, VitalsForm, VitalsService, DEFAULT_HISTORY_LIMIT};

use crate::services::PatientService;

/// Services the detail view talks to. They share one HTTP client.
#[derive(Clone)]
pub struct DetailServices {
    pub patients: PatientService,
    pub vitals: VitalsService,
    pub alerts: AlertService,
}

impl DetailServices {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(ApiClient::new(config))
    }

    pub fn with_client(api: ApiClient) -> Self {
        Self {
            patients: PatientService::with_client(api.clone()),
            vitals: VitalsService::with_client(api.clone()),
            alerts: AlertService::with_client(api),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Ready,
    /// Any load failure collapses into this state, carrying the reason.
    NotFound(String),
    Deleted,
}

/// Everything shown for a single patient: profile, reading history and
/// the patient's alerts.
pub struct PatientDetail {
    patient_id: String,
    services: DetailServices,
    state: DetailState,
    patient: Option<Patient>,
    history: Vec<VitalRecord>,
    alerts: AlertFeed,
    action_error: Option<String>,
}

impl PatientDetail {
    pub fn new(patient_id: impl Into<String>, services: DetailServices) -> Self {
        let patient_id = patient_id.into();
        let alerts = AlertFeed::new(
            FeedScope::Patient {
                patient_id: patient_id.clone(),
            },
            AlertFilter::All,
        );

        Self {
            patient_id,
            services,
            state: DetailState::Loading,
            patient: None,
            history: Vec::new(),
            alerts,
            action_error: None,
        }
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn patient(&self) -> Option<&Patient> {
        self.patient.as_ref()
    }

    /// Newest first, as the service returns it.
    pub fn history(&self) -> &[VitalRecord] {
        &self.history
    }

    pub fn latest_reading(&self) -> Option<&VitalRecord> {
        self.history.first()
    }

    pub fn alerts(&self) -> &[Alert] {
        self.alerts.alerts()
    }

    pub fn unacknowledged_count(&self) -> usize {
        self.alerts.unacknowledged_count()
    }

    pub fn is_acknowledging(&self, alert_id: &str) -> bool {
        self.alerts.is_acknowledging(alert_id)
    }

    /// Error from the last edit, delete or vitals submission.
    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    /// Fetches profile, history and alerts concurrently. If any of the three
    /// fails the whole view falls back to [`DetailState::NotFound`].
    pub async fn load(&mut self) {
        self.state = DetailState::Loading;
        debug!("Loading detail view for patient {}", self.patient_id);

        let id = self.patient_id.as_str();
        let result = tokio::try_join!(
            self.services.patients.get_patient(id),
            self.services.vitals.history(id, DEFAULT_HISTORY_LIMIT),
            self.services.alerts.patient_alerts(id, false),
        );

        match result {
            Ok((patient, history, alerts)) => {
                self.patient = Some(patient);
                self.history = history;
                self.alerts.apply_fetch(Ok(alerts));
                self.state = DetailState::Ready;
            }
            Err(err) => {
                warn!("Failed to load patient {}: {}", self.patient_id, err);
                self.state = DetailState::NotFound(err.user_message());
            }
        }
    }

    /// Sends the changed fields and replaces the local profile with the
    /// service's answer.
    pub async fn update(&mut self, update: &PatientUpdate) -> Result<(), ApiError> {
        self.action_error = None;

        match self
            .services
            .patients
            .update_patient(&self.patient_id, update)
            .await
        {
            Ok(patient) => {
                info!("Patient {} updated", patient.id);
                self.patient = Some(patient);
                Ok(())
            }
            Err(err) => {
                self.action_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn delete(&mut self) -> Result<(), ApiError> {
        self.action_error = None;

        match self.services.patients.delete_patient(&self.patient_id).await {
            Ok(()) => {
                self.patient = None;
                self.history.clear();
                self.alerts.apply_fetch(Ok(Vec::new()));
                self.state = DetailState::Deleted;
                Ok(())
            }
            Err(err) => {
                self.action_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Logs a new reading. The scored record goes to the top of the history;
    /// when it raised an alert the alert list is refetched.
    pub async fn submit_vitals(&mut self, form: &mut VitalsForm) -> Result<RiskResultView, FormError> {
        self.action_error = None;

        let mut view = match form.submit(&self.services.vitals, &self.patient_id).await {
            Ok(view) => view,
            Err(err) => {
                self.action_error = Some(err.user_message());
                return Err(err);
            }
        };
        view.patient_name = self.patient.as_ref().map(|p| p.name.clone());

        self.history.insert(0, view.record.clone());

        if view.alert_triggered() {
            info!("Reading for patient {} triggered an alert", self.patient_id);
            self.refresh_alerts().await;
        }

        Ok(view)
    }

    pub async fn refresh_alerts(&mut self) {
        let result = self
            .services
            .alerts
            .patient_alerts(&self.patient_id, false)
            .await;
        self.alerts.apply_fetch(result);
    }

    /// Acknowledges one of this patient's alerts. A failed call is logged
    /// and otherwise ignored. Returns `false` if there was nothing to do.
    pub async fn acknowledge(&mut self, alert_id: &str) -> bool {
        if !self.alerts.begin_acknowledge(alert_id) {
            return false;
        }

        let result = self.services.alerts.acknowledge_alert(alert_id).await;
        self.alerts.finish_acknowledge(alert_id, result);
        true
    }
}
