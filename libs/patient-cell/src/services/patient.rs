use tracing::{debug, info};

use shared_config::AppConfig;
use shared_http::{segment, ApiClient};
use shared_models::{ApiError, Patient, PatientCreate, PatientUpdate};

#[derive(Clone)]
pub struct PatientService {
    api: ApiClient,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            api: ApiClient::new(config),
        }
    }

    pub fn with_client(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list_patients(&self) -> Result<Vec<Patient>, ApiError> {
        debug!("Fetching patient registry");

        self.api.get("/patients/").await
    }

    pub async fn get_patient(&self, patient_id: &str) -> Result<Patient, ApiError> {
        debug!("Fetching patient profile: {}", patient_id);

        let path = format!("/patients/{}", segment(patient_id));
        self.api.get(&path).await
    }

    pub async fn create_patient(&self, request: &PatientCreate) -> Result<Patient, ApiError> {
        debug!("Creating new patient profile for: {}", request.name);

        let patient: Patient = self.api.post("/patients/", request).await?;
        info!("Patient profile created successfully with ID: {}", patient.id);

        Ok(patient)
    }

    pub async fn update_patient(
        &self,
        patient_id: &str,
        request: &PatientUpdate,
    ) -> Result<Patient, ApiError> {
        debug!("Updating patient profile: {}", patient_id);

        let path = format!("/patients/{}", segment(patient_id));
        self.api.patch(&path, Some(request)).await
    }

    pub async fn delete_patient(&self, patient_id: &str) -> Result<(), ApiError> {
        debug!("Deleting patient profile: {}", patient_id);

        let path = format!("/patients/{}", segment(patient_id));
        self.api.delete(&path).await?;
        info!("Patient profile {} deleted", patient_id);

        Ok(())
    }
}
