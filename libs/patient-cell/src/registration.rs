use tracing::{info, warn};

use shared_models::{Gender, Patient, PatientCreate};
use vitals_cell::{FormError, RiskResultView, VitalsForm, VitalsService};

use crate::models::RegistrationStep;
use crate::services::PatientService;

/// First wizard step: who the patient is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentityForm {
    pub name: String,
    pub age: String,
    pub gender: Option<Gender>,
    pub contact: String,
    pub medical_history: String,
}

impl IdentityForm {
    /// Name, age and gender must be present before moving on.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.age.trim().is_empty() && self.gender.is_some()
    }

    pub fn parse(&self) -> Result<PatientCreate, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::MissingField("Full Name".to_string()));
        }

        let raw_age = self.age.trim();
        if raw_age.is_empty() {
            return Err(FormError::MissingField("Age".to_string()));
        }
        let age = raw_age
            .parse::<u32>()
            .map_err(|_| FormError::InvalidNumber {
                field: "Age".to_string(),
                value: raw_age.to_string(),
            })?;

        let gender = self
            .gender
            .ok_or_else(|| FormError::MissingField("Gender".to_string()))?;

        Ok(PatientCreate {
            name: name.to_string(),
            age,
            gender,
            contact: optional(&self.contact),
            medical_history: optional(&self.medical_history),
        })
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Outcome of a completed registration.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub patient: Patient,
    pub result: RiskResultView,
}

/// Two-step intake: identity, then a first set of vitals. Submitting
/// creates the patient and then logs the reading against the new id.
#[derive(Debug, Clone)]
pub struct RegistrationWizard {
    step: RegistrationStep,
    pub identity: IdentityForm,
    pub vitals: VitalsForm,
    created: Option<Patient>,
    outcome: Option<Registration>,
    error: Option<String>,
}

impl Default for RegistrationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationWizard {
    pub fn new() -> Self {
        Self {
            step: RegistrationStep::Identity,
            identity: IdentityForm::default(),
            vitals: VitalsForm::new(),
            created: None,
            outcome: None,
            error: None,
        }
    }

    pub fn step(&self) -> RegistrationStep {
        self.step
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn outcome(&self) -> Option<&Registration> {
        self.outcome.as_ref()
    }

    /// Moves from identity to vitals once the identity step is filled in.
    pub fn next(&mut self) -> bool {
        if self.step == RegistrationStep::Identity && self.identity.is_complete() {
            self.step = RegistrationStep::Vitals;
            true
        } else {
            false
        }
    }

    pub fn back(&mut self) -> bool {
        if self.step == RegistrationStep::Vitals {
            self.step = RegistrationStep::Identity;
            true
        } else {
            false
        }
    }

    pub fn can_submit(&self) -> bool {
        self.step == RegistrationStep::Vitals && self.vitals.is_complete()
    }

    /// Both forms are validated before anything is sent. A failure after
    /// the patient was created is not rolled back; a retry reuses the
    /// created patient and only resends the reading.
    pub async fn submit(
        &mut self,
        patients: &PatientService,
        vitals: &VitalsService,
    ) -> Result<Registration, FormError> {
        self.error = None;

        let outcome = self.run(patients, vitals).await;
        match &outcome {
            Ok(registration) => {
                info!(
                    "Registered patient {} with first reading {}",
                    registration.patient.id, registration.result.record.id
                );
                self.outcome = Some(registration.clone());
                self.step = RegistrationStep::Submitted;
            }
            Err(err) => {
                warn!("Patient registration failed: {}", err);
                self.error = Some(err.user_message());
            }
        }

        outcome
    }

    async fn run(
        &mut self,
        patients: &PatientService,
        vitals: &VitalsService,
    ) -> Result<Registration, FormError> {
        let request = self.identity.parse()?;
        let reading = self.vitals.parse()?;

        let patient = match &self.created {
            Some(patient) => patient.clone(),
            None => {
                let patient = patients.create_patient(&request).await?;
                self.created = Some(patient.clone());
                patient
            }
        };

        let record = vitals.submit(&patient.id, &reading).await?;
        let result = RiskResultView::new(record, Some(patient.name.clone()));

        Ok(Registration { patient, result })
    }

    /// Clears everything for the next intake.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use vitals_cell::VitalField;

    fn identity() -> IdentityForm {
        IdentityForm {
            name: "  Jane Smith ".to_string(),
            age: "42".to_string(),
            gender: Some(Gender::Female),
            contact: String::new(),
            medical_history: "Asthma".to_string(),
        }
    }

    #[test]
    fn next_requires_name_age_and_gender() {
        let mut wizard = RegistrationWizard::new();
        assert!(!wizard.next());

        wizard.identity = IdentityForm {
            gender: None,
            ..identity()
        };
        assert!(!wizard.next());
        assert_eq!(wizard.step(), RegistrationStep::Identity);

        wizard.identity.gender = Some(Gender::Female);
        assert!(wizard.next());
        assert_eq!(wizard.step(), RegistrationStep::Vitals);

        assert!(wizard.back());
        assert_eq!(wizard.step(), RegistrationStep::Identity);
    }

    #[test]
    fn identity_parse_trims_and_drops_blank_optionals() {
        let request = identity().parse().unwrap();
        assert_eq!(request.name, "Jane Smith");
        assert_eq!(request.age, 42);
        assert_eq!(request.gender, Gender::Female);
        assert_eq!(request.contact, None);
        assert_eq!(request.medical_history.as_deref(), Some("Asthma"));
    }

    #[test]
    fn identity_parse_rejects_bad_age() {
        let form = IdentityForm {
            age: "forty".to_string(),
            ..identity()
        };
        assert_matches!(form.parse(), Err(FormError::InvalidNumber { field, .. }) if field == "Age");
    }

    #[test]
    fn submit_is_gated_on_complete_vitals() {
        let mut wizard = RegistrationWizard::new();
        wizard.identity = identity();
        wizard.next();
        assert!(!wizard.can_submit());

        for (field, value) in [
            (VitalField::HeartRate, "72"),
            (VitalField::Systolic, "120"),
            (VitalField::Diastolic, "80"),
            (VitalField::Temperature, "36.6"),
            (VitalField::OxygenSaturation, "98"),
        ] {
            wizard.vitals.set(field, value);
        }
        assert!(wizard.can_submit());
    }
}
