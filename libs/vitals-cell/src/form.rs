use tracing::warn;

use shared_models::VitalReading;

use crate::models::{FormError, RiskResultView, VitalField};
use crate::services::VitalsService;

/// The five vital-sign inputs, held as typed text until submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VitalsForm {
    pub heart_rate: String,
    pub blood_pressure_systolic: String,
    pub blood_pressure_diastolic: String,
    pub temperature: String,
    pub oxygen_saturation: String,
    error: Option<String>,
}

impl VitalsForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: VitalField, value: impl Into<String>) {
        *self.slot_mut(field) = value.into();
    }

    pub fn value(&self, field: VitalField) -> &str {
        match field {
            VitalField::HeartRate => &self.heart_rate,
            VitalField::Systolic => &self.blood_pressure_systolic,
            VitalField::Diastolic => &self.blood_pressure_diastolic,
            VitalField::Temperature => &self.temperature,
            VitalField::OxygenSaturation => &self.oxygen_saturation,
        }
    }

    fn slot_mut(&mut self, field: VitalField) -> &mut String {
        match field {
            VitalField::HeartRate => &mut self.heart_rate,
            VitalField::Systolic => &mut self.blood_pressure_systolic,
            VitalField::Diastolic => &mut self.blood_pressure_diastolic,
            VitalField::Temperature => &mut self.temperature,
            VitalField::OxygenSaturation => &mut self.oxygen_saturation,
        }
    }

    /// Presence check only; ranges are judged by the service.
    pub fn is_complete(&self) -> bool {
        VitalField::ALL
            .iter()
            .all(|field| !self.value(*field).trim().is_empty())
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn parse(&self) -> Result<VitalReading, FormError> {
        Ok(VitalReading {
            heart_rate: self.number(VitalField::HeartRate)?,
            blood_pressure_systolic: self.number(VitalField::Systolic)?,
            blood_pressure_diastolic: self.number(VitalField::Diastolic)?,
            temperature: self.number(VitalField::Temperature)?,
            oxygen_saturation: self.number(VitalField::OxygenSaturation)?,
        })
    }

    fn number(&self, field: VitalField) -> Result<f64, FormError> {
        let raw = self.value(field).trim();
        if raw.is_empty() {
            return Err(FormError::MissingField(field.label().to_string()));
        }
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| FormError::InvalidNumber {
                field: field.label().to_string(),
                value: raw.to_string(),
            })
    }

    /// Logs a reading for an existing patient.
    pub async fn submit(
        &mut self,
        service: &VitalsService,
        patient_id: &str,
    ) -> Result<RiskResultView, FormError> {
        self.error = None;

        let outcome = match self.parse() {
            Ok(reading) => service
                .submit(patient_id, &reading)
                .await
                .map(|record| RiskResultView::new(record, None))
                .map_err(FormError::from),
            Err(err) => Err(err),
        };

        if let Err(err) = &outcome {
            warn!("Vitals submission for patient {} failed: {}", patient_id, err);
            self.error = Some(err.user_message());
        }

        outcome
    }
}
