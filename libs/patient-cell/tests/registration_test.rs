use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use patient_cell::{IdentityForm, PatientService, RegistrationStep, RegistrationWizard};
use shared_config::AppConfig;
use shared_models::{Gender, RiskLevel};
use vitals_cell::{VitalField, VitalsService};

fn wizard() -> RegistrationWizard {
    let mut wizard = RegistrationWizard::new();
    wizard.identity = IdentityForm {
        name: "Jane Smith".to_string(),
        age: "42".to_string(),
        gender: Some(Gender::Female),
        ..IdentityForm::default()
    };
    assert!(wizard.next());

    wizard.vitals.set(VitalField::HeartRate, "72");
    wizard.vitals.set(VitalField::Systolic, "120");
    wizard.vitals.set(VitalField::Diastolic, "80");
    wizard.vitals.set(VitalField::Temperature, "36.6");
    wizard.vitals.set(VitalField::OxygenSaturation, "98");
    wizard
}

fn services(server: &MockServer) -> (PatientService, VitalsService) {
    let config = AppConfig::new(server.uri());
    (PatientService::new(&config), VitalsService::new(&config))
}

async fn mount_patient_create(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/patients/"))
        .and(body_json(json!({
            "name": "Jane Smith",
            "age": 42,
            "gender": "female"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "new-7",
            "name": "Jane Smith",
            "age": 42,
            "gender": "female",
            "created_at": "2024-03-01T09:00:00+00:00"
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_registration_creates_patient_then_logs_first_reading() {
    let mock_server = MockServer::start().await;
    mount_patient_create(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/vitals/new-7"))
        .and(body_json(json!({
            "heart_rate": 72.0,
            "blood_pressure_systolic": 120.0,
            "blood_pressure_diastolic": 80.0,
            "temperature": 36.6,
            "oxygen_saturation": 98.0
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "v-1",
            "patient_id": "new-7",
            "heart_rate": 72.0,
            "blood_pressure_systolic": 120.0,
            "blood_pressure_diastolic": 80.0,
            "temperature": 36.6,
            "oxygen_saturation": 98.0,
            "risk_score": 12.5,
            "risk_level": "Low",
            "recommendations": ["Maintain a balanced diet"],
            "alert_triggered": false
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (patients, vitals) = services(&mock_server);
    let mut wizard = wizard();
    let registration = wizard.submit(&patients, &vitals).await.unwrap();

    assert_eq!(registration.patient.id, "new-7");
    assert_eq!(registration.result.record.patient_id, "new-7");
    assert_eq!(registration.result.patient_name.as_deref(), Some("Jane Smith"));
    assert_eq!(registration.result.level(), RiskLevel::Low);
    assert_eq!(registration.result.score(), 12.5);
    assert_eq!(registration.result.recommendations(), ["Maintain a balanced diet"]);
    assert!(!registration.result.alert_triggered());

    assert_eq!(wizard.step(), RegistrationStep::Submitted);
    assert!(wizard.error().is_none());
    assert_eq!(wizard.outcome(), Some(&registration));
}

#[tokio::test]
async fn test_vitals_failure_keeps_patient_and_retry_skips_create() {
    let mock_server = MockServer::start().await;
    mount_patient_create(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/vitals/new-7"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "detail": "heart_rate out of range" })),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/vitals/new-7"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "v-1",
            "patient_id": "new-7",
            "heart_rate": 72.0,
            "blood_pressure_systolic": 120.0,
            "blood_pressure_diastolic": 80.0,
            "temperature": 36.6,
            "oxygen_saturation": 98.0,
            "risk_level": "moderate",
            "risk_score": 40.0
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (patients, vitals) = services(&mock_server);
    let mut wizard = wizard();

    assert!(wizard.submit(&patients, &vitals).await.is_err());
    assert_eq!(wizard.error(), Some("API Error 422: heart_rate out of range"));
    assert_eq!(wizard.step(), RegistrationStep::Vitals);

    let registration = wizard.submit(&patients, &vitals).await.unwrap();
    assert_eq!(registration.result.level(), RiskLevel::Moderate);
}

#[tokio::test]
async fn test_invalid_input_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (patients, vitals) = services(&mock_server);
    let mut wizard = wizard();
    wizard.vitals.set(VitalField::Temperature, "warm");

    assert!(wizard.submit(&patients, &vitals).await.is_err());
    assert_eq!(
        wizard.error(),
        Some("Temperature (°C) must be a number, got 'warm'")
    );
}
