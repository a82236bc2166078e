use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use alert_cell::{AlertFilter, AlertService, AlertSource, FeedScope};
use shared_config::AppConfig;
use shared_models::AlertSeverity;

fn create_test_service(server: &MockServer) -> AlertService {
    AlertService::new(&AppConfig::new(server.uri()))
}

#[tokio::test]
async fn test_patient_alerts_requests_server_side_filter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/alerts/p-1"))
        .and(query_param("unacknowledged_only", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "a-1",
                "patient_id": "p-1",
                "vital_id": "v-1",
                "message": "High risk detected",
                "severity": "Critical",
                "is_acknowledged": false,
                "created_at": "2024-03-01T10:15:00+00:00"
            }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = create_test_service(&mock_server);
    let scope = FeedScope::Patient { patient_id: "p-1".to_string() };
    let alerts = service.fetch(&scope, AlertFilter::Unacknowledged).await.unwrap();

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, AlertSeverity::Critical);
    assert_eq!(alerts[0].vital_reading_id.as_deref(), Some("v-1"));
}

#[tokio::test]
async fn test_global_feed_sends_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/alerts/"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "a-1",
                "patient_id": "p-1",
                "message": "Elevated blood pressure",
                "severity": "high",
                "acknowledged": true,
                "patients": { "name": "Jane Smith" }
            }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = create_test_service(&mock_server);
    let alerts = service
        .fetch(&FeedScope::Global { limit: 100 }, AlertFilter::All)
        .await
        .unwrap();

    assert_eq!(alerts[0].severity, AlertSeverity::Warning);
    assert_eq!(alerts[0].patient_name.as_deref(), Some("Jane Smith"));
    assert!(alerts[0].acknowledged);
}

#[tokio::test]
async fn test_acknowledge_is_repeatable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/alerts/a-1/acknowledge"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "a-1",
            "patient_id": "p-1",
            "message": "High risk detected",
            "severity": "critical",
            "is_acknowledged": true
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let service = create_test_service(&mock_server);
    let first = service.acknowledge_alert("a-1").await.unwrap();
    let second = service.acknowledge_alert("a-1").await.unwrap();

    assert!(first.acknowledged);
    assert_eq!(first, second);
}
