use tracing::debug;

use shared_config::AppConfig;
use shared_http::ApiClient;
use shared_models::{ApiError, AssistantResponse, ChatRequest};

#[derive(Clone)]
pub struct AssistantService {
    api: ApiClient,
}

impl AssistantService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            api: ApiClient::new(config),
        }
    }

    pub fn with_client(api: ApiClient) -> Self {
        Self { api }
    }

    /// Asks a general health question, optionally in the context of one
    /// patient.
    pub async fn ask(
        &self,
        question: &str,
        patient_id: Option<&str>,
    ) -> Result<AssistantResponse, ApiError> {
        debug!("Asking assistant (patient context: {:?})", patient_id);

        let request = ChatRequest {
            question: question.to_string(),
            patient_id: patient_id.map(str::to_string),
        };
        self.api.post("/assistant/chat", &request).await
    }
}
