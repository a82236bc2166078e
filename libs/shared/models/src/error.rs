use thiserror::Error;

/// Failure of a single call against the remote service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Request timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("Service unreachable: {0}")]
    Unreachable(String),

    #[error("API Error {status}: {detail}")]
    Server { status: u16, detail: String },

    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Human-readable text shown inline by the views.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Timeout { .. } => {
                "The server took too long to respond. Please try again.".to_string()
            }
            ApiError::Unreachable(_) => {
                "Unable to reach the Smart Health service. Check your connection.".to_string()
            }
            ApiError::Server { detail, .. } => detail.clone(),
            ApiError::Decode(_) => "Received an unexpected response from the server.".to_string(),
        }
    }
}
