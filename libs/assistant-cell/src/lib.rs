pub mod models;
pub mod services;
pub mod transcript;

pub use models::{ChatMessage, Role, FALLBACK_REPLY, RESET_GREETING, SUGGESTED_QUESTIONS, WELCOME_GREETING};
pub use services::AssistantService;
pub use transcript::ChatTranscript;
