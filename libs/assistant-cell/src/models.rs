pub const WELCOME_GREETING: &str = "Hello! I'm the Smart Health Virtual Assistant. I can answer general health questions to support your care. Please note that I'm not a substitute for professional medical advice. How can I assist you today?";

pub const RESET_GREETING: &str =
    "Hello! I'm the Smart Health Virtual Assistant. How can I assist you today?";

pub const FALLBACK_REPLY: &str = "I was unable to process your question at this time. Please ensure the backend service is running and try again.";

pub const SUGGESTED_QUESTIONS: [&str; 5] = [
    "What are the symptoms of Type 2 Diabetes?",
    "How can I lower my blood pressure naturally?",
    "What does a high cholesterol reading mean?",
    "When should I seek emergency care for chest pain?",
    "What is BMI and why does it matter?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: u64,
    pub role: Role,
    pub content: String,
    pub topic: Option<String>,
    pub disclaimer: Option<String>,
}

impl ChatMessage {
    pub(crate) fn plain(id: u64, role: Role, content: impl Into<String>) -> Self {
        Self {
            id,
            role,
            content: content.into(),
            topic: None,
            disclaimer: None,
        }
    }
}
