use tracing::warn;

use crate::models::{ChatMessage, Role, FALLBACK_REPLY, RESET_GREETING, WELCOME_GREETING};
use crate::services::AssistantService;

/// Conversation with the virtual assistant.
#[derive(Debug, Clone)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
    next_id: u64,
    patient_id: Option<String>,
}

impl Default for ChatTranscript {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatTranscript {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::plain(0, Role::Assistant, WELCOME_GREETING)],
            next_id: 1,
            patient_id: None,
        }
    }

    /// Asks every question in the context of this patient.
    pub fn for_patient(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: Some(patient_id.into()),
            ..Self::new()
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn push(&mut self, mut message: ChatMessage) -> u64 {
        message.id = self.next_id;
        self.next_id += 1;
        let id = message.id;
        self.messages.push(message);
        id
    }

    /// Sends a question and appends the reply. Blank input is ignored and
    /// returns `None`; otherwise returns the assistant message that was
    /// appended.
    ///
    /// The exclusive borrow held for the whole call is what keeps a second
    /// question from going out while one is unanswered. If the future is
    /// dropped early the question stays in the transcript without a reply
    /// and the next `send` goes through normally.
    pub async fn send(&mut self, service: &AssistantService, question: &str) -> Option<&ChatMessage> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }

        self.push(ChatMessage::plain(0, Role::User, question));

        let reply = match service.ask(question, self.patient_id.as_deref()).await {
            Ok(answer) => ChatMessage {
                id: 0,
                role: Role::Assistant,
                content: answer.response,
                topic: Some(answer.topic),
                disclaimer: Some(answer.disclaimer),
            },
            Err(err) => {
                warn!("Assistant request failed: {}", err);
                ChatMessage::plain(0, Role::Assistant, FALLBACK_REPLY)
            }
        };

        self.push(reply);
        self.messages.last()
    }

    /// Starts a new conversation. Ids keep counting up.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.push(ChatMessage::plain(0, Role::Assistant, RESET_GREETING));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_welcome() {
        let transcript = ChatTranscript::new();
        assert_eq!(transcript.messages().len(), 1);
        assert_eq!(transcript.messages()[0].content, WELCOME_GREETING);
        assert_eq!(transcript.messages()[0].role, Role::Assistant);
    }

    #[test]
    fn reset_keeps_ids_increasing() {
        let mut transcript = ChatTranscript::new();
        transcript.push(ChatMessage::plain(0, Role::User, "hi"));
        transcript.reset();

        let messages = transcript.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, RESET_GREETING);
        assert_eq!(messages[0].id, 2);
    }
}
