use crate::llm::ChatMessage;

/// In-memory per-session transcript, appended to across turns. Holds only
/// user/assistant/tool messages — the system prompt and any SOP injection
/// are assembled fresh for every outgoing request rather than stored here.
#[derive(Debug, Default)]
pub struct Conversation {
    history: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.history.push(message);
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_and_records_pushes_in_order() {
        let mut conversation = Conversation::new();
        assert!(conversation.history().is_empty());
        conversation.push(ChatMessage::user("hi"));
        conversation.push(ChatMessage::assistant(Some("hello".to_string()), None));
        assert_eq!(conversation.history().len(), 2);
    }
}
