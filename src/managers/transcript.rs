use crate::markup;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub text: String,
    pub is_user: bool,
}

/// Append-only list of rendered chat messages. Only `clear` removes anything.
#[derive(Clone, Default)]
pub struct TranscriptManager {
    messages: Arc<Mutex<Vec<ChatMessage>>>,
}

impl TranscriptManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ChatMessage>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a message to the end of the transcript.
    pub fn render(&self, text: &str, is_user: bool) {
        self.lock().push(ChatMessage {
            text: text.to_string(),
            is_user,
        });
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Project the transcript into message nodes, oldest first.
    pub fn to_html(&self) -> Vec<String> {
        self.lock()
            .iter()
            .map(|msg| markup::render_message(&msg.text, msg.is_user))
            .collect()
    }
}
