//! State for the self-correcting RAG graph.

use serde::{Deserialize, Serialize};

use weft::message::Message;
use weft::state::{reducers, ChatState, GraphState, Slot};

/// Relevance verdict from the grading step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Yes,
    No,
}

/// Conversation plus the latest retrieval grade.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagState {
    pub messages: Vec<Message>,
    /// Set by the grading node after each retrieval; drives the
    /// generate-vs-rewrite route.
    pub relevance: Option<Grade>,
}

#[derive(Debug, Default)]
pub struct RagUpdate {
    pub messages: Vec<Message>,
    pub relevance: Slot<Option<Grade>>,
}

impl GraphState for RagState {
    type Update = RagUpdate;

    fn apply(&mut self, update: Self::Update) {
        reducers::append(&mut self.messages, update.messages);
        reducers::replace(&mut self.relevance, update.relevance);
    }
}

impl ChatState for RagState {
    fn messages(&self) -> &[Message] {
        &self.messages
    }

    fn messages_update(messages: Vec<Message>) -> Self::Update {
        RagUpdate {
            messages,
            ..Default::default()
        }
    }
}

/// The original user question: the first user message in the log.
pub fn question(state: &RagState) -> &str {
    state
        .messages
        .iter()
        .find_map(|m| match m {
            Message::User { content } => Some(content.as_str()),
            _ => None,
        })
        .unwrap_or("")
}

/// The freshest context: the last message's text (a tool result right after
/// retrieval).
pub fn context(state: &RagState) -> &str {
    state.messages.last().map(|m| m.content()).unwrap_or("")
}
