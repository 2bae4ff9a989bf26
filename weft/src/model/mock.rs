//! Mock chat model for tests and examples.
//!
//! Scripted responses pop in order; a configurable fallback answers once the
//! script runs dry (useful for loops that must keep producing the same
//! grade). Every request is recorded so tests can assert what the model was
//! shown, in particular which tool subset it was given.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{ChatModel, ChatResponse, ModelError};
use crate::message::Message;
use crate::tool::ToolSpec;

/// One recorded `complete` call: how many messages the model saw and the
/// names of the tools it was offered.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub message_count: usize,
    pub tool_names: Vec<String>,
}

/// Scripted [`ChatModel`].
pub struct MockChatModel {
    responses: Mutex<VecDeque<ChatResponse>>,
    fallback: Option<ChatResponse>,
    extractions: Mutex<VecDeque<Value>>,
    extraction_fallback: Option<Value>,
    seen: Mutex<Vec<SeenRequest>>,
}

impl MockChatModel {
    /// A model that always answers with the same text and no tool calls.
    pub fn fixed(content: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fallback: Some(ChatResponse::text(content)),
            extractions: Mutex::new(VecDeque::new()),
            extraction_fallback: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// A model that pops the given responses in order, then fails.
    pub fn scripted(responses: impl IntoIterator<Item = ChatResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            fallback: None,
            extractions: Mutex::new(VecDeque::new()),
            extraction_fallback: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Fallback completion once the script is exhausted.
    pub fn with_fallback(mut self, response: ChatResponse) -> Self {
        self.fallback = Some(response);
        self
    }

    /// Scripted values for `extract`, popped in order.
    pub fn with_extractions(self, values: impl IntoIterator<Item = Value>) -> Self {
        *self.extractions.lock().unwrap() = values.into_iter().collect();
        self
    }

    /// Fallback extraction once the extraction script is exhausted. Lets a
    /// test grader answer "no" forever.
    pub fn with_extraction_fallback(mut self, value: Value) -> Self {
        self.extraction_fallback = Some(value);
        self
    }

    /// All `complete` requests this model has received, in order.
    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<ChatResponse, ModelError> {
        self.seen.lock().unwrap().push(SeenRequest {
            message_count: messages.len(),
            tool_names: tools.iter().map(|t| t.name.clone()).collect(),
        });
        if let Some(response) = self.responses.lock().unwrap().pop_front() {
            return Ok(response);
        }
        self.fallback
            .clone()
            .ok_or_else(|| ModelError::Unavailable("mock script exhausted".into()))
    }

    async fn extract(&self, _messages: &[Message], _schema: &Value) -> Result<Value, ModelError> {
        if let Some(value) = self.extractions.lock().unwrap().pop_front() {
            return Ok(value);
        }
        self.extraction_fallback
            .clone()
            .ok_or_else(|| ModelError::Unavailable("mock extraction script exhausted".into()))
    }
}
