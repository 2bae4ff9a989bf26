//! Chat model abstraction: plain, tool-augmented, and structured completion.
//!
//! The engine treats the LLM as an opaque completion service behind
//! [`ChatModel`]. Restricting which tools a model may call is done by passing
//! a smaller `ToolSpec` slice: a tool the model was never shown cannot be
//! called, so there is no post-hoc filtering anywhere.

mod mock;
mod node;
#[cfg(feature = "openai")]
mod openai;

pub use mock::{MockChatModel, SeenRequest};
pub use node::{ModelNode, SystemPrompt};
#[cfg(feature = "openai")]
pub use openai::ChatOpenAI;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::message::{Message, ToolCall};
use crate::tool::ToolSpec;

/// Model backend failure.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The service was unreachable or returned a server error. Terminal for
    /// the current turn; retry policy belongs to the caller, not the engine.
    #[error("model service unavailable: {0}")]
    Unavailable(String),

    /// The service answered, but not in a shape we can use (no choices,
    /// malformed structured output).
    #[error("malformed model response: {0}")]
    InvalidResponse(String),
}

/// One completion: assistant text plus any tool calls the model emitted.
#[derive(Debug, Clone, Default)]
pub struct ChatResponse {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
}

impl ChatResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: content.into(),
            tool_calls,
        }
    }
}

/// LLM completion service.
///
/// **Interaction**: `complete` backs [`ModelNode`]; `extract` backs
/// classification/grading nodes that need a value conforming to a schema
/// instead of free text. Implementations: [`MockChatModel`] (scripted, for
/// tests), `ChatOpenAI` (feature `openai`).
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// One chat turn. When `tools` is non-empty the model may emit tool calls
    /// naming only those tools.
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<ChatResponse, ModelError>;

    /// Forced structured output: returns a JSON value conforming to `schema`.
    async fn extract(&self, messages: &[Message], schema: &Value) -> Result<Value, ModelError>;
}

/// Runs `extract` and deserializes the result into a typed value.
///
/// A response that does not fit `T` is a [`ModelError::InvalidResponse`].
pub async fn extract_as<T: DeserializeOwned>(
    model: &dyn ChatModel,
    messages: &[Message],
    schema: &Value,
) -> Result<T, ModelError> {
    let value = model.extract(messages, schema).await?;
    serde_json::from_value(value).map_err(|e| ModelError::InvalidResponse(e.to_string()))
}
