//! Tools: schema-described callables the model can invoke.
//!
//! A tool's arguments arrive as whatever JSON the model produced; they are
//! validated at this boundary by deserializing into the tool's typed argument
//! struct ([`args`]). A handler returns either a plain value for the
//! conversation log or a [`ToolOutput::Command`]: a value *plus* a state
//! patch, which is how a tool can drive graph-level control flow (record a
//! decision and advance the workflow phase in one step). The message and the
//! patch are applied together by the executor's merge step, never as a side
//! channel.

mod node;
mod registry;

pub use node::ToolNode;
pub use registry::{ToolDispatch, ToolRegistry};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::graph::NodeContext;
use crate::state::GraphState;

/// Tool name, description, and JSON schema of its arguments: what the model
/// is shown when the tool is exposed.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Value,
}

/// Tool failure. All variants are recoverable: the registry renders them into
/// a tool-result message so the model can see the failure and self-correct.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The model's arguments did not match the tool's schema.
    #[error("invalid arguments for tool '{tool}': {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// The handler itself failed.
    #[error("tool '{tool}' failed: {reason}")]
    Execution { tool: String, reason: String },

    /// No tool with this name is registered.
    #[error("unknown tool '{0}'")]
    Unknown(String),
}

/// What a handler produced.
pub enum ToolOutput<S: GraphState> {
    /// Plain serializable value; becomes a single correlated tool message.
    Text(String),
    /// Two-part result: the tool message for the conversation log plus a
    /// state patch, applied atomically together.
    Command { message: String, update: S::Update },
}

/// One callable tool bound to a state type.
#[async_trait]
pub trait Tool<S: GraphState>: Send + Sync {
    fn spec(&self) -> ToolSpec;

    async fn call(
        &self,
        args: Value,
        state: &S,
        ctx: &NodeContext,
    ) -> Result<ToolOutput<S>, ToolError>;
}

/// Validates raw model-produced arguments against the tool's typed argument
/// struct. Deserialization failure is the schema mismatch.
pub fn args<T: DeserializeOwned>(tool: &str, value: Value) -> Result<T, ToolError> {
    serde_json::from_value(value).map_err(|e| ToolError::InvalidArguments {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}
