//! Tool registry: name → handler lookup and dispatch.
//!
//! `dispatch` never drops a call: validation failures, handler errors, and
//! unknown names all come back as a tool-result message correlated to the
//! originating call id, so the model sees what went wrong and can retry with
//! corrected arguments. Only the process around the tool (not the tool
//! itself) can abort a run.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::{Tool, ToolError, ToolOutput, ToolSpec};
use crate::graph::NodeContext;
use crate::message::{Message, ToolCall};
use crate::state::GraphState;

/// Outcome of dispatching one tool call: the correlated tool message, plus a
/// state patch when the handler returned a command.
pub struct ToolDispatch<S: GraphState> {
    pub message: Message,
    pub update: Option<S::Update>,
}

/// Registry of tools for one state type.
///
/// **Interaction**: `specs()` feeds [`ModelNode`](crate::model::ModelNode)
/// (optionally filtered per state); `dispatch` is driven by
/// [`ToolNode`](crate::tool::ToolNode) for each call the model emitted.
pub struct ToolRegistry<S: GraphState> {
    tools: HashMap<String, Arc<dyn Tool<S>>>,
    /// Registration order, so specs() is stable for prompts and tests.
    order: Vec<String>,
}

impl<S: GraphState> Default for ToolRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GraphState> ToolRegistry<S> {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Registers a tool under its spec name. Replaces an existing tool with
    /// the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool<S>>) -> &mut Self {
        let name = tool.spec().name;
        if !self.tools.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.tools.insert(name, tool);
        self
    }

    /// Specs of all registered tools, in registration order.
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| t.spec())
            .collect()
    }

    /// Executes one model-emitted call. Always produces a correlated
    /// tool-result message; failures are rendered into the message text.
    pub async fn dispatch(&self, call: &ToolCall, state: &S, ctx: &NodeContext) -> ToolDispatch<S> {
        debug!(tool = %call.name, id = %call.id, "dispatching tool call");
        let outcome = match self.tools.get(&call.name) {
            Some(tool) => tool.call(call.arguments.clone(), state, ctx).await,
            None => Err(ToolError::Unknown(call.name.clone())),
        };

        match outcome {
            Ok(ToolOutput::Text(text)) => ToolDispatch {
                message: Message::tool(text, &call.id),
                update: None,
            },
            Ok(ToolOutput::Command { message, update }) => ToolDispatch {
                message: Message::tool(message, &call.id),
                update: Some(update),
            },
            Err(e) => {
                warn!(tool = %call.name, error = %e, "tool call failed");
                ToolDispatch {
                    message: Message::tool(
                        format!("Error: {e}\nPlease fix the call and try again."),
                        &call.id,
                    ),
                    update: None,
                }
            }
        }
    }
}
