//! Tool-dispatch node: execute the last assistant message's tool calls.
//!
//! Reads the calls from the newest assistant message, dispatches each through
//! the registry, and returns one patch appending all tool-result messages
//! followed by each command's state patch. Graphs normally loop this node's
//! output back into the model node so the model can react to the results.

use std::sync::Arc;

use async_trait::async_trait;

use super::ToolRegistry;
use crate::error::GraphError;
use crate::graph::{Node, NodeContext, NodeOutput};
use crate::state::ChatState;

/// Generic tool-dispatch step for any [`ChatState`].
///
/// **Interaction**: counterpart of [`ModelNode`](crate::model::ModelNode);
/// the pair forms the model ⇄ tools loop that every workflow builds on.
pub struct ToolNode<S: ChatState> {
    registry: Arc<ToolRegistry<S>>,
}

impl<S: ChatState> ToolNode<S> {
    pub fn new(registry: Arc<ToolRegistry<S>>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl<S: ChatState> Node<S> for ToolNode<S> {
    async fn run(&self, state: &S, ctx: &NodeContext) -> Result<NodeOutput<S>, GraphError> {
        let calls = state
            .messages()
            .last()
            .map(|m| m.tool_calls().to_vec())
            .unwrap_or_default();
        if calls.is_empty() {
            return Ok(NodeOutput::none());
        }

        let mut messages = Vec::with_capacity(calls.len());
        let mut command_updates = Vec::new();
        for call in &calls {
            let dispatch = self.registry.dispatch(call, state, ctx).await;
            messages.push(dispatch.message);
            if let Some(update) = dispatch.update {
                command_updates.push(update);
            }
        }

        let mut updates = vec![S::messages_update(messages)];
        updates.extend(command_updates);
        Ok(NodeOutput::updates(updates))
    }
}
