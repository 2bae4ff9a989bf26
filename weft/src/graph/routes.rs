//! Canonical routers.

use crate::graph::edge::Router;
use crate::graph::state_graph::END;
use crate::state::ChatState;

/// Label routed to when the model asked for tools. Pair with a target map
/// entry pointing at the tool-dispatch node.
pub const TOOLS: &str = "tools";

/// The continuation decision of every tool-calling loop: if the newest
/// assistant message carries at least one tool call, route to [`TOOLS`];
/// otherwise the model chose to answer, route to [`END`].
pub fn tool_router<S: ChatState>() -> Router<S> {
    std::sync::Arc::new(|state: &S| {
        let wants_tools = state
            .messages()
            .last()
            .map(|m| !m.tool_calls().is_empty())
            .unwrap_or(false);
        if wants_tools {
            TOOLS.to_string()
        } else {
            END.to_string()
        }
    })
}
