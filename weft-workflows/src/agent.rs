//! Shared react-agent loop: model ⇄ tools until the model stops calling.
//!
//! Every workflow that needs a plain tool-calling agent (the RAG QA agent,
//! the router's vertical agents, the SQL assistant, the supervisor and its
//! sub-agents) builds on this one graph shape.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use weft::graph::{routes, CompilationError, StateGraph, END, START};
use weft::message::Message;
use weft::model::{ChatModel, ModelNode};
use weft::state::{reducers, ChatState, GraphState};
use weft::tool::{ToolNode, ToolRegistry};
use weft::Checkpointer;

/// Conversation-only state: the whole agent flow is coordinated via messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub messages: Vec<Message>,
}

/// Patch type for [`AgentState`]: messages to append.
pub type AgentUpdate = Vec<Message>;

impl GraphState for AgentState {
    type Update = AgentUpdate;

    fn apply(&mut self, update: Self::Update) {
        reducers::append(&mut self.messages, update);
    }
}

impl ChatState for AgentState {
    fn messages(&self) -> &[Message] {
        &self.messages
    }

    fn messages_update(messages: Vec<Message>) -> Self::Update {
        messages
    }
}

/// The input patch for one user turn.
pub fn user_turn(text: impl Into<String>) -> AgentUpdate {
    vec![Message::user(text)]
}

/// Last assistant reply, or a placeholder when the agent produced none.
pub fn final_text(state: &AgentState) -> String {
    state
        .messages
        .iter()
        .rev()
        .find_map(|m| match m {
            Message::Assistant { content, .. } if !content.is_empty() => Some(content.clone()),
            _ => None,
        })
        .unwrap_or_else(|| "(no response)".to_string())
}

/// Builds the canonical tool-calling agent:
///
/// ```text
/// START → call_model ──(tool calls?)──► tools ─► call_model …
///                    └──(no calls)  ──► END
/// ```
pub fn react_agent(
    model: Arc<dyn ChatModel>,
    registry: Arc<ToolRegistry<AgentState>>,
    system: impl Into<String>,
) -> Result<weft::CompiledGraph<AgentState>, CompilationError> {
    build_react_graph(model, registry, system).compile()
}

/// Same agent, compiled with a checkpointer so the conversation (and anything
/// the model loaded into it) persists across turns.
pub fn react_agent_with_checkpointer(
    model: Arc<dyn ChatModel>,
    registry: Arc<ToolRegistry<AgentState>>,
    system: impl Into<String>,
    checkpointer: Arc<dyn Checkpointer<AgentState>>,
) -> Result<weft::CompiledGraph<AgentState>, CompilationError> {
    build_react_graph(model, registry, system).compile_with_checkpointer(checkpointer)
}

fn build_react_graph(
    model: Arc<dyn ChatModel>,
    registry: Arc<ToolRegistry<AgentState>>,
    system: impl Into<String>,
) -> StateGraph<AgentState> {
    let mut graph: StateGraph<AgentState> = StateGraph::new();
    graph.add_node(
        "call_model",
        Arc::new(
            ModelNode::new(model)
                .with_system(system)
                .with_tools(Arc::clone(&registry)),
        ),
    );
    graph.add_node("tools", Arc::new(ToolNode::new(registry)));
    graph.add_edge(START, "call_model");
    graph.add_conditional_edges(
        "call_model",
        routes::tool_router(),
        &[(routes::TOOLS, "tools"), (END, END)],
    );
    graph.add_edge("tools", "call_model");
    graph
}
