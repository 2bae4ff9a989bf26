//! Support-ticket state machine: warranty → classification → resolution.
//!
//! One model node serves every step; the step field in state selects the
//! system prompt and the visible tool subset, and the transition tools move
//! the step forward (or back). Compiled with a checkpointer so the current
//! step and collected facts survive across conversation turns.
//!
//! ```text
//! START → call_model ──(tool calls?)──► tools ─► call_model …
//!                    └──(no calls)  ──► END
//! ```

mod state;
mod tools;

pub use state::{
    step_prompt, step_tools, IssueType, SupportState, SupportStep, SupportUpdate, WarrantyStatus,
};
pub use tools::{
    support_tools, EscalateToHuman, GoBackToClassifier, GoBackToWarranty, ProvideSolution,
    RecordIssueType, RecordWarrantyStatus,
};

use std::sync::Arc;

use weft::graph::{routes, CompilationError, CompiledGraph, RunConfig, StateGraph, END, START};
use weft::message::Message;
use weft::model::{ChatModel, ModelNode, SystemPrompt};
use weft::prompt::{PromptTemplate, TemplateVars};
use weft::state::ChatState;
use weft::tool::ToolNode;
use weft::{Checkpointer, GraphError};

fn step_system_prompt(state: &SupportState) -> SystemPrompt {
    let mut vars = TemplateVars::new();
    if let Some(status) = state.warranty_status {
        vars.insert("warranty_status".into(), status.to_string());
    }
    if let Some(issue) = state.issue_type {
        vars.insert("issue_type".into(), issue.to_string());
    }
    SystemPrompt::new(PromptTemplate::new(step_prompt(state.current_step)), vars)
}

/// Builds the support graph with the given model and checkpointer.
pub fn support_graph(
    model: Arc<dyn ChatModel>,
    checkpointer: Arc<dyn Checkpointer<SupportState>>,
) -> Result<CompiledGraph<SupportState>, CompilationError> {
    let registry = Arc::new(support_tools());

    let model_node = ModelNode::new(model)
        .with_system_fn(step_system_prompt)
        .with_tools(Arc::clone(&registry))
        .with_tool_filter(|state: &SupportState, specs| {
            let allowed = step_tools(state.current_step);
            specs
                .into_iter()
                .filter(|spec| allowed.contains(&spec.name.as_str()))
                .collect()
        });

    let mut graph: StateGraph<SupportState> = StateGraph::new();
    graph.add_node("call_model", Arc::new(model_node));
    graph.add_node("tools", Arc::new(ToolNode::new(registry)));
    graph.add_edge(START, "call_model");
    graph.add_conditional_edges(
        "call_model",
        routes::tool_router(),
        &[(routes::TOOLS, "tools"), (END, END)],
    );
    graph.add_edge("tools", "call_model");

    graph.compile_with_checkpointer(checkpointer)
}

/// The support assistant: one `reply` call per customer message.
pub struct SupportAssistant {
    graph: CompiledGraph<SupportState>,
}

impl SupportAssistant {
    pub fn new(
        model: Arc<dyn ChatModel>,
        checkpointer: Arc<dyn Checkpointer<SupportState>>,
    ) -> Result<Self, CompilationError> {
        Ok(Self {
            graph: support_graph(model, checkpointer)?,
        })
    }

    pub fn graph(&self) -> &CompiledGraph<SupportState> {
        &self.graph
    }

    /// Runs one turn for the thread and returns the final state.
    pub async fn turn(&self, text: &str, thread_id: &str) -> Result<SupportState, GraphError> {
        self.graph
            .invoke(
                SupportState::messages_update(vec![Message::user(text)]),
                RunConfig::for_thread(thread_id),
            )
            .await
    }

    /// Runs one turn and returns just the assistant's reply text.
    pub async fn reply(&self, text: &str, thread_id: &str) -> Result<String, GraphError> {
        let state = self.turn(text, thread_id).await?;
        Ok(state
            .messages
            .iter()
            .rev()
            .find_map(|m| match m {
                Message::Assistant { content, .. } if !content.is_empty() => Some(content.clone()),
                _ => None,
            })
            .unwrap_or_else(|| "(no response)".to_string()))
    }
}
