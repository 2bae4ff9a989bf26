//! Retrieval QA: a plain agent and a self-correcting graded pipeline.
//!
//! The graded pipeline:
//!
//! ```text
//! START
//!   └─► generate_query_or_respond
//!           ├─ (tool calls?) ──► retrieve ──► grade_documents ─┐
//!           │                                   ├─ relevant ──► generate ──► END
//!           │                                   └─ not ───────► rewrite ─► generate_query_or_respond
//!           └─ (no calls) ──► END
//! ```
//!
//! The rewrite loop is a genuine cycle; the run config's recursion limit is
//! what bounds a grader that never accepts.

mod nodes;
mod state;

pub use nodes::{GenerateNode, GradeNode, RewriteNode};
pub use state::{Grade, RagState, RagUpdate};

use std::sync::Arc;

use weft::graph::{routes, CompilationError, CompiledGraph, StateGraph, END, START};
use weft::model::{ChatModel, ModelNode};
use weft::tool::{ToolNode, ToolRegistry};

use crate::agent::{self, AgentState};
use crate::retrieval::{RetrieveTool, VectorIndex};

/// The plain retrieval QA agent: react loop over the `retrieve` tool.
pub fn qa_agent(
    model: Arc<dyn ChatModel>,
    index: Arc<VectorIndex>,
    corpus_description: &str,
) -> Result<CompiledGraph<AgentState>, CompilationError> {
    let mut registry: ToolRegistry<AgentState> = ToolRegistry::new();
    registry.register(Arc::new(RetrieveTool::<AgentState>::new(index)));
    agent::react_agent(
        model,
        Arc::new(registry),
        format!(
            "You are an assistant for answering questions about {corpus_description}. \
             Use the retrieve tool to get relevant information when needed."
        ),
    )
}

/// Builds the graded pipeline over the given index.
pub fn graded_rag_graph(
    model: Arc<dyn ChatModel>,
    index: Arc<VectorIndex>,
) -> Result<CompiledGraph<RagState>, CompilationError> {
    let mut registry: ToolRegistry<RagState> = ToolRegistry::new();
    registry.register(Arc::new(RetrieveTool::<RagState>::new(index)));
    let registry = Arc::new(registry);

    let mut graph: StateGraph<RagState> = StateGraph::new();
    graph.add_node(
        "generate_query_or_respond",
        Arc::new(
            ModelNode::new(Arc::clone(&model)).with_tools(Arc::clone(&registry)),
        ),
    );
    graph.add_node("retrieve", Arc::new(ToolNode::new(registry)));
    graph.add_node("grade_documents", Arc::new(GradeNode::new(Arc::clone(&model))));
    graph.add_node("rewrite", Arc::new(RewriteNode::new(Arc::clone(&model))));
    graph.add_node("generate", Arc::new(GenerateNode::new(model)));

    graph.add_edge(START, "generate_query_or_respond");
    // After the model: retrieve or finish.
    graph.add_conditional_edges(
        "generate_query_or_respond",
        routes::tool_router(),
        &[(routes::TOOLS, "retrieve"), (END, END)],
    );
    graph.add_edge("retrieve", "grade_documents");
    // After grading: answer from the context, or rewrite and loop back.
    graph.add_conditional_edges(
        "grade_documents",
        Arc::new(|state: &RagState| match state.relevance {
            Some(Grade::Yes) => "generate".to_string(),
            _ => "rewrite".to_string(),
        }),
        &[("generate", "generate"), ("rewrite", "rewrite")],
    );
    graph.add_edge("rewrite", "generate_query_or_respond");
    graph.add_edge("generate", END);

    graph.compile()
}
