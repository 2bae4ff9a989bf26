//! # Weft
//!
//! A small graph-orchestration engine for LLM tool-calling loops. A workflow
//! is a directed graph whose nodes are model steps (invoke an LLM, possibly
//! with a restricted tool set and a state-templated prompt) or tool-dispatch
//! steps (execute the calls the model emitted), connected by static and
//! conditional edges, with one shared state threaded through every node and
//! durable per-thread checkpointing.
//!
//! ## Design principles
//!
//! - **State in, patches out**: nodes never mutate shared state; they return
//!   partial updates and the executor applies them through each field's merge
//!   policy (replace or append). That single merge point is what makes
//!   fan-out/fan-in lock-free and checkpoint replay deterministic.
//! - **Failures the model can fix stay in the conversation**: bad tool
//!   arguments and handler errors become tool-result messages; only
//!   infrastructure failures (unknown routes, unreachable backends) abort a
//!   run.
//! - **Explicit services**: the LLM, tools, and checkpoint store are passed
//!   in as handles, with no process-wide singletons, so every piece tests in
//!   isolation against stubs.
//!
//! ## Main modules
//!
//! - [`graph`]: `StateGraph`, `CompiledGraph`, `Node`, edges and routing.
//! - [`state`]: `GraphState`/`ChatState`, merge policies.
//! - [`model`]: `ChatModel` trait, `ModelNode`, `MockChatModel`, and
//!   `ChatOpenAI` behind the `openai` feature.
//! - [`tool`]: `Tool`, `ToolRegistry`, `ToolNode`.
//! - [`checkpoint`]: `Checkpointer`, `MemorySaver`, and `SqliteSaver` behind
//!   the default-on `sqlite` feature.
//! - [`skill`]: progressive disclosure of reference content.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use weft::graph::{routes, RunConfig, StateGraph, END, START};
//! use weft::model::{MockChatModel, ModelNode};
//! use weft::tool::{ToolNode, ToolRegistry};
//! # use weft::message::Message;
//! # use weft::state::{reducers, ChatState, GraphState};
//! # #[derive(Clone, Default)]
//! # struct AgentState { messages: Vec<Message> }
//! # impl GraphState for AgentState {
//! #     type Update = Vec<Message>;
//! #     fn apply(&mut self, u: Self::Update) { reducers::append(&mut self.messages, u); }
//! # }
//! # impl ChatState for AgentState {
//! #     fn messages(&self) -> &[Message] { &self.messages }
//! #     fn messages_update(m: Vec<Message>) -> Self::Update { m }
//! # }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let model = Arc::new(MockChatModel::fixed("hello!"));
//! let registry = Arc::new(ToolRegistry::<AgentState>::new());
//!
//! let mut graph = StateGraph::new();
//! graph.add_node("call_model", Arc::new(ModelNode::new(model).with_tools(registry.clone())));
//! graph.add_node("tools", Arc::new(ToolNode::new(registry)));
//! graph.add_edge(START, "call_model");
//! graph.add_conditional_edges("call_model", routes::tool_router(), &[("tools", "tools"), (END, END)]);
//! graph.add_edge("tools", "call_model");
//!
//! let compiled = graph.compile()?;
//! let out = compiled
//!     .invoke(vec![Message::user("hi")], RunConfig::for_thread("demo"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod checkpoint;
pub mod error;
pub mod graph;
pub mod message;
pub mod model;
pub mod prompt;
pub mod skill;
pub mod state;
pub mod stream;
pub mod tool;

pub use checkpoint::{Checkpoint, CheckpointError, Checkpointer, MemorySaver};
#[cfg(feature = "sqlite")]
pub use checkpoint::SqliteSaver;
pub use error::GraphError;
pub use graph::{
    Branch, CompilationError, CompiledGraph, FnNode, Node, NodeContext, NodeOutput, RunConfig,
    StateGraph, END, START,
};
pub use message::{Message, ToolCall};
pub use model::{ChatModel, ChatResponse, MockChatModel, ModelError, ModelNode, SystemPrompt};
#[cfg(feature = "openai")]
pub use model::ChatOpenAI;
pub use prompt::{PromptTemplate, TemplateVars};
pub use skill::{LoadSkillTool, Skill, SkillSet};
pub use state::{ChatState, GraphState, Slot};
pub use stream::{StreamEvent, StreamMode};
pub use tool::{Tool, ToolError, ToolNode, ToolOutput, ToolRegistry, ToolSpec};
