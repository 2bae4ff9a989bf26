//! State graph: nodes, edges, compile and run.
//!
//! Aligns with LangGraph's `StateGraph`: add nodes and edges (static,
//! conditional, fan-out), compile, then invoke per thread with checkpointing.

mod compile_error;
mod compiled;
mod config;
mod edge;
mod node;
pub mod routes;
mod state_graph;

pub use compile_error::CompilationError;
pub use compiled::CompiledGraph;
pub use config::{RunConfig, DEFAULT_RECURSION_LIMIT};
pub use edge::{Branch, Dispatcher, Router};
pub use node::{FnNode, Node, NodeContext, NodeOutput};
pub use state_graph::{StateGraph, END, START};
