//! Graph node trait: one step, state in, patches out.
//!
//! A node reads the shared state and returns partial updates; it never
//! mutates state in place. The executor applies the patches (in order, via
//! the state's merge policies), persists a checkpoint, and only then routes
//! to the next node, so a node that fails or is cancelled leaves no
//! half-applied effects behind.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::GraphError;
use crate::state::GraphState;

/// Per-invocation context handed to every node run.
#[derive(Debug, Clone, Default)]
pub struct NodeContext {
    /// The branch's input slice when this run was dispatched by a fan-out
    /// edge; `None` for ordinary runs.
    pub branch_input: Option<Value>,
    /// Thread id of the current run, when the caller provided one.
    pub thread_id: Option<String>,
}

/// Ordered partial updates produced by one node run.
///
/// Most nodes return a single patch; a tool-dispatch step may return several
/// (the appended tool messages plus each command's patch), applied in order
/// as one atomic merge.
pub struct NodeOutput<S: GraphState> {
    pub updates: Vec<S::Update>,
}

impl<S: GraphState> NodeOutput<S> {
    /// No state change.
    pub fn none() -> Self {
        Self {
            updates: Vec::new(),
        }
    }

    pub fn update(update: S::Update) -> Self {
        Self {
            updates: vec![update],
        }
    }

    pub fn updates(updates: Vec<S::Update>) -> Self {
        Self { updates }
    }
}

/// One step in a graph.
///
/// **Interaction**: registered with `StateGraph::add_node`; run by
/// `CompiledGraph`. Implemented by [`ModelNode`](crate::model::ModelNode),
/// [`ToolNode`](crate::tool::ToolNode), and workflow-specific nodes.
#[async_trait]
pub trait Node<S: GraphState>: Send + Sync {
    async fn run(&self, state: &S, ctx: &NodeContext) -> Result<NodeOutput<S>, GraphError>;
}

type BoxedNodeFn<S> = Box<
    dyn Fn(
            S,
            NodeContext,
        )
            -> Pin<Box<dyn Future<Output = Result<NodeOutput<S>, GraphError>> + Send>>
        + Send
        + Sync,
>;

/// Adapts an async closure into a [`Node`], for steps too small to deserve a
/// struct.
pub struct FnNode<S: GraphState> {
    f: BoxedNodeFn<S>,
}

impl<S: GraphState> FnNode<S> {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(S, NodeContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<NodeOutput<S>, GraphError>> + Send + 'static,
    {
        Self {
            f: Box::new(move |state, ctx| Box::pin(f(state, ctx))),
        }
    }
}

#[async_trait]
impl<S: GraphState> Node<S> for FnNode<S> {
    async fn run(&self, state: &S, ctx: &NodeContext) -> Result<NodeOutput<S>, GraphError> {
        (self.f)(state.clone(), ctx.clone()).await
    }
}
