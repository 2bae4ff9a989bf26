//! Shared state and nodes for graph tests.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use weft::graph::{Node, NodeContext, NodeOutput};
use weft::state::{reducers, GraphState, Slot};
use weft::GraphError;

/// Trace of which nodes ran (append) plus a last-writer-wins label (replace).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceState {
    pub visited: Vec<String>,
    pub label: String,
}

#[derive(Debug, Default)]
pub struct TraceUpdate {
    pub visited: Vec<String>,
    pub label: Slot<String>,
}

impl GraphState for TraceState {
    type Update = TraceUpdate;

    fn apply(&mut self, update: Self::Update) {
        reducers::append(&mut self.visited, update.visited);
        reducers::replace(&mut self.label, update.label);
    }
}

/// Records its own name (suffixed with the branch input when present),
/// optionally sets the label to its name, and optionally sleeps first.
pub struct VisitNode {
    pub name: &'static str,
    pub delay: Option<Duration>,
    pub set_label: bool,
}

impl VisitNode {
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            delay: None,
            set_label: true,
        }
    }

    pub fn slow(name: &'static str, delay: Duration) -> Self {
        Self {
            name,
            delay: Some(delay),
            set_label: true,
        }
    }

    /// Appends to `visited` but leaves the label alone.
    pub fn silent(name: &'static str) -> Self {
        Self {
            name,
            delay: None,
            set_label: false,
        }
    }
}

#[async_trait]
impl Node<TraceState> for VisitNode {
    async fn run(
        &self,
        _state: &TraceState,
        ctx: &NodeContext,
    ) -> Result<NodeOutput<TraceState>, GraphError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let entry = match &ctx.branch_input {
            Some(input) => format!(
                "{}:{}",
                self.name,
                input.get("q").and_then(|v| v.as_str()).unwrap_or("?")
            ),
            None => self.name.to_string(),
        };
        let label = if self.set_label {
            Slot::set(self.name.to_string())
        } else {
            Slot::Keep
        };
        Ok(NodeOutput::update(TraceUpdate {
            visited: vec![entry],
            label,
        }))
    }
}

/// Always fails with an execution error.
pub struct FailingNode;

#[async_trait]
impl Node<TraceState> for FailingNode {
    async fn run(
        &self,
        _state: &TraceState,
        _ctx: &NodeContext,
    ) -> Result<NodeOutput<TraceState>, GraphError> {
        Err(GraphError::Execution("boom".into()))
    }
}
