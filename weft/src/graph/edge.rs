//! Edges: static transitions, routed transitions, and fan-out dispatch.
//!
//! A router is a pure function of state returning a label; the builder maps
//! labels to targets, and a label without a target is a configuration bug
//! surfaced as `UnknownRoute` at run time. A fan-out dispatcher returns the
//! branches to run concurrently, each with its own input slice.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

/// Pure routing function: current state → edge label.
pub type Router<S> = Arc<dyn Fn(&S) -> String + Send + Sync>;

/// Fan-out dispatch function: current state → branches to run in parallel.
pub type Dispatcher<S> = Arc<dyn Fn(&S) -> Vec<Branch> + Send + Sync>;

/// One fan-out branch: the target node and the input slice it receives via
/// `NodeContext::branch_input`.
#[derive(Debug, Clone)]
pub struct Branch {
    pub node: String,
    pub input: Value,
}

impl Branch {
    pub fn new(node: impl Into<String>, input: Value) -> Self {
        Self {
            node: node.into(),
            input,
        }
    }
}

/// Outgoing edge of one node in a compiled graph.
pub(crate) enum Edge<S> {
    /// Always go to the named node (or END).
    Direct(String),
    /// Apply the router to post-node state and look the label up in `targets`.
    Conditional {
        router: Router<S>,
        targets: HashMap<String, String>,
    },
    /// Dispatch the returned branches concurrently, then continue at `join`
    /// (the single node every declared branch leads to).
    FanOut {
        dispatcher: Dispatcher<S>,
        join: String,
    },
}

impl<S> Clone for Edge<S> {
    fn clone(&self) -> Self {
        match self {
            Edge::Direct(to) => Edge::Direct(to.clone()),
            Edge::Conditional { router, targets } => Edge::Conditional {
                router: Arc::clone(router),
                targets: targets.clone(),
            },
            Edge::FanOut { dispatcher, join } => Edge::FanOut {
                dispatcher: Arc::clone(dispatcher),
                join: join.clone(),
            },
        }
    }
}
