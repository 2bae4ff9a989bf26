//! State graph builder: nodes plus explicit edges, validated at compile time.
//!
//! Add nodes with `add_node`, wire them with `add_edge` / `add_conditional_edges`
//! / `add_fanout_edges` using `START` and `END` for graph entry/exit, then
//! `compile` (or `compile_with_checkpointer`) to get an executable
//! [`CompiledGraph`]. Aligns with LangGraph's `StateGraph`: cycles are legal;
//! the run-time recursion limit bounds them, not the builder.

use std::collections::HashMap;
use std::sync::Arc;

use crate::checkpoint::Checkpointer;
use crate::graph::compile_error::CompilationError;
use crate::graph::compiled::CompiledGraph;
use crate::graph::edge::{Dispatcher, Edge, Router};
use crate::graph::node::Node;
use crate::state::GraphState;

/// Sentinel for graph entry: use as `from` in `add_edge(START, first_node)`.
pub const START: &str = "__start__";

/// Sentinel for graph exit: use as a target in any edge kind.
pub const END: &str = "__end__";

enum EdgeSpec<S> {
    Direct {
        to: String,
    },
    Conditional {
        router: Router<S>,
        targets: HashMap<String, String>,
    },
    FanOut {
        dispatcher: Dispatcher<S>,
        branches: Vec<String>,
    },
}

/// Mutable graph under construction.
///
/// **Interaction**: Accepts `Arc<dyn Node<S>>`; produces [`CompiledGraph<S>`].
pub struct StateGraph<S: GraphState> {
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    edges: Vec<(String, EdgeSpec<S>)>,
}

impl<S: GraphState> Default for StateGraph<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GraphState> StateGraph<S> {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: Vec::new(),
        }
    }

    /// Adds a node; id must be unique. Replaces if same id.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node<S>>) -> &mut Self {
        self.nodes.insert(id.into(), node);
        self
    }

    /// Adds an unconditional edge from `from` to `to`.
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.edges.push((
            from.into(),
            EdgeSpec::Direct { to: to.into() },
        ));
        self
    }

    /// Adds a routed edge: after `from` runs, `router` maps post-node state to
    /// a label, and `targets` maps labels to node ids (or [`END`]). A label
    /// outside `targets` fails the run with `UnknownRoute`.
    pub fn add_conditional_edges(
        &mut self,
        from: impl Into<String>,
        router: Router<S>,
        targets: &[(&str, &str)],
    ) -> &mut Self {
        self.edges.push((
            from.into(),
            EdgeSpec::Conditional {
                router,
                targets: targets
                    .iter()
                    .map(|(label, to)| (label.to_string(), to.to_string()))
                    .collect(),
            },
        ));
        self
    }

    /// Adds a fan-out edge: after `from` runs, `dispatcher` produces the
    /// branches to run concurrently. Every node in `branches` must also have
    /// a static edge, and all of those must lead to the same fan-in node.
    pub fn add_fanout_edges(
        &mut self,
        from: impl Into<String>,
        dispatcher: Dispatcher<S>,
        branches: &[&str],
    ) -> &mut Self {
        self.edges.push((
            from.into(),
            EdgeSpec::FanOut {
                dispatcher,
                branches: branches.iter().map(|b| b.to_string()).collect(),
            },
        ));
        self
    }

    /// Builds the executable graph without persistence.
    pub fn compile(self) -> Result<CompiledGraph<S>, CompilationError> {
        self.compile_internal(None)
    }

    /// Builds the executable graph with a checkpointer; runs invoked with a
    /// `thread_id` persist state after every node.
    pub fn compile_with_checkpointer(
        self,
        checkpointer: Arc<dyn Checkpointer<S>>,
    ) -> Result<CompiledGraph<S>, CompilationError> {
        self.compile_internal(Some(checkpointer))
    }

    fn check_target(&self, id: &str) -> Result<(), CompilationError> {
        if id != END && !self.nodes.contains_key(id) {
            return Err(CompilationError::NodeNotFound(id.to_string()));
        }
        Ok(())
    }

    fn compile_internal(
        self,
        checkpointer: Option<Arc<dyn Checkpointer<S>>>,
    ) -> Result<CompiledGraph<S>, CompilationError> {
        // Every referenced node must exist.
        for (from, spec) in &self.edges {
            if from != START && !self.nodes.contains_key(from) {
                return Err(CompilationError::NodeNotFound(from.clone()));
            }
            match spec {
                EdgeSpec::Direct { to } => self.check_target(to)?,
                EdgeSpec::Conditional { targets, .. } => {
                    for to in targets.values() {
                        self.check_target(to)?;
                    }
                }
                EdgeSpec::FanOut { branches, .. } => {
                    for b in branches {
                        if !self.nodes.contains_key(b) {
                            return Err(CompilationError::NodeNotFound(b.clone()));
                        }
                    }
                }
            }
        }

        // Exactly one entry edge.
        let entry_edges: Vec<String> = self
            .edges
            .iter()
            .filter_map(|(from, spec)| match spec {
                EdgeSpec::Direct { to } if from == START => Some(to.clone()),
                _ => None,
            })
            .collect();
        if entry_edges.len() != 1 {
            return Err(CompilationError::MissingEntry);
        }
        let entry = entry_edges.into_iter().next().expect("one entry edge");

        // One outgoing edge per node.
        let mut edges: HashMap<String, Edge<S>> = HashMap::new();
        let mut specs: HashMap<String, EdgeSpec<S>> = HashMap::new();
        for (from, spec) in self.edges {
            if from == START {
                continue;
            }
            if specs.insert(from.clone(), spec).is_some() {
                return Err(CompilationError::DuplicateEdge(from));
            }
        }

        // Resolve fan-out joins: every declared branch must have a direct edge
        // and all branch edges must agree on one fan-in node.
        let mut joins: HashMap<String, String> = HashMap::new();
        for (from, spec) in &specs {
            if let EdgeSpec::FanOut { branches, .. } = spec {
                let mut join: Option<String> = None;
                for branch in branches {
                    let to = match specs.get(branch) {
                        Some(EdgeSpec::Direct { to }) => to.clone(),
                        _ => {
                            return Err(CompilationError::FanOutJoin {
                                from: from.clone(),
                                reason: format!("branch '{branch}' needs a static edge"),
                            })
                        }
                    };
                    match &join {
                        None => join = Some(to),
                        Some(existing) if *existing == to => {}
                        Some(existing) => {
                            return Err(CompilationError::FanOutJoin {
                                from: from.clone(),
                                reason: format!(
                                    "branches lead to both '{existing}' and '{to}'"
                                ),
                            })
                        }
                    }
                }
                match join {
                    Some(join) => {
                        joins.insert(from.clone(), join);
                    }
                    None => {
                        return Err(CompilationError::FanOutJoin {
                            from: from.clone(),
                            reason: "no branches declared".into(),
                        })
                    }
                }
            }
        }

        for (from, spec) in specs {
            let edge = match spec {
                EdgeSpec::Direct { to } => Edge::Direct(to),
                EdgeSpec::Conditional { router, targets } => Edge::Conditional { router, targets },
                EdgeSpec::FanOut { dispatcher, .. } => Edge::FanOut {
                    dispatcher,
                    join: joins
                        .get(&from)
                        .cloned()
                        .expect("fan-out join resolved during validation"),
                },
            };
            edges.insert(from, edge);
        }

        Ok(CompiledGraph::new(self.nodes, edges, entry, checkpointer))
    }
}
