//! Compiled graph: the execution loop.
//!
//! Immutable once built. The loop is: run current node → apply its patches →
//! persist checkpoint → resolve the next step from the edge map → stop on
//! END. Fan-out branches run as concurrent tasks and are joined before the
//! fan-in node; their patches merge in dispatch order, so replace fields are
//! deterministic and append fields lose nothing regardless of which branch
//! finished first.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::checkpoint::{Checkpoint, Checkpointer};
use crate::error::GraphError;
use crate::graph::config::{RunConfig, DEFAULT_RECURSION_LIMIT};
use crate::graph::edge::{Branch, Edge};
use crate::graph::node::{Node, NodeContext, NodeOutput};
use crate::graph::state_graph::END;
use crate::state::GraphState;
use crate::stream::{StreamEvent, StreamMode};

struct StreamSink<S> {
    tx: mpsc::Sender<StreamEvent<S>>,
    modes: HashSet<StreamMode>,
}

/// Executable graph produced by `StateGraph::compile`.
///
/// **Interaction**: `invoke` runs one turn for a thread; `stream` emits
/// per-node events while doing the same. Cloning is cheap (shared nodes).
pub struct CompiledGraph<S: GraphState> {
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    edges: HashMap<String, Edge<S>>,
    entry: String,
    checkpointer: Option<Arc<dyn Checkpointer<S>>>,
}

impl<S: GraphState> Clone for CompiledGraph<S> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            entry: self.entry.clone(),
            checkpointer: self.checkpointer.clone(),
        }
    }
}

/// Runs one node with the configured timeout and cancellation guards. Owns
/// its inputs so fan-out branches can move it into spawned tasks.
async fn run_guarded<S: GraphState>(
    node: Arc<dyn Node<S>>,
    name: String,
    state: S,
    ctx: NodeContext,
    step_timeout: Option<Duration>,
    cancellation: Option<CancellationToken>,
) -> Result<NodeOutput<S>, GraphError> {
    let work = async {
        match step_timeout {
            Some(budget) => tokio::time::timeout(budget, node.run(&state, &ctx))
                .await
                .map_err(|_| GraphError::StepTimeout(name.clone()))?,
            None => node.run(&state, &ctx).await,
        }
    };
    match cancellation {
        Some(token) => tokio::select! {
            _ = token.cancelled() => Err(GraphError::Cancelled),
            result = work => result,
        },
        None => work.await,
    }
}

impl<S: GraphState> CompiledGraph<S> {
    pub(crate) fn new(
        nodes: HashMap<String, Arc<dyn Node<S>>>,
        edges: HashMap<String, Edge<S>>,
        entry: String,
        checkpointer: Option<Arc<dyn Checkpointer<S>>>,
    ) -> Self {
        Self {
            nodes,
            edges,
            entry,
            checkpointer,
        }
    }

    /// Runs one turn for the thread in `config`: loads the thread's
    /// checkpoint (or starts from `S::default()`), applies the caller's input
    /// patch, executes to completion, and returns the final state.
    pub async fn invoke(&self, input: S::Update, config: RunConfig) -> Result<S, GraphError>
    where
        S: Default,
    {
        let mut state = self.load_or_default(&config).await?;
        state.apply(input);
        self.run_loop(state, &config, None).await
    }

    /// Runs from an explicit starting state, ignoring any existing
    /// checkpoint. Checkpoints are still written when configured.
    pub async fn invoke_state(&self, state: S, config: RunConfig) -> Result<S, GraphError> {
        self.run_loop(state, &config, None).await
    }

    /// Streaming variant of [`invoke`](Self::invoke): emits the requested
    /// event kinds per node and, on failure, a final `Error` event.
    pub fn stream(
        &self,
        input: S::Update,
        config: RunConfig,
        modes: impl IntoIterator<Item = StreamMode>,
    ) -> ReceiverStream<StreamEvent<S>>
    where
        S: Default,
    {
        let (tx, rx) = mpsc::channel(128);
        let graph = self.clone();
        let modes: HashSet<StreamMode> = modes.into_iter().collect();

        tokio::spawn(async move {
            let sink = StreamSink {
                tx: tx.clone(),
                modes,
            };
            let run = async {
                let mut state = graph.load_or_default(&config).await?;
                state.apply(input);
                graph.run_loop(state, &config, Some(&sink)).await
            };
            if let Err(e) = run.await {
                let _ = tx.send(StreamEvent::Error(e.to_string())).await;
            }
        });

        ReceiverStream::new(rx)
    }

    async fn load_or_default(&self, config: &RunConfig) -> Result<S, GraphError>
    where
        S: Default,
    {
        if let (Some(cp), Some(thread_id)) = (&self.checkpointer, &config.thread_id) {
            if let Some(checkpoint) = cp.load(thread_id).await? {
                trace!(thread_id = %thread_id, step = checkpoint.step, "resuming from checkpoint");
                return Ok(checkpoint.state);
            }
        }
        Ok(S::default())
    }

    async fn save_checkpoint(
        &self,
        state: &S,
        step: u64,
        config: &RunConfig,
    ) -> Result<(), GraphError> {
        if let (Some(cp), Some(thread_id)) = (&self.checkpointer, &config.thread_id) {
            cp.save(thread_id, &Checkpoint::from_state(state.clone(), step))
                .await?;
        }
        Ok(())
    }

    async fn emit(&self, sink: Option<&StreamSink<S>>, node: &str, state: &S) {
        if let Some(sink) = sink {
            if sink.modes.contains(&StreamMode::Values) {
                let _ = sink.tx.send(StreamEvent::Values(state.clone())).await;
            }
            if sink.modes.contains(&StreamMode::Updates) {
                let _ = sink
                    .tx
                    .send(StreamEvent::Updates {
                        node: node.to_string(),
                        state: state.clone(),
                    })
                    .await;
            }
        }
    }

    async fn run_loop(
        &self,
        mut state: S,
        config: &RunConfig,
        sink: Option<&StreamSink<S>>,
    ) -> Result<S, GraphError> {
        let limit = config.recursion_limit.unwrap_or(DEFAULT_RECURSION_LIMIT);
        let mut current = self.entry.clone();
        let mut steps: usize = 0;

        loop {
            if steps >= limit {
                return Err(GraphError::RecursionLimit(limit));
            }
            steps += 1;

            let node = self
                .nodes
                .get(&current)
                .ok_or_else(|| GraphError::Execution(format!("node '{current}' not found")))?
                .clone();
            debug!(node = %current, step = steps, "running node");
            let ctx = NodeContext {
                branch_input: None,
                thread_id: config.thread_id.clone(),
            };
            let output = run_guarded(
                node,
                current.clone(),
                state.clone(),
                ctx,
                config.step_timeout,
                config.cancellation.clone(),
            )
            .await?;
            for update in output.updates {
                state.apply(update);
            }
            self.save_checkpoint(&state, steps as u64, config).await?;
            self.emit(sink, &current, &state).await;

            let next = match self.edges.get(&current) {
                // No outgoing edge behaves like an edge to END.
                None => END.to_string(),
                Some(Edge::Direct(to)) => to.clone(),
                Some(Edge::Conditional { router, targets }) => {
                    let label = router(&state);
                    match targets.get(&label) {
                        Some(to) => to.clone(),
                        None => {
                            return Err(GraphError::UnknownRoute {
                                node: current.clone(),
                                label,
                            })
                        }
                    }
                }
                Some(Edge::FanOut { dispatcher, join }) => {
                    let branches = dispatcher(&state);
                    steps += branches.len();
                    state = self
                        .run_branches(state, branches, &current, config)
                        .await?;
                    self.save_checkpoint(&state, steps as u64, config).await?;
                    self.emit(sink, &current, &state).await;
                    join.clone()
                }
            };

            if next == END {
                return Ok(state);
            }
            current = next;
        }
    }

    /// Runs fan-out branches concurrently and merges their patches into the
    /// shared state in dispatch order. Join semantics: waits for all branches.
    async fn run_branches(
        &self,
        mut state: S,
        branches: Vec<Branch>,
        from: &str,
        config: &RunConfig,
    ) -> Result<S, GraphError> {
        if branches.is_empty() {
            return Ok(state);
        }

        let mut tasks: JoinSet<(usize, Result<NodeOutput<S>, GraphError>)> = JoinSet::new();
        for (index, branch) in branches.into_iter().enumerate() {
            let node = self
                .nodes
                .get(&branch.node)
                .ok_or_else(|| GraphError::UnknownRoute {
                    node: from.to_string(),
                    label: branch.node.clone(),
                })?
                .clone();
            let snapshot = state.clone();
            let ctx = NodeContext {
                branch_input: Some(branch.input),
                thread_id: config.thread_id.clone(),
            };
            let name = branch.node;
            let step_timeout = config.step_timeout;
            let cancellation = config.cancellation.clone();
            tasks.spawn(async move {
                (
                    index,
                    run_guarded(node, name, snapshot, ctx, step_timeout, cancellation).await,
                )
            });
        }

        let mut outputs: Vec<Option<NodeOutput<S>>> = Vec::new();
        outputs.resize_with(tasks.len(), || None);
        while let Some(joined) = tasks.join_next().await {
            let (index, result) =
                joined.map_err(|e| GraphError::Execution(format!("branch task failed: {e}")))?;
            outputs[index] = Some(result?);
        }

        for output in outputs.into_iter().flatten() {
            for update in output.updates {
                state.apply(update);
            }
        }
        Ok(state)
    }
}
