//! Graph execution error types.
//!
//! Node-local failures that the model can act on (bad tool arguments, handler
//! errors) never surface here; the tool registry turns those into tool-result
//! messages and the loop continues. `GraphError` covers the infrastructure
//! failures that terminate a run: routing misconfiguration, an unreachable
//! model backend, cancellation, and runaway cycles.

use thiserror::Error;

use crate::checkpoint::CheckpointError;
use crate::model::ModelError;

/// Terminal failure of a graph run.
///
/// Returned by `CompiledGraph::invoke`. The caller always receives one of
/// these explicitly; the engine never swallows an infrastructure failure into
/// an empty or fabricated response.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A conditional edge produced a label with no registered target. This is
    /// a configuration bug in the graph, not a runtime condition to retry.
    #[error("no target registered for route '{label}' out of node '{node}'")]
    UnknownRoute { node: String, label: String },

    /// The run executed more steps than the configured recursion limit.
    /// Guards model-driven cycles (e.g. a rewrite loop that never converges).
    #[error("recursion limit of {0} steps exceeded")]
    RecursionLimit(usize),

    /// The caller's cancellation token fired. The in-flight node's effects
    /// were discarded; the last saved checkpoint is the resumption point.
    #[error("run cancelled")]
    Cancelled,

    /// A single node exceeded the per-invocation step timeout.
    #[error("node '{0}' exceeded the step timeout")]
    StepTimeout(String),

    /// The model backend failed or was unreachable.
    #[error("model call failed: {0}")]
    Model(#[from] ModelError),

    /// Checkpoint load or save failed.
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),

    /// Anything else that aborts execution (missing node, panicked branch task).
    #[error("execution failed: {0}")]
    Execution(String),
}
