//! Graph compilation errors.

use thiserror::Error;

/// Structural problem found while compiling a graph. All of these are
/// build-time configuration bugs, raised before anything runs.
#[derive(Debug, Error, PartialEq)]
pub enum CompilationError {
    /// An edge references a node id that was never added.
    #[error("edge references unknown node '{0}'")]
    NodeNotFound(String),

    /// The graph needs exactly one entry edge from START.
    #[error("graph needs exactly one entry edge from START")]
    MissingEntry,

    /// A node declared more than one outgoing edge.
    #[error("node '{0}' has more than one outgoing edge")]
    DuplicateEdge(String),

    /// The declared fan-out branches do not converge on a single fan-in node.
    #[error("fan-out from '{from}': {reason}")]
    FanOutJoin { from: String, reason: String },
}
