//! Streaming events emitted during graph execution.

/// What to emit while a graph runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamMode {
    /// Full state snapshot after each node.
    Values,
    /// Node id plus state after that node.
    Updates,
}

/// An event on the execution stream.
///
/// A failed run ends with a single `Error` event: infrastructure failures
/// are never silently dropped from the stream.
#[derive(Debug, Clone)]
pub enum StreamEvent<S> {
    Values(S),
    Updates { node: String, state: S },
    Error(String),
}
