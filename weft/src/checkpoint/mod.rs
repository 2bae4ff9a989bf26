//! Checkpointing: per-thread state snapshots.
//!
//! The executor saves a checkpoint after every node, so a crash between
//! turns loses at most the in-flight node's effect, and a new invoke on the
//! same thread resumes from the saved state instead of replaying history.
//! Checkpoints are keyed strictly by thread id; the engine never deletes them
//! (retention is a caller concern).
//!
//! | Type          | Persistence | Feature  |
//! |---------------|-------------|----------|
//! | [`MemorySaver`] | In-memory | —        |
//! | [`SqliteSaver`] | SQLite file | `sqlite` |

mod memory_saver;
mod serializer;
#[cfg(feature = "sqlite")]
mod sqlite_saver;

pub use memory_saver::MemorySaver;
pub use serializer::{JsonSerializer, Serializer};
#[cfg(feature = "sqlite")]
pub use sqlite_saver::SqliteSaver;

use std::time::SystemTime;

use async_trait::async_trait;
use thiserror::Error;

/// Checkpoint store failure.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("checkpoint serialization failed: {0}")]
    Serialization(String),
    #[error("checkpoint storage failed: {0}")]
    Storage(String),
}

/// One snapshot of graph state for a thread.
#[derive(Debug, Clone)]
pub struct Checkpoint<S> {
    pub state: S,
    /// Step counter at save time, for observability.
    pub step: u64,
    /// Milliseconds since the epoch at save time.
    pub ts: String,
}

impl<S> Checkpoint<S> {
    /// Snapshot of the current state, stamped with the current time.
    pub fn from_state(state: S, step: u64) -> Self {
        let ts = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0)
            .to_string();
        Self { state, step, ts }
    }
}

/// Per-thread checkpoint store.
///
/// **Interaction**: driven by `CompiledGraph` after every node; `load` feeds
/// the next invoke on the same thread. Implementations must round-trip the
/// state exactly, every field restored as saved.
#[async_trait]
pub trait Checkpointer<S>: Send + Sync
where
    S: Clone + Send + Sync + 'static,
{
    async fn load(&self, thread_id: &str) -> Result<Option<Checkpoint<S>>, CheckpointError>;
    async fn save(&self, thread_id: &str, checkpoint: &Checkpoint<S>)
        -> Result<(), CheckpointError>;
}
