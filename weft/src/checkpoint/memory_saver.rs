//! In-memory checkpointer for dev and tests.

use async_trait::async_trait;
use dashmap::DashMap;

use super::{Checkpoint, CheckpointError, Checkpointer};

/// Keeps the latest checkpoint per thread in memory. Lost when dropped.
pub struct MemorySaver<S> {
    checkpoints: DashMap<String, Checkpoint<S>>,
}

impl<S> MemorySaver<S> {
    pub fn new() -> Self {
        Self {
            checkpoints: DashMap::new(),
        }
    }
}

impl<S> Default for MemorySaver<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<S> Checkpointer<S> for MemorySaver<S>
where
    S: Clone + Send + Sync + 'static,
{
    async fn load(&self, thread_id: &str) -> Result<Option<Checkpoint<S>>, CheckpointError> {
        Ok(self
            .checkpoints
            .get(thread_id)
            .map(|entry| entry.value().clone()))
    }

    async fn save(
        &self,
        thread_id: &str,
        checkpoint: &Checkpoint<S>,
    ) -> Result<(), CheckpointError> {
        self.checkpoints
            .insert(thread_id.to_string(), checkpoint.clone());
        Ok(())
    }
}
