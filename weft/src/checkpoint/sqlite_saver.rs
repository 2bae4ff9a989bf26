//! SQLite-backed checkpointer (feature `sqlite`).
//!
//! One row per thread holding the latest serialized state. Writes use
//! `INSERT OR REPLACE`, so the table never grows past one row per thread.

use std::marker::PhantomData;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension};

use super::{Checkpoint, CheckpointError, Checkpointer, JsonSerializer, Serializer};

/// Durable checkpointer for single-node deployments.
///
/// State must be JSON-serializable; [`JsonSerializer`] does the encoding.
/// The connection is guarded by a mutex; checkpoint writes are small and
/// serialized anyway by the per-thread execution model.
pub struct SqliteSaver<S> {
    conn: Mutex<Connection>,
    _state: PhantomData<fn() -> S>,
}

impl<S> SqliteSaver<S>
where
    S: Clone + Send + Sync + 'static + serde::Serialize + serde::de::DeserializeOwned,
{
    /// Opens (or creates) the database file and the checkpoints table.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CheckpointError> {
        let conn = Connection::open(path).map_err(|e| CheckpointError::Storage(e.to_string()))?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS checkpoints (
                thread_id TEXT PRIMARY KEY,
                step INTEGER NOT NULL,
                ts TEXT NOT NULL,
                state BLOB NOT NULL
            )",
            [],
        )
        .map_err(|e| CheckpointError::Storage(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
            _state: PhantomData,
        })
    }
}

#[async_trait]
impl<S> Checkpointer<S> for SqliteSaver<S>
where
    S: Clone + Send + Sync + 'static + serde::Serialize + serde::de::DeserializeOwned,
{
    async fn load(&self, thread_id: &str) -> Result<Option<Checkpoint<S>>, CheckpointError> {
        let row: Option<(u64, String, Vec<u8>)> = {
            let conn = self.conn.lock().expect("sqlite saver mutex");
            conn.query_row(
                "SELECT step, ts, state FROM checkpoints WHERE thread_id = ?1",
                [thread_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()
            .map_err(|e| CheckpointError::Storage(e.to_string()))?
        };
        match row {
            Some((step, ts, bytes)) => {
                let state = JsonSerializer.deserialize(&bytes)?;
                Ok(Some(Checkpoint { state, step, ts }))
            }
            None => Ok(None),
        }
    }

    async fn save(
        &self,
        thread_id: &str,
        checkpoint: &Checkpoint<S>,
    ) -> Result<(), CheckpointError> {
        let bytes = JsonSerializer.serialize(&checkpoint.state)?;
        let conn = self.conn.lock().expect("sqlite saver mutex");
        conn.execute(
            "INSERT OR REPLACE INTO checkpoints (thread_id, step, ts, state)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![thread_id, checkpoint.step, checkpoint.ts, bytes],
        )
        .map_err(|e| CheckpointError::Storage(e.to_string()))?;
        Ok(())
    }
}
