//! Per-invocation run configuration.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Default step budget per invocation. A model ⇄ tools round trip is two
/// steps, so this allows a dozen tool rounds before the run is declared
/// runaway.
pub const DEFAULT_RECURSION_LIMIT: usize = 25;

/// Config for a single invoke.
///
/// `thread_id` identifies the conversation for checkpointing; two different
/// thread ids share nothing and may run concurrently. The limits are
/// per-invocation knobs, deliberately not hardcoded into the engine.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Conversation/thread id. Required for checkpoint persistence; runs
    /// without one are ephemeral.
    pub thread_id: Option<String>,
    /// Maximum executed steps (nodes and fan-out branches) before the run
    /// fails with `RecursionLimit`. Defaults to [`DEFAULT_RECURSION_LIMIT`].
    pub recursion_limit: Option<usize>,
    /// Per-node wall clock budget. `None` means no timeout.
    pub step_timeout: Option<Duration>,
    /// Caller-supplied cancellation. Aborts the in-flight node without
    /// applying its effects; the last saved checkpoint remains valid.
    pub cancellation: Option<CancellationToken>,
}

impl RunConfig {
    pub fn for_thread(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: Some(thread_id.into()),
            ..Default::default()
        }
    }

    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = Some(limit);
        self
    }

    pub fn with_step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout = Some(timeout);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}
