//! Periodic enable-flag polling.
//!
//! The host stores the per-document enable flag but offers no change
//! notification for it, so the engine polls on a fixed interval and
//! attaches or detaches when the flag disagrees with the current state.
//! Latency is bounded by one interval; a flag that was never written
//! reads as disabled.

use crate::engine::IndentEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Cancellation handle for a running enable-flag poll task.
///
/// Holding the handle is what "the watch is running" means; aborting it
/// halts the periodic task. Deferred edit updates are unaffected.
pub struct ModeWatch {
    handle: JoinHandle<()>,
}

impl ModeWatch {
    /// Spawn the poll task for `engine`, firing every `period`.
    pub(crate) fn spawn(engine: Arc<IndentEngine>, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                engine.poll_enable_flag();
            }
        });
        Self { handle }
    }

    /// Whether the poll task has already terminated.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Halt the poll task. Only future firings are prevented.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

impl Drop for ModeWatch {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
