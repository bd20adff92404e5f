//! One-shot timers bound to their owner's lifetime

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Events a session schedules for itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Feedback delay elapsed for the given round
    AdvanceRound { round_no: u64 },
    /// "Copied" flag expired for the given share
    ClearCopied { generation: u64 },
}

/// A spawned task that posts `event` after `delay`.
///
/// Dropping the timer aborts the task, so a session that goes away never
/// receives callbacks from rounds it no longer owns.
#[derive(Debug)]
pub struct ScopedTimer {
    handle: JoinHandle<()>,
}

impl ScopedTimer {
    pub fn schedule<T: Send + 'static>(
        delay: Duration,
        tx: mpsc::UnboundedSender<T>,
        event: T,
    ) -> Self {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the session ended
            let _ = tx.send(event);
        });
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
