//! Trailing-edge debounce over a cancellable timer.
//!
//! Each trigger cancels the pending timer and schedules the new action, so
//! of a burst of triggers only the one followed by a full quiet period
//! actually runs. There is no maximum-wait cutoff and no leading edge.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;

/// One debouncer per tracked surface; bursts on one never affect another.
#[derive(Debug)]
pub struct Debouncer {
    wait: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            pending: None,
        }
    }

    /// Schedule `action` to run after the quiet period, cancelling any
    /// previously scheduled action. Must be called from within a runtime.
    pub fn trigger<F>(&mut self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        let wait = self.wait;
        self.pending = Some(tokio::spawn(async move {
            time::sleep(wait).await;
            action();
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
