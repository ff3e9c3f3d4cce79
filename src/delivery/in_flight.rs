//! Counting of spawned delivery work
//!
//! Every task spawned through [`InFlight::spawn`] holds a token for its whole
//! life. The token is released when the task finishes or is dropped, and the
//! last release wakes anyone parked in [`InFlight::wait_idle`].

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Tracks sends and deliveries that have been spawned but not finished
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    pending: Arc<AtomicUsize>,
    idle: Arc<Notify>,
}

impl InFlight {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `future` on `handle`, counted until it completes or is aborted
    pub fn spawn<F>(&self, handle: &Handle, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let token = self.enter();
        handle.spawn(async move {
            let _token = token;
            future.await
        })
    }

    /// Number of tracked tasks still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Resolve once no tracked task is running.
    ///
    /// Tasks spawned while waiting are waited for too.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            // Register before checking so a release between the two is not missed
            notified.as_mut().enable();
            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }

    fn enter(&self) -> InFlightToken {
        self.pending.fetch_add(1, Ordering::AcqRel);
        InFlightToken {
            pending: Arc::clone(&self.pending),
            idle: Arc::clone(&self.idle),
        }
    }
}

struct InFlightToken {
    pending: Arc<AtomicUsize>,
    idle: Arc<Notify>,
}

impl Drop for InFlightToken {
    fn drop(&mut self) {
        if self.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.idle.notify_waiters();
        }
    }
}
