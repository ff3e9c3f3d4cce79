use std::future::Future;

use tokio::task::JoinHandle;

use super::core::Client;
use crate::report::ReportError;
use crate::utils::INTERRUPT_EXIT_CODE;

/// What the interrupt task does once its teardown flush finished
pub enum AfterFlush {
    /// Exit the process with this status
    Exit(i32),
    /// Run the host's own interrupt handling
    Chain(Box<dyn FnOnce() + Send>),
}

impl AfterFlush {
    pub fn chain<F>(handler: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self::Chain(Box::new(handler))
    }
}

impl Default for AfterFlush {
    /// Exit with 130, the status a shell reports for a SIGINT kill
    fn default() -> Self {
        Self::Exit(INTERRUPT_EXIT_CODE)
    }
}

impl std::fmt::Debug for AfterFlush {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exit(code) => f.debug_tuple("Exit").field(code).finish(),
            Self::Chain(_) => f.write_str("Chain(..)"),
        }
    }
}

impl Client {
    /// Flush and uninstall; call when the host is about to exit.
    ///
    /// Waits for every spawned send and delivery to finish, cancels the
    /// debounce timer, delivers everything buffered through the request
    /// transport and waits for it, then uninstalls every plugin's
    /// instrumentation. The flush error, if any, is returned after the
    /// uninstall has run. Returns the number of records flushed.
    pub async fn teardown(&self) -> Result<usize, ReportError> {
        let in_flight = self.inner.reporter.delivery().in_flight().clone();
        if in_flight.pending() > 0 {
            log::debug!("Teardown waiting for {} in-flight tasks", in_flight.pending());
        }
        in_flight.wait_idle().await;

        let flushed = self.inner.reporter.flush_all().await;
        match &flushed {
            Ok(count) => log::debug!("Teardown flushed {count} records"),
            Err(e) => log::warn!("Teardown flush failed: {e}"),
        }
        // Sends dispatched while the flush was running
        in_flight.wait_idle().await;

        for activation in self.take_activations() {
            log::debug!(
                "Releasing bus with {} registered events",
                activation.bus.events().len()
            );
            for guard in activation.guards {
                guard.uninstall();
            }
        }
        flushed
    }

    /// Flush on Ctrl-C, then exit the process with status 130.
    ///
    /// Installing the listener replaces the default SIGINT handling for the
    /// whole process, so the task exits itself once teardown is done. Hosts
    /// that need their own shutdown sequence should use
    /// [`flush_on_interrupt`](Self::flush_on_interrupt) with
    /// [`AfterFlush::chain`] instead.
    pub fn flush_on_ctrl_c(&self) -> JoinHandle<()> {
        self.flush_on_interrupt(tokio::signal::ctrl_c(), AfterFlush::default())
    }

    /// Run [`teardown`](Self::teardown) when `signal` resolves, then `after`.
    ///
    /// # Arguments
    ///
    /// * `signal` - Resolves when the host is interrupted, e.g. `tokio::signal::ctrl_c()`
    /// * `after` - Exit with a status, or hand over to the host's handler
    ///
    /// # Returns
    ///
    /// The spawned listener task. If `signal` fails, nothing was installed;
    /// the failure is logged and `after` is not run.
    pub fn flush_on_interrupt<S>(&self, signal: S, after: AfterFlush) -> JoinHandle<()>
    where
        S: Future<Output = std::io::Result<()>> + Send + 'static,
    {
        let client = self.downgrade();
        self.inner.handle.spawn(async move {
            if let Err(e) = signal.await {
                tracing::warn!(error = %e, "Failed to listen for interrupt; teardown flush disabled");
                return;
            }
            tracing::debug!("Interrupt received; flushing telemetry");
            if let Some(client) = client.upgrade()
                && let Err(e) = client.teardown().await
            {
                tracing::warn!(error = %e, "Teardown flush on interrupt failed");
            }
            match after {
                AfterFlush::Exit(code) => {
                    tracing::debug!(code, "Exiting after interrupt flush");
                    std::process::exit(code);
                }
                AfterFlush::Chain(handler) => handler(),
            }
        })
    }
}
