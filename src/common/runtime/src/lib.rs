//! Async runtime utilities for GraphFS.
//!
//! Provides blocking entry points for synchronous callers and cooperative
//! cancellation for long-running whole-store operations.

use std::future::Future;

use common_error::{GraphFsError, GraphFsResult};
use tokio::runtime::Runtime;
use tokio::sync::watch;

/// Get or create a Tokio runtime for blocking operations.
pub fn get_runtime() -> GraphFsResult<Runtime> {
    Runtime::new().map_err(|e| GraphFsError::internal(format!("Failed to create runtime: {e}")))
}

/// Block on a future using the default runtime.
pub fn block_on<F: Future>(future: F) -> GraphFsResult<F::Output> {
    let runtime = get_runtime()?;
    Ok(runtime.block_on(future))
}

// ============================================================================
// Cancellation
// ============================================================================

/// Handle for requesting cancellation of an in-flight operation.
///
/// Cancellation is cooperative: the operation polls its [`CancellationToken`]
/// at safe points and abandons its staged work when it observes a request.
#[derive(Debug)]
pub struct CancellationHandle {
    cancel_tx: watch::Sender<bool>,
}

impl CancellationHandle {
    /// Create a new cancellation handle and the token observing it.
    pub fn new() -> (Self, CancellationToken) {
        let (tx, rx) = watch::channel(false);
        (Self { cancel_tx: tx }, CancellationToken { cancel_rx: rx })
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(true);
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        *self.cancel_tx.borrow()
    }

    /// Create another token observing this handle.
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            cancel_rx: self.cancel_tx.subscribe(),
        }
    }
}

impl Default for CancellationHandle {
    fn default() -> Self {
        Self::new().0
    }
}

/// Observer side of a [`CancellationHandle`].
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancel_rx: watch::Receiver<bool>,
}

impl CancellationToken {
    /// A token that is never cancelled.
    pub fn never() -> Self {
        let (_, rx) = watch::channel(false);
        Self { cancel_rx: rx }
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        *self.cancel_rx.borrow()
    }

    /// Return `Cancelled` if cancellation was requested.
    pub fn check(&self, operation: &str) -> GraphFsResult<()> {
        if self.is_cancelled() {
            Err(GraphFsError::cancelled(operation.to_string()))
        } else {
            Ok(())
        }
    }

    /// Resolve once cancellation is requested.
    ///
    /// Never resolves if the handle is dropped without cancelling.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.cancel_rx.borrow_and_update() {
                return;
            }
            if self.cancel_rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::never()
    }
}
