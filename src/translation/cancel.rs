/*!
 * Cooperative cancellation for translation work.
 *
 * A token is cloned into the orchestration worker and polled at defined
 * points: before each segment attempt and before each retry iteration.
 * While a network call is in flight the worker selects between the call
 * and `cancelled()`, so cancellation aborts the call instead of waiting
 * for it to finish.
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// Clonable cancellation token shared between the orchestration worker and
/// whichever task interrupts it
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<CancelState>,
}

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancellationToken {
    /// Create a token in the not-cancelled state
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    ///
    /// Atomic and idempotent; safe to call from any task, any number of
    /// times. Wakes every task parked in `cancelled()`.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once cancellation has been requested.
    ///
    /// Interest is registered before the flag is re-checked, so a `cancel()`
    /// racing with this call can never be missed.
    pub async fn cancelled(&self) {
        loop {
            if self.is_cancelled() {
                return;
            }
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}
