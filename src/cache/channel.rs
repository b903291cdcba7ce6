//! Async Result Delivery
//!
//! The mechanism by which fetch completions reach callers that live on a
//! different execution context than the fetch itself.
//!
//! ## Guarantees
//!
//! - Completion is at-most-once per slot: `complete` consumes the sender.
//! - Any number of independent observers may clone the handle; all of them
//!   observe the one completion.
//! - Observers that lost interest simply drop their handle; delivery to a
//!   slot with no remaining observers is a silent no-op, never an error.
//!   There is no true cancellation — an in-flight producer runs to
//!   completion regardless.

use tokio::sync::watch;

/// Create a completion slot and its first observer handle.
pub fn result_channel<T: Clone>() -> (ResultSlot<T>, ResultHandle<T>) {
    let (tx, rx) = watch::channel(None);
    (ResultSlot { tx }, ResultHandle { rx })
}

/// Producer side: completes exactly one value, then is gone.
#[derive(Debug)]
pub struct ResultSlot<T> {
    tx: watch::Sender<Option<T>>,
}

impl<T: Clone> ResultSlot<T> {
    /// Deliver the result to every live observer. Consuming `self` makes a
    /// second completion unrepresentable. No observers left is fine.
    pub fn complete(self, value: T) {
        let _ = self.tx.send(Some(value));
    }
}

/// Observer side: await the result, or peek without blocking.
#[derive(Debug, Clone)]
pub struct ResultHandle<T> {
    rx: watch::Receiver<Option<T>>,
}

impl<T: Clone> ResultHandle<T> {
    /// Wait for the producer to complete. `None` only when the producer was
    /// dropped without completing (an abandoned fetch task).
    pub async fn wait(mut self) -> Option<T> {
        loop {
            if let Some(value) = self.rx.borrow().as_ref().cloned() {
                return Some(value);
            }
            if self.rx.changed().await.is_err() {
                // Producer gone; report whatever it left behind.
                return self.rx.borrow().as_ref().cloned();
            }
        }
    }

    /// Non-blocking peek at the result, if it has arrived.
    pub fn try_peek(&self) -> Option<T> {
        self.rx.borrow().as_ref().cloned()
    }
}

// =============================================================================
// Tests
// =============================================================================
