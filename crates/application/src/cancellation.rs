//! Explicit cancellation for long-running core operations
//!
//! A [`CancellationSource`] hands out cloneable [`CancellationToken`]s. Cancelling
//! the source wakes every token; operations that race their work against
//! [`CancellationToken::cancelled`] complete once with a cancellation error.

use tokio::sync::watch;

/// Owner side of a cancellation signal
#[derive(Debug)]
pub struct CancellationSource {
    tx: watch::Sender<bool>,
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationSource {
    /// Create a source that is not cancelled
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Hand out a token observing this source
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            rx: Some(self.tx.subscribe()),
        }
    }

    /// Signal cancellation to every token
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Whether [`cancel`](Self::cancel) has been called
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Observer side of a cancellation signal
#[derive(Debug, Clone)]
pub struct CancellationToken {
    rx: Option<watch::Receiver<bool>>,
}

impl CancellationToken {
    /// A token that is never cancelled
    #[must_use]
    pub const fn never() -> Self {
        Self { rx: None }
    }

    /// Whether cancellation has been signalled
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolve once cancellation is signalled
    ///
    /// Never resolves for [`CancellationToken::never`] or when the source is
    /// dropped without cancelling.
    pub async fn cancelled(&self) {
        let Some(rx) = &self.rx else {
            return std::future::pending().await;
        };
        let mut rx = rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
