use std::future::Future;
use tokio::sync::watch;

/// Owner side of a cancellation signal.
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Cloneable view of a cancellation signal, checked at every suspension point.
#[derive(Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

impl CancelHandle {
    pub fn cancel(&self) {
        // send_replace succeeds even when every token has been dropped
        self.tx.send_replace(true);
    }
}

impl CancelToken {
    /// A token that is never cancelled.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation has been requested.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        let signalled = rx.wait_for(|c| *c).await.is_ok();
        if !signalled {
            // Handle dropped without cancelling: wait forever.
            std::future::pending::<()>().await;
        }
    }

    /// Runs `fut` unless cancellation arrives first, in which case `None`.
    pub async fn run_until_cancelled<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            _ = self.cancelled() => None,
            out = fut => Some(out),
        }
    }
}
