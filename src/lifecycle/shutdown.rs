//! Graceful shutdown of the bridge.
//!
//! `Shutdown` is held by whoever decides when to stop (the OS signal task in
//! production, the test body in tests); each server holds a `ShutdownSignal`.

use tokio::sync::broadcast::{self, error::RecvError};

use crate::lifecycle::signals;

/// Shutdown coordinator.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver for one server or background task.
    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Ask every subscriber to stop. Returns how many were notified.
    pub fn trigger(&self) -> usize {
        self.tx.send(()).unwrap_or(0)
    }

    /// Trigger once SIGINT or SIGTERM arrives.
    pub fn trigger_on_os_signal(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            signals::wait_for_signal().await;
            let notified = self.trigger();
            tracing::info!(subscribers = notified, "Shutdown requested");
        })
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscriber side of [`Shutdown`].
pub struct ShutdownSignal {
    rx: broadcast::Receiver<()>,
}

impl ShutdownSignal {
    /// Resolve once shutdown has been triggered.
    ///
    /// If every `Shutdown` handle is dropped without triggering, this never
    /// resolves; the server then runs until the process exits.
    pub async fn recv(&mut self) {
        match self.rx.recv().await {
            Ok(()) | Err(RecvError::Lagged(_)) => {}
            Err(RecvError::Closed) => std::future::pending::<()>().await,
        }
    }
}
