//! Shutdown coordination.
//!
//! Process-level shutdown terminates both listeners; there is no drain
//! contract beyond what each listener provides natively (the Gemini accept
//! loop stops accepting, axum finishes its graceful shutdown).

use tokio::sync::broadcast;

/// Broadcast-based shutdown signal shared by both listeners.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the signal; each listener holds its own receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Fire the signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Trigger on Ctrl+C. Run this as its own task next to the servers.
    pub async fn trigger_on_ctrl_c(&self) {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
            self.trigger();
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
