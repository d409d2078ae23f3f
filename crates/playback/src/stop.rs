//! Explicit stop signalling
//!
//! Each session owns one channel; session control holds the [`StopHandle`],
//! the driver polls or awaits the [`StopSignal`].

use tokio::sync::watch;

/// Create a connected stop handle/signal pair
pub fn stop_channel() -> (StopHandle, StopSignal) {
    let (tx, rx) = watch::channel(false);
    (StopHandle { tx }, StopSignal { rx })
}

/// Raises the stop flag
#[derive(Debug)]
pub struct StopHandle {
    tx: watch::Sender<bool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Observes the stop flag
///
/// A dropped [`StopHandle`] counts as a stop request.
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolve once stop is requested
    pub async fn stopped(&mut self) {
        // Err means the handle is gone
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_stop_wakes_waiter() {
        let (handle, mut signal) = stop_channel();
        assert!(!signal.is_stopped());

        let waiter = tokio::spawn(async move {
            signal.stopped().await;
            signal.is_stopped()
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.stop();

        assert!(waiter.await.unwrap());
        assert!(handle.is_stopped());
    }

    #[tokio::test]
    async fn test_dropped_handle_counts_as_stop() {
        let (handle, mut signal) = stop_channel();
        drop(handle);
        assert!(signal.is_stopped());
        signal.stopped().await;
    }
}
