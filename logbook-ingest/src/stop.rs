//! StopSignal: an interruptible sleep for the scheduler loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender};

/// Cloneable stop flag. `stop()` wakes a sleeping loop immediately instead
/// of letting it wait out the current backoff.
#[derive(Debug, Clone)]
pub struct StopSignal {
    stopped: Arc<AtomicBool>,
    wake_tx: Sender<()>,
    wake_rx: Receiver<()>,
}

impl StopSignal {
    pub fn new() -> Self {
        let (wake_tx, wake_rx) = bounded(1);
        Self {
            stopped: Arc::new(AtomicBool::new(false)),
            wake_tx,
            wake_rx,
        }
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        // A full channel already holds a pending wake-up.
        let _ = self.wake_tx.try_send(());
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Block for up to `timeout`. Returns `true` when stopped.
    pub fn sleep(&self, timeout: Duration) -> bool {
        if self.is_stopped() {
            return true;
        }
        // Timeout and wake-up both end the wait; the flag decides.
        let _ = self.wake_rx.recv_timeout(timeout);
        self.is_stopped()
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}
