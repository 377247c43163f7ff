//! Stop signal for long mining runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Polled by `Apriori` before each level and by the parallel support
/// counter before each chunk of transactions.
pub trait Cancellable {
    /// True once any holder has asked the run to stop.
    fn is_cancelled(&self) -> bool;

    /// Asks every run holding this signal to stop at its next check.
    fn cancel(&self);
}

/// Shared flag; clones observe the same state, so a caller keeps one
/// clone and hands another to the miner.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    stopped: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cancellable for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    fn cancel(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let token = CancellationToken::new();
        let handed_to_miner = token.clone();
        assert!(!handed_to_miner.is_cancelled());
        token.cancel();
        assert!(handed_to_miner.is_cancelled());
    }
}
