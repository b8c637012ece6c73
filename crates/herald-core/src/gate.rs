//! Single-flight gate keeping at most one dispatch outstanding.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Default)]
pub(crate) struct InFlightGate {
    claimed: Arc<AtomicBool>,
}

impl InFlightGate {
    /// Claims the gate, or returns `None` while another guard holds it.
    pub(crate) fn try_claim(&self) -> Option<InFlightGuard> {
        self.claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard {
                claimed: Arc::clone(&self.claimed),
            })
    }

    pub(crate) fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::Acquire)
    }
}

/// Releases the gate when dropped.
#[derive(Debug)]
pub(crate) struct InFlightGuard {
    claimed: Arc<AtomicBool>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.claimed.store(false, Ordering::Release);
    }
}
