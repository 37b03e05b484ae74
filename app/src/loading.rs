use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Global "busy" indicator. Counts outstanding requests, so it stays on until
/// the last of several concurrent requests finishes.
#[derive(Debug, Clone, Default)]
pub struct LoadingIndicator {
    in_flight: Arc<AtomicUsize>,
}

impl LoadingIndicator {
    /// Marks one request as started. The returned guard marks it finished
    /// when dropped, including on early return, error or cancellation.
    pub fn begin(&self) -> LoadingGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        LoadingGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight() > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
#[must_use = "the indicator turns off as soon as the guard is dropped"]
pub struct LoadingGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
