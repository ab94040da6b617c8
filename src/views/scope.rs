use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Lifetime flag of one mounted view.
///
/// Async work started for a view holds a clone and drops its result once the
/// view has been left.
#[derive(Debug, Clone)]
pub struct ViewScope {
    active: Arc<AtomicBool>,
}

impl ViewScope {
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn end(&self) {
        self.active.store(false, Ordering::Release);
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}
