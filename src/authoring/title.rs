//! Debounced duplicate-title checking for the course creation form.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Runs a check only for the latest submission within the debounce window.
///
/// Each call to [`TitleDebouncer::submit`] supersedes the pending ones;
/// superseded calls resolve to `None` without running their check.
#[derive(Debug, Clone)]
pub struct TitleDebouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Default for TitleDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl TitleDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn submit<F, T>(&self, check: F) -> Option<T>
    where
        F: FnOnce() -> T,
    {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.delay).await;

        if self.generation.load(Ordering::SeqCst) != ticket {
            tracing::trace!(ticket, "Title check superseded");
            return None;
        }
        Some(check())
    }
}
