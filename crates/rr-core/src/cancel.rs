//! Cooperative cancellation flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag a caller flips to abandon an in-flight route request.
///
/// Clones share the same flag.  Long-running loops poll
/// [`is_cancelled`](Self::is_cancelled) at a coarse granularity (one node
/// expansion in the path search) and unwind with their own `Cancelled`
/// error; they never hold shared state, so abandoning them is always safe.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
