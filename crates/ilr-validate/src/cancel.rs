//! Whole-run cancellation.
//!
//! The controlling side holds a [`CancellationSource`] and hands
//! [`CancellationToken`]s to the engine. The engine polls the token before
//! each learner pass; a learner already in progress always finishes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Control handle that requests cancellation.
///
/// Dropping the source does not cancel; call [`cancel`](Self::cancel).
#[derive(Debug, Default)]
pub struct CancellationSource {
    cancelled: Arc<AtomicBool>,
}

impl CancellationSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token observing this source.
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            cancelled: Some(Arc::clone(&self.cancelled)),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Cloneable, thread-safe view of a cancellation request.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Option<Arc<AtomicBool>>,
}

impl CancellationToken {
    /// A token that is never cancelled.
    pub fn none() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Acquire))
    }
}
