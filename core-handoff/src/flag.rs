//! Set-once fatal failure flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::error;

/// Shared flag raised by the producer's error path when the backend session
/// enters an unrecoverable state.
///
/// Cloned handles observe the same flag. It is set at most once per fatal
/// event and never cleared here; only a full session re-initialization
/// (external to this crate) starts over with a fresh flag.
#[derive(Debug, Clone, Default)]
pub struct FatalFlag {
    inner: Arc<AtomicBool>,
}

impl FatalFlag {
    /// Create an untripped flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag. Logs on the first trip only; repeated trips are
    /// harmless no-ops.
    pub fn trip(&self) {
        if !self.inner.swap(true, Ordering::Release) {
            error!("streaming session reported a fatal error");
        }
    }

    /// `true` once any holder has tripped the flag.
    pub fn is_tripped(&self) -> bool {
        self.inner.load(Ordering::Acquire)
    }
}
