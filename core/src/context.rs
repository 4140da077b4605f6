//! Per-call execution context.

use std::sync::Arc;
use std::time::Instant;

use crate::exec::CacheStore;

/// Execution context handed through every operation.
///
/// Carries the request-scoped cache store (never process-global) and an
/// opaque deadline. The core itself does not interpret the deadline; it is
/// passed through for adapters that can honor it.
#[derive(Debug, Clone, Default)]
pub struct Context {
    cache: Option<Arc<CacheStore>>,
    deadline: Option<Instant>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a request-scoped cache store. Reads within this context can
    /// then be served from cache; mutations invalidate it.
    pub fn with_cache(mut self, store: Arc<CacheStore>) -> Self {
        self.cache = Some(store);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[inline]
    pub fn cache(&self) -> Option<&CacheStore> {
        self.cache.as_deref()
    }

    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}
