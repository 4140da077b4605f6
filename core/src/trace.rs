//! Tracing macros for query, cache and transaction observability.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]`
//! boilerplate at every call site.

/// Emit a debug-level event with the SQL text and parameter count.
#[macro_export]
macro_rules! quarry_trace_query {
    ($sql:expr, $param_count:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(sql = %$sql, params = $param_count, "quarry.query");
    };
}

/// Emit a debug-level cache event (`hit`, `miss`, `invalidate`).
#[macro_export]
macro_rules! quarry_trace_cache {
    ($event:literal, $scope:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(event = $event, scope = %$scope, "quarry.cache");
    };
}

/// Emit a warning for a degraded cache: the request proceeds without it.
#[macro_export]
macro_rules! quarry_warn_cache {
    ($reason:literal) => {
        #[cfg(feature = "tracing")]
        tracing::warn!(reason = $reason, "quarry.cache unavailable");
    };
}

/// Emit an info-level event for transaction lifecycle.
#[macro_export]
macro_rules! quarry_trace_tx {
    ($event:literal) => {
        #[cfg(feature = "tracing")]
        tracing::info!(event = $event, "quarry.transaction");
    };
}
