//! Request-scoped read cache.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value as JsonValue;

use crate::value::Value;
use crate::{quarry_trace_cache, quarry_warn_cache};

/// A decoded read result held by the cache.
#[derive(Debug, Clone)]
pub enum Cached {
    One(JsonValue),
    Many(Vec<JsonValue>),
    Count(u64),
}

/// Cache store shared across the branches of one logical call tree.
///
/// Entries are scoped per entity table and keyed by rendered SQL plus
/// serialized parameters. Mutations wipe a whole table scope: coarse
/// invalidation, favoring correctness over hit rate. The single lock is
/// deliberate; this is not a hot path.
///
/// A store whose lock was poisoned behaves as "no cache available": reads
/// miss, writes skip, a warning is emitted, the request never fails.
#[derive(Debug, Default)]
pub struct CacheStore {
    scopes: Mutex<HashMap<String, HashMap<String, Cached>>>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get(&self, scope: &str, key: &str) -> Option<Cached> {
        let Ok(scopes) = self.scopes.lock() else {
            quarry_warn_cache!("lock poisoned");
            return None;
        };
        let entry = scopes.get(scope).and_then(|s| s.get(key)).cloned();
        if entry.is_some() {
            quarry_trace_cache!("hit", scope);
        } else {
            quarry_trace_cache!("miss", scope);
        }
        entry
    }

    pub(crate) fn put(&self, scope: &str, key: &str, entry: Cached) {
        let Ok(mut scopes) = self.scopes.lock() else {
            quarry_warn_cache!("lock poisoned");
            return;
        };
        scopes
            .entry(scope.to_owned())
            .or_default()
            .insert(key.to_owned(), entry);
    }

    pub(crate) fn invalidate(&self, scope: &str) {
        let Ok(mut scopes) = self.scopes.lock() else {
            quarry_warn_cache!("lock poisoned");
            return;
        };
        quarry_trace_cache!("invalidate", scope);
        scopes.remove(scope);
    }
}

/// Cache key: rendered SQL text concatenated with the serialized argument
/// list.
pub(crate) fn key(sql: &str, params: &[Value]) -> String {
    let args = serde_json::to_string(params).unwrap_or_default();
    format!("{}|{}", sql, args)
}
