//! Resolution cache: (provider, type-parameter symbol) -> concrete class.
//!
//! Entries are keyed by the provider as well as the symbol: `Box<T>` may have
//! a `StringBox` and an `IntBox` subclass, and `T` is bound differently in
//! each hierarchy. For a fixed provider a binding never changes, so the cache
//! is append-only and entries are never evicted. Concurrent walks for the same
//! provider may insert the same pairs twice; `DashMap` makes that harmless.
//!
//! A process-wide instance is available through [`ResolutionCache::global`].
//! Tests and embedders that need isolation create their own instance and pass
//! it to [`TypeResolver::with_cache`](crate::TypeResolver::with_cache).

use dashmap::DashMap;
use gtr_hierarchy::{ClassId, TypeParamId};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{trace, warn};

static GLOBAL_CACHE: OnceLock<ResolutionCache> = OnceLock::new();

/// Counters describing cache usage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of cached bindings.
    pub entries: usize,
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that found nothing.
    pub misses: u64,
    /// Hierarchy walks merged into the cache.
    pub walks: u64,
}

/// Thread-safe, append-only map from (provider, symbol) to resolved class.
pub struct ResolutionCache {
    entries: DashMap<(ClassId, TypeParamId), ClassId>,
    hits: AtomicU64,
    misses: AtomicU64,
    walks: AtomicU64,
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            walks: AtomicU64::new(0),
        }
    }

    /// The process-wide cache.
    pub fn global() -> &'static ResolutionCache {
        GLOBAL_CACHE.get_or_init(ResolutionCache::new)
    }

    /// Look up a binding, counting the hit or miss.
    pub fn get(&self, provider: ClassId, param: TypeParamId) -> Option<ClassId> {
        let found = self.peek(provider, param);
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Look up a binding without touching the counters.
    pub fn peek(&self, provider: ClassId, param: TypeParamId) -> Option<ClassId> {
        self.entries.get(&(provider, param)).map(|entry| *entry)
    }

    pub fn contains(&self, provider: ClassId, param: TypeParamId) -> bool {
        self.entries.contains_key(&(provider, param))
    }

    /// Merge the bindings discovered by one walk of `provider`.
    ///
    /// Returns the number of symbols that were not cached before. Existing
    /// entries are overwritten; a differing value means two walks of the same
    /// provider disagreed, which is logged.
    pub fn merge(&self, provider: ClassId, batch: FxHashMap<TypeParamId, ClassId>) -> usize {
        self.walks.fetch_add(1, Ordering::Relaxed);
        let mut added = 0;
        for (param, class) in batch {
            match self.entries.insert((provider, param), class) {
                None => added += 1,
                Some(previous) if previous != class => {
                    warn!(
                        provider = provider.0,
                        param = param.0,
                        previous = previous.0,
                        class = class.0,
                        "ResolutionCache::merge - conflicting binding"
                    );
                }
                Some(_) => {}
            }
        }
        trace!(
            provider = provider.0,
            added,
            total = self.entries.len(),
            "ResolutionCache::merge"
        );
        added
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            walks: self.walks.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
#[path = "../tests/cache_tests.rs"]
mod tests;
