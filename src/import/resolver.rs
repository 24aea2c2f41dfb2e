//! Actor lookup by authorized form of name, with a run-scoped cache.

use std::num::NonZeroUsize;

use lru::LruCache;

use crate::error::Result;
use crate::store::{Actor, RelationStore};

/// Resolves display names to actors.
///
/// Misses are cached as well as hits: the import never creates actors, so a
/// name that is missing on its first lookup stays missing for the whole run.
pub struct EntityResolver {
    cache: Option<LruCache<(String, String), Option<Actor>>>,
    hits: u64,
    lookups: u64,
}

impl EntityResolver {
    /// Create a resolver caching up to `capacity` names; 0 disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: NonZeroUsize::new(capacity).map(LruCache::new),
            hits: 0,
            lookups: 0,
        }
    }

    /// Resolve `name` in `culture`. Exact match only.
    pub fn resolve<S: RelationStore + ?Sized>(
        &mut self,
        store: &S,
        name: &str,
        culture: &str,
    ) -> Result<Option<Actor>> {
        self.lookups += 1;
        let key = (culture.to_string(), name.to_string());

        if let Some(cache) = self.cache.as_mut() {
            if let Some(cached) = cache.get(&key) {
                self.hits += 1;
                return Ok(cached.clone());
            }
        }

        let actor = store.find_actor_by_authorized_name(name, culture)?;
        if let Some(cache) = self.cache.as_mut() {
            cache.put(key, actor.clone());
        }
        Ok(actor)
    }

    /// `(cache hits, total lookups)` so far.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.lookups)
    }
}
