//! Single-entry read cache for full catalog loads.

use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Memoizes one value until [`ReadCache::invalidate`] is called. There is no
/// time-based expiry.
#[derive(Debug)]
pub struct ReadCache<T> {
    slot: Mutex<Option<Arc<T>>>,
    stats: Mutex<CacheStats>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub populations: u64,
    pub invalidations: u64,
}

impl<T> Default for ReadCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<U>(m: &Mutex<U>) -> MutexGuard<'_, U> {
    // A panic while holding the lock cannot leave the slot half-updated.
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<T> ReadCache<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            stats: Mutex::new(CacheStats::default()),
        }
    }

    /// Return the cached value, or run `populate` and cache its `Ok` result.
    /// Errors are passed through and leave the cache empty.
    pub fn get_or_populate<E, F>(&self, populate: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let mut slot = lock(&self.slot);
        if let Some(value) = slot.as_ref() {
            lock(&self.stats).hits += 1;
            return Ok(Arc::clone(value));
        }

        let value = Arc::new(populate()?);
        *slot = Some(Arc::clone(&value));
        lock(&self.stats).populations += 1;
        debug!("read cache populated");
        Ok(value)
    }

    pub fn invalidate(&self) {
        *lock(&self.slot) = None;
        lock(&self.stats).invalidations += 1;
        debug!("read cache invalidated");
    }

    pub fn is_populated(&self) -> bool {
        lock(&self.slot).is_some()
    }

    pub fn stats(&self) -> CacheStats {
        *lock(&self.stats)
    }
}
