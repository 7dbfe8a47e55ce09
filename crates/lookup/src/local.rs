//! Same-process lookup
//!
//! Resolves directly against a cache in the same address space. Nothing is
//! serialized or copied: the returned reference shares the cache's program.

use kiln_core::{
    CacheView, EntryLease, FetchTarget, KilnError, KilnResult, PartitionIndex, ProgramIdentity,
    ProgramKey, ProgramUid,
};
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

use crate::contract::ProgramLookup;
use crate::entry_ref::CacheEntryRef;
use crate::stats::{LookupStats, LookupStatsSnapshot};

/// Lookup bound to one in-process cache
///
/// The binding is fixed at construction and held weakly: once the cache is
/// dropped (or shut down) every lookup fails with `Unavailable`.
pub struct LocalLookup {
    cache: Weak<dyn CacheView>,
    stats: LookupStats,
}

impl LocalLookup {
    /// Bind to `cache`
    pub fn new<C: CacheView + 'static>(cache: &Arc<C>) -> Self {
        let cache: Weak<C> = Arc::downgrade(cache);
        Self::bind(cache)
    }

    /// Bind to a cache already held as a trait object
    pub fn from_shared(cache: &Arc<dyn CacheView>) -> Self {
        Self::bind(Arc::downgrade(cache))
    }

    fn bind(cache: Weak<dyn CacheView>) -> Self {
        LocalLookup {
            cache,
            stats: LookupStats::new(),
        }
    }

    /// Counters for this lookup
    pub fn stats(&self) -> LookupStatsSnapshot {
        self.stats.snapshot()
    }

    /// True while the backing cache is alive and not shut down
    pub fn is_bound(&self) -> bool {
        self.cache
            .upgrade()
            .map(|cache| cache.is_available())
            .unwrap_or(false)
    }

    fn backing(&self) -> KilnResult<Arc<dyn CacheView>> {
        let cache = self.cache.upgrade().ok_or_else(|| {
            warn!(target: "kiln::lookup", "Backing program cache has been dropped");
            KilnError::unavailable("backing program cache has been dropped")
        })?;
        if !cache.is_available() {
            warn!(target: "kiln::lookup", "Backing program cache has been shut down");
            return Err(KilnError::unavailable("backing program cache has been shut down"));
        }
        Ok(cache)
    }

    fn resolve<F>(&self, target: FetchTarget, acquire: F) -> KilnResult<CacheEntryRef>
    where
        F: FnOnce(&dyn CacheView) -> KilnResult<EntryLease>,
    {
        let result = self
            .backing()
            .and_then(|cache| acquire(cache.as_ref()))
            .map(|lease| CacheEntryRef::new(lease, target));
        self.stats.record(&result);
        result
    }
}

impl ProgramLookup for LocalLookup {
    fn lookup_key_target(
        &self,
        key: &ProgramKey,
        target: FetchTarget,
    ) -> KilnResult<CacheEntryRef> {
        debug!(target: "kiln::lookup", %key, fetch = %target, "Local lookup by key");
        self.resolve(target, |cache| cache.acquire_by_key(key))
    }

    fn lookup_uid_target(
        &self,
        uid: ProgramUid,
        partition: PartitionIndex,
        target: FetchTarget,
    ) -> KilnResult<CacheEntryRef> {
        debug!(target: "kiln::lookup", uid, partition, fetch = %target, "Local lookup by uid");
        let identity = ProgramIdentity::new(uid, partition);
        self.resolve(target, |cache| cache.acquire_by_identity(identity))
    }

    fn debug_string(&self) -> String {
        let binding = if self.is_bound() { "bound" } else { "unavailable" };
        format!("LocalLookup {{ cache: {}, {} }}", binding, self.stats.snapshot())
    }
}

impl fmt::Debug for LocalLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.debug_string())
    }
}
