//! In-process compiled-program cache
//!
//! # Design
//!
//! - Key index: `DashMap<ProgramKey, Arc<CacheEntry>>`, lock-free reads
//! - Identity index: `DashMap<ProgramIdentity, ProgramKey>`, an alternate
//!   index over the same entries (not a second namespace)
//! - Writers (insert/evict/shutdown) serialize on a single mutex so both
//!   indexes change together and no insert lands after shutdown
//!
//! # Thread Safety
//!
//! Acquisition clones the entry's `Arc` while holding the DashMap shard
//! read guard, so a concurrent eviction yields either a complete lease or
//! `NotFound`, never a partially evicted entry.

use dashmap::DashMap;
use kiln_core::{
    CacheView, CompiledProgram, EntryLease, KilnError, KilnResult, PartitionIndex,
    ProgramIdentity, ProgramKey, ProgramUid,
};
use parking_lot::Mutex;
use rustc_hash::FxHasher;
use std::fmt;
use std::hash::BuildHasherDefault;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::entry::CacheEntry;

type FxBuildHasher = BuildHasherDefault<FxHasher>;

/// Reference in-process cache of compiled programs
///
/// # Example
///
/// ```ignore
/// use kiln_cache::ProgramCache;
/// use std::sync::Arc;
///
/// let cache = Arc::new(ProgramCache::new());
/// cache.insert(key, ProgramIdentity::new(7, 0), program)?;
/// let lease = cache.acquire_by_key(&key)?;
/// ```
pub struct ProgramCache {
    by_key: DashMap<ProgramKey, Arc<CacheEntry>, FxBuildHasher>,
    by_identity: DashMap<ProgramIdentity, ProgramKey, FxBuildHasher>,
    write_lock: Mutex<()>,
    shut_down: AtomicBool,
}

impl ProgramCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create with expected number of entries
    pub fn with_capacity(capacity: usize) -> Self {
        ProgramCache {
            by_key: DashMap::with_capacity_and_hasher(capacity, FxBuildHasher::default()),
            by_identity: DashMap::with_capacity_and_hasher(capacity, FxBuildHasher::default()),
            write_lock: Mutex::new(()),
            shut_down: AtomicBool::new(false),
        }
    }

    /// Insert a program under both its key and its identity
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if the key or the identity is taken,
    /// `Unavailable` after `shutdown`.
    pub fn insert(
        &self,
        key: ProgramKey,
        identity: ProgramIdentity,
        program: CompiledProgram,
    ) -> KilnResult<()> {
        let _guard = self.write_lock.lock();
        self.ensure_available()?;

        if self.by_key.contains_key(&key) {
            return Err(KilnError::already_exists(format!("program key '{}'", key)));
        }
        if let Some(existing) = self.by_identity.get(&identity) {
            return Err(KilnError::already_exists(format!(
                "{} (stored as '{}')",
                identity,
                existing.value()
            )));
        }

        debug!(target: "kiln::cache", %key, %identity, "Program cached");
        let entry = Arc::new(CacheEntry::new(key.clone(), identity, program));
        self.by_identity.insert(identity, key.clone());
        self.by_key.insert(key, entry);
        Ok(())
    }

    /// Insert every partition of one compilation
    ///
    /// Partition `i` is stored under key `"{key_prefix}:{i}"` and identity
    /// `(uid, i)`. Returns the keys in partition order.
    ///
    /// # Errors
    ///
    /// Same as `insert`. Partitions inserted before a failure stay cached.
    pub fn insert_partitions(
        &self,
        key_prefix: &str,
        uid: ProgramUid,
        programs: Vec<CompiledProgram>,
    ) -> KilnResult<Vec<ProgramKey>> {
        let mut keys = Vec::with_capacity(programs.len());
        for (partition, program) in programs.into_iter().enumerate() {
            let partition = PartitionIndex::try_from(partition)
                .map_err(|_| KilnError::invalid_input("too many partitions"))?;
            let key = ProgramKey::for_partition(key_prefix, partition)?;
            self.insert(key.clone(), ProgramIdentity::new(uid, partition), program)?;
            keys.push(key);
        }
        Ok(keys)
    }

    /// Remove an entry from both indexes
    ///
    /// Outstanding leases keep the program alive until they drop.
    /// Returns false if the key was not cached.
    pub fn evict(&self, key: &ProgramKey) -> bool {
        let _guard = self.write_lock.lock();
        match self.by_key.remove(key) {
            Some((_, entry)) => {
                self.by_identity.remove(&entry.identity());
                debug!(
                    target: "kiln::cache",
                    %key,
                    pins = entry.pins(),
                    "Program evicted"
                );
                true
            }
            None => false,
        }
    }

    /// Tear the cache down
    ///
    /// Every later acquisition fails with `Unavailable`. Entries stay in
    /// place so outstanding leases and pin diagnostics remain valid.
    pub fn shutdown(&self) {
        let _guard = self.write_lock.lock();
        if !self.shut_down.swap(true, Ordering::AcqRel) {
            info!(
                target: "kiln::cache",
                entries = self.by_key.len(),
                outstanding = self.outstanding_leases(),
                "Program cache shut down"
            );
        }
    }

    /// Outstanding leases on the entry stored under `key`
    pub fn pinned(&self, key: &ProgramKey) -> Option<usize> {
        self.by_key.get(key).map(|entry| entry.pins())
    }

    /// Outstanding leases across all indexed entries
    pub fn outstanding_leases(&self) -> usize {
        self.by_key.iter().map(|entry| entry.value().pins()).sum()
    }

    /// Check if a key is cached
    pub fn contains(&self, key: &ProgramKey) -> bool {
        self.by_key.contains_key(key)
    }

    /// Number of cached programs
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    fn ensure_available(&self) -> KilnResult<()> {
        if self.shut_down.load(Ordering::Acquire) {
            return Err(KilnError::unavailable("program cache has been shut down"));
        }
        Ok(())
    }
}

impl Default for ProgramCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheView for ProgramCache {
    fn acquire_by_key(&self, key: &ProgramKey) -> KilnResult<EntryLease> {
        self.ensure_available()?;
        self.by_key
            .get(key)
            .map(|entry| entry.lease())
            .ok_or_else(|| KilnError::not_found(format!("program key '{}'", key)))
    }

    fn acquire_by_identity(&self, identity: ProgramIdentity) -> KilnResult<EntryLease> {
        self.ensure_available()?;
        let key = self
            .by_identity
            .get(&identity)
            .map(|key| key.value().clone())
            .ok_or_else(|| KilnError::not_found(identity.to_string()))?;

        // The key may have been evicted (and even reused) between the two reads.
        match self.by_key.get(&key) {
            Some(entry) if entry.identity() == identity => Ok(entry.lease()),
            _ => Err(KilnError::not_found(identity.to_string())),
        }
    }

    fn is_available(&self) -> bool {
        !self.shut_down.load(Ordering::Acquire)
    }
}

impl fmt::Debug for ProgramCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgramCache")
            .field("entries", &self.by_key.len())
            .field("identities", &self.by_identity.len())
            .field("outstanding_leases", &self.outstanding_leases())
            .field("shut_down", &self.shut_down.load(Ordering::Acquire))
            .finish()
    }
}
