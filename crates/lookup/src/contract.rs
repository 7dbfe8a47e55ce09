//! The lookup contract shared by every deployment topology
//!
//! Execution operations resolve cached programs through `ProgramLookup`,
//! without knowing whether the cache lives in the same process
//! (`LocalLookup`) or behind a transport (`RemoteLookup`).

use kiln_core::{FetchTarget, KilnResult, PartitionIndex, ProgramKey, ProgramUid};

use crate::entry_ref::CacheEntryRef;

/// Resolves cached programs by key or by (uid, partition)
///
/// Only one of the main, sharding and unsharding executables is resolved per
/// call, as selected by the fetch target. If the compilation never produced
/// the requested companion, the lookup still succeeds and
/// `CacheEntryRef::executable` returns `None`.
///
/// Thread safety: implementations are called concurrently from many
/// execution threads.
pub trait ProgramLookup: Send + Sync {
    /// Look up the executable for `target` of the program stored under `key`
    ///
    /// # Errors
    ///
    /// `NotFound` if nothing is cached under `key`; `Unavailable` if the
    /// backing cache is unreachable or torn down.
    fn lookup_key_target(&self, key: &ProgramKey, target: FetchTarget)
        -> KilnResult<CacheEntryRef>;

    /// Look up the executable for `target` of partition `partition` of
    /// compilation `uid`
    ///
    /// # Errors
    ///
    /// `NotFound` if nothing is cached under the identity; `Unavailable` if
    /// the backing cache is unreachable or torn down.
    fn lookup_uid_target(
        &self,
        uid: ProgramUid,
        partition: PartitionIndex,
        target: FetchTarget,
    ) -> KilnResult<CacheEntryRef>;

    /// Human-readable state of the lookup layer (not cache contents)
    fn debug_string(&self) -> String;
}

/// Default-target lookups
///
/// Blanket-implemented for every `ProgramLookup`, so omitting the target
/// always resolves the main executable.
pub trait LookupExt: ProgramLookup {
    /// Same as `lookup_key_target(key, FetchTarget::Main)`
    fn lookup_key(&self, key: &ProgramKey) -> KilnResult<CacheEntryRef> {
        self.lookup_key_target(key, FetchTarget::Main)
    }

    /// Same as `lookup_uid_target(uid, partition, FetchTarget::Main)`
    fn lookup_uid(&self, uid: ProgramUid, partition: PartitionIndex) -> KilnResult<CacheEntryRef> {
        self.lookup_uid_target(uid, partition, FetchTarget::Main)
    }
}

impl<T: ProgramLookup + ?Sized> LookupExt for T {}
