//! Entry references handed to execution operations

use kiln_core::{CompiledProgram, EntryLease, Executable, FetchTarget, ProgramIdentity, ProgramKey};
use std::fmt;

/// A short-lived handle onto one cached program
///
/// Valid for the duration of the operation that obtained it. Dropping the
/// reference releases the underlying lease. The reference borrows from the
/// cache, not from the lookup that produced it, so it stays valid if the
/// lookup is dropped first.
pub struct CacheEntryRef {
    lease: EntryLease,
    target: FetchTarget,
}

impl CacheEntryRef {
    /// Wrap a lease for the given fetch target
    pub fn new(lease: EntryLease, target: FetchTarget) -> Self {
        CacheEntryRef { lease, target }
    }

    /// The executable for the requested target
    ///
    /// `None` means the compilation never produced this target. That is not
    /// a lookup failure; the reference is otherwise fully valid.
    pub fn executable(&self) -> Option<&Executable> {
        self.lease.program().executable(self.target)
    }

    /// The target this reference was resolved for
    pub fn target(&self) -> FetchTarget {
        self.target
    }

    /// Key of the referenced entry
    pub fn key(&self) -> &ProgramKey {
        self.lease.key()
    }

    /// Identity of the referenced entry
    pub fn identity(&self) -> ProgramIdentity {
        self.lease.identity()
    }

    /// The whole compiled program behind this reference
    pub fn program(&self) -> &CompiledProgram {
        self.lease.program()
    }

    /// True when the reference pins a cache-owned entry
    ///
    /// False for locally owned copies (remote lookups).
    pub fn is_cache_backed(&self) -> bool {
        self.lease.is_pinned()
    }
}

impl fmt::Debug for CacheEntryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntryRef")
            .field("key", self.key())
            .field("identity", &self.identity())
            .field("target", &self.target)
            .field("present", &self.executable().is_some())
            .finish()
    }
}
