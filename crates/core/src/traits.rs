//! Narrow read-only capability exposed by a program cache
//!
//! The lookup layer depends on `CacheView` only, never on a concrete cache
//! type. A cache hands out `EntryLease`s: reference-counted borrow tokens that
//! keep the program alive and pinned until dropped.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::KilnResult;
use crate::program::CompiledProgram;
use crate::types::{ProgramIdentity, ProgramKey};

/// Read-only borrow operations over a compiled-program cache
///
/// Thread safety: all methods must be safe to call concurrently from
/// multiple threads. An acquisition racing an eviction of the same entry
/// either returns a complete lease or fails with `NotFound`.
pub trait CacheView: Send + Sync {
    /// Borrow the entry stored under `key`
    ///
    /// # Errors
    ///
    /// `NotFound` if no entry exists, `Unavailable` if the cache is torn down.
    fn acquire_by_key(&self, key: &ProgramKey) -> KilnResult<EntryLease>;

    /// Borrow the entry stored under `identity`
    ///
    /// Resolves into the same entry space as `acquire_by_key`.
    ///
    /// # Errors
    ///
    /// `NotFound` if no entry exists, `Unavailable` if the cache is torn down.
    fn acquire_by_identity(&self, identity: ProgramIdentity) -> KilnResult<EntryLease>;

    /// False once the cache has been shut down
    fn is_available(&self) -> bool;
}

/// A borrow of one cached program
///
/// A pinned lease increments the entry's pin counter on creation and
/// decrements it exactly once on drop. A detached lease owns its program
/// outright (for example, a copy received from a remote peer).
pub struct EntryLease {
    key: ProgramKey,
    identity: ProgramIdentity,
    program: Arc<CompiledProgram>,
    pin: Option<Arc<AtomicUsize>>,
}

impl EntryLease {
    /// Borrow a cache-owned program, bumping `pins` for the lease's lifetime
    pub fn pinned(
        key: ProgramKey,
        identity: ProgramIdentity,
        program: Arc<CompiledProgram>,
        pins: Arc<AtomicUsize>,
    ) -> Self {
        pins.fetch_add(1, Ordering::AcqRel);
        EntryLease {
            key,
            identity,
            program,
            pin: Some(pins),
        }
    }

    /// A lease over a locally owned program with no cache bookkeeping
    pub fn detached(key: ProgramKey, identity: ProgramIdentity, program: CompiledProgram) -> Self {
        EntryLease {
            key,
            identity,
            program: Arc::new(program),
            pin: None,
        }
    }

    /// Key of the borrowed entry
    pub fn key(&self) -> &ProgramKey {
        &self.key
    }

    /// Identity of the borrowed entry
    pub fn identity(&self) -> ProgramIdentity {
        self.identity
    }

    /// The borrowed program
    pub fn program(&self) -> &CompiledProgram {
        &self.program
    }

    /// True when the lease holds a cache pin
    pub fn is_pinned(&self) -> bool {
        self.pin.is_some()
    }
}

impl Drop for EntryLease {
    fn drop(&mut self) {
        if let Some(pins) = self.pin.take() {
            pins.fetch_sub(1, Ordering::AcqRel);
        }
    }
}

impl fmt::Debug for EntryLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryLease")
            .field("key", &self.key)
            .field("identity", &self.identity)
            .field("pinned", &self.is_pinned())
            .finish()
    }
}
