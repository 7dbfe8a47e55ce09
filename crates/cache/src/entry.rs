//! Cache-owned entries

use kiln_core::{CompiledProgram, EntryLease, ProgramIdentity, ProgramKey};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// One cached program and its pin counter
///
/// The cache is the sole owner of entries. Callers only ever see
/// `EntryLease`s, which share the program and the pin counter.
#[derive(Debug)]
pub struct CacheEntry {
    key: ProgramKey,
    identity: ProgramIdentity,
    program: Arc<CompiledProgram>,
    pins: Arc<AtomicUsize>,
}

impl CacheEntry {
    pub(crate) fn new(key: ProgramKey, identity: ProgramIdentity, program: CompiledProgram) -> Self {
        CacheEntry {
            key,
            identity,
            program: Arc::new(program),
            pins: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Key this entry is stored under
    pub fn key(&self) -> &ProgramKey {
        &self.key
    }

    /// Identity this entry is stored under
    pub fn identity(&self) -> ProgramIdentity {
        self.identity
    }

    /// Number of outstanding leases
    pub fn pins(&self) -> usize {
        self.pins.load(Ordering::Acquire)
    }

    /// Hand out a pinned lease over this entry
    pub(crate) fn lease(&self) -> EntryLease {
        EntryLease::pinned(
            self.key.clone(),
            self.identity,
            Arc::clone(&self.program),
            Arc::clone(&self.pins),
        )
    }
}
