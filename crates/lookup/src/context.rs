//! Execution-side access to cached programs
//!
//! An `ExecutionContext` is handed its lookup at setup time, either directly
//! or by resolving a registry name once. Operations then borrow executables
//! through scoped closures: the entry reference is released when the
//! closure returns, on success and on error alike.

use kiln_core::{
    Executable, FetchTarget, KilnError, KilnResult, PartitionIndex, ProgramKey, ProgramUid,
};
use std::fmt;
use std::sync::Arc;

use crate::contract::ProgramLookup;
use crate::registry::LookupRegistry;

/// Per-executor handle to the configured lookup
#[derive(Clone)]
pub struct ExecutionContext {
    lookup: Arc<dyn ProgramLookup>,
}

impl ExecutionContext {
    /// Use `lookup` for every operation run in this context
    pub fn new(lookup: Arc<dyn ProgramLookup>) -> Self {
        ExecutionContext { lookup }
    }

    /// Resolve the lookup registered under `name`
    ///
    /// # Errors
    ///
    /// `NotFound` if nothing is registered under `name`.
    pub fn from_registry(registry: &LookupRegistry, name: &str) -> KilnResult<Self> {
        registry
            .get(name)
            .map(Self::new)
            .ok_or_else(|| KilnError::not_found(format!("lookup resource '{}'", name)))
    }

    /// The lookup this context resolves through
    pub fn lookup(&self) -> &dyn ProgramLookup {
        self.lookup.as_ref()
    }

    /// Run `f` with the executable for `target` of the program under `key`
    ///
    /// `f` receives `None` when the compilation never produced `target`.
    pub fn with_program<R, F>(&self, key: &ProgramKey, target: FetchTarget, f: F) -> KilnResult<R>
    where
        F: FnOnce(Option<&Executable>) -> KilnResult<R>,
    {
        let entry = self.lookup.lookup_key_target(key, target)?;
        f(entry.executable())
    }

    /// Run `f` with the executable for `target` of one partition of `uid`
    pub fn with_partition<R, F>(
        &self,
        uid: ProgramUid,
        partition: PartitionIndex,
        target: FetchTarget,
        f: F,
    ) -> KilnResult<R>
    where
        F: FnOnce(Option<&Executable>) -> KilnResult<R>,
    {
        let entry = self.lookup.lookup_uid_target(uid, partition, target)?;
        f(entry.executable())
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("lookup", &self.lookup.debug_string())
            .finish()
    }
}
