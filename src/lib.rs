//! Kiln - lookup layer for a compiled-program cache
//!
//! Compiling a program for an accelerator is expensive, so compiled
//! executables are cached. Kiln is how execution operations find them again:
//! by program key or by compilation uid plus partition index, selecting the
//! main executable or its sharding/unsharding companions.
//!
//! # Quick Start
//!
//! ```ignore
//! use kiln::{ExecutionContext, FetchTarget, LookupConfig, LookupRegistry, ProgramCache};
//! use kiln::COMPILATION_CACHE_LOOKUP;
//! use std::sync::Arc;
//!
//! let cache = Arc::new(ProgramCache::new());
//! cache.insert_partitions("graph", 7, programs)?;
//!
//! let registry = LookupRegistry::new();
//! registry.install_local(&LookupConfig::default(), &cache)?;
//! let ctx = ExecutionContext::from_registry(&registry, COMPILATION_CACHE_LOOKUP)?;
//!
//! ctx.with_partition(7, 1, FetchTarget::Main, |exe| run(exe))?;
//! ```
//!
//! # Architecture
//!
//! - `kiln-core`: addressing types, artifacts, the `CacheView` capability, errors
//! - `kiln-cache`: in-process reference cache implementing `CacheView`
//! - `kiln-lookup`: the lookup contract with local and remote implementations

pub use kiln_cache::{CacheEntry, ProgramCache};
pub use kiln_core::{
    CacheView, CompiledProgram, EntryLease, Executable, FetchTarget, KilnError, KilnResult,
    PartitionIndex, ProgramIdentity, ProgramKey, ProgramUid,
};
pub use kiln_lookup::{
    CacheEntryRef, ExecutionContext, LocalLookup, LookupConfig, LookupExt, LookupRegistry,
    LookupRequest, LookupResponse, LookupService, LookupStats, LookupStatsSnapshot,
    LookupTransport, LoopbackTransport, ProgramLookup, RemoteConfig, RemoteLookup, Topology,
    COMPILATION_CACHE_LOOKUP, CONFIG_FILE_NAME,
};
