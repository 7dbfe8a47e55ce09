//! Lookup layer for the kiln compiled-program cache
//!
//! Execution operations find cached executables through one contract,
//! regardless of where the cache lives:
//! - ProgramLookup / LookupExt: the contract and its default-target policy
//! - CacheEntryRef: scoped reference to a cached program
//! - LocalLookup: same-process resolution, no serialization
//! - RemoteLookup: resolution through a LookupTransport to another process
//! - LookupRegistry / ExecutionContext: wiring the right lookup at setup time
//! - LookupConfig: `kiln.toml` topology selection

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod context;
pub mod contract;
pub mod entry_ref;
pub mod local;
pub mod registry;
pub mod remote;
pub mod stats;

pub use config::{LookupConfig, RemoteConfig, Topology, CONFIG_FILE_NAME};
pub use context::ExecutionContext;
pub use contract::{LookupExt, ProgramLookup};
pub use entry_ref::CacheEntryRef;
pub use local::LocalLookup;
pub use registry::{LookupRegistry, COMPILATION_CACHE_LOOKUP};
pub use remote::{
    LookupRequest, LookupResponse, LookupService, LookupTransport, LoopbackTransport, RemoteLookup,
};
pub use stats::{LookupStats, LookupStatsSnapshot};
