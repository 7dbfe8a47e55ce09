//! Lookup Comprehensive Test Suite
//!
//! End-to-end coverage of the lookup layer through the public `kiln` API,
//! run against both deployment topologies.
//!
//! ## Modules
//!
//! - `scenarios`: addressing, fetch targets, not-found and teardown behavior
//! - `properties`: proptest properties over keys, identities and targets
//! - `concurrency`: many execution threads sharing one lookup
//! - `wiring`: config file -> registry -> execution context
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test lookup_comprehensive
//! cargo test --test lookup_comprehensive concurrency::
//! ```

use std::sync::Arc;

use kiln::{
    CompiledProgram, Executable, LocalLookup, LookupService, LoopbackTransport, ProgramCache,
    ProgramLookup, RemoteLookup,
};

pub mod concurrency;
pub mod properties;
pub mod wiring;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Program whose executables are filled with `tag`
///
/// Main is always produced; companions only when requested.
pub fn program(tag: u8, sharding: bool, unsharding: bool) -> CompiledProgram {
    let mut program = CompiledProgram::main_only(Executable::new(
        format!("main-{}", tag),
        vec![tag; 64],
    ));
    if sharding {
        program = program.with_sharding(Executable::new(format!("sharding-{}", tag), vec![tag; 16]));
    }
    if unsharding {
        program =
            program.with_unsharding(Executable::new(format!("unsharding-{}", tag), vec![tag; 16]));
    }
    program
}

/// A local lookup and a loopback remote lookup over the same cache
pub fn both_topologies(cache: &Arc<ProgramCache>) -> Vec<(&'static str, Arc<dyn ProgramLookup>)> {
    let service = Arc::new(LookupService::new(cache.clone()));
    let local: Arc<dyn ProgramLookup> = Arc::new(LocalLookup::new(cache));
    let remote: Arc<dyn ProgramLookup> =
        Arc::new(RemoteLookup::new(LoopbackTransport::new(service)));
    vec![("local", local), ("remote", remote)]
}
