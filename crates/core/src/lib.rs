//! Core types and traits for kiln
//!
//! This crate defines the foundational types used throughout the system:
//! - ProgramKey / ProgramIdentity: the two addressing schemes for cached programs
//! - FetchTarget: selects main, sharding or unsharding executable
//! - Executable / CompiledProgram: the cached artifacts
//! - CacheView: narrow read-only capability a cache exposes to the lookup layer
//! - EntryLease: reference-counted borrow token over a cached program
//! - KilnError: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod program;
pub mod traits;
pub mod types;

pub use error::{KilnError, KilnResult};
pub use program::{CompiledProgram, Executable};
pub use traits::{CacheView, EntryLease};
pub use types::{FetchTarget, PartitionIndex, ProgramIdentity, ProgramKey, ProgramUid};
