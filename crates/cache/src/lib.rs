//! Reference compiled-program cache for kiln
//!
//! This crate implements an in-process cache that the lookup layer resolves
//! against through the `CacheView` capability:
//! - ProgramCache: DashMap key index plus an identity index over the same entries
//! - CacheEntry: cache-owned program with a pin counter
//!
//! Capacity management and eviction policy are left to the embedding runtime;
//! this crate only provides the mechanics (`insert`, `evict`, `shutdown`).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entry;
pub mod store;

pub use entry::CacheEntry;
pub use store::ProgramCache;
