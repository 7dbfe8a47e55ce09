//! Lookup-layer counters

use kiln_core::{KilnError, KilnResult};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::entry_ref::CacheEntryRef;

/// Atomic counters kept by each lookup implementation
#[derive(Debug, Default)]
pub struct LookupStats {
    lookups: AtomicU64,
    hits: AtomicU64,
    absent_targets: AtomicU64,
    misses: AtomicU64,
    failures: AtomicU64,
}

/// Point-in-time copy of `LookupStats`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LookupStatsSnapshot {
    /// Lookups issued
    pub lookups: u64,
    /// Lookups that returned a reference
    pub hits: u64,
    /// Hits whose requested target was never produced
    pub absent_targets: u64,
    /// Lookups that failed with `NotFound`
    pub misses: u64,
    /// Lookups that failed for any other reason
    pub failures: u64,
}

impl LookupStats {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one finished lookup
    pub fn record(&self, result: &KilnResult<CacheEntryRef>) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        match result {
            Ok(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                if entry.executable().is_none() {
                    self.absent_targets.fetch_add(1, Ordering::Relaxed);
                }
            }
            Err(KilnError::NotFound { .. }) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
            }
            Err(_) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Read all counters
    pub fn snapshot(&self) -> LookupStatsSnapshot {
        LookupStatsSnapshot {
            lookups: self.lookups.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            absent_targets: self.absent_targets.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

impl fmt::Display for LookupStatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lookups={} hits={} absent_targets={} misses={} failures={}",
            self.lookups, self.hits, self.absent_targets, self.misses, self.failures
        )
    }
}
