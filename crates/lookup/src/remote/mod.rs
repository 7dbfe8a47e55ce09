//! Cross-process lookup
//!
//! `RemoteLookup` satisfies the same contract as `LocalLookup` but resolves
//! by sending an encoded `LookupRequest` over a `LookupTransport` to the
//! process hosting the cache. The returned program is decoded into a locally
//! owned reference, so nothing is pinned on the peer afterwards.

pub mod service;
pub mod wire;

use kiln_core::{
    EntryLease, FetchTarget, KilnError, KilnResult, PartitionIndex, ProgramKey, ProgramUid,
};
use std::fmt;
use tracing::{debug, warn};

use crate::config::RemoteConfig;
use crate::contract::ProgramLookup;
use crate::entry_ref::CacheEntryRef;
use crate::stats::{LookupStats, LookupStatsSnapshot};

pub use service::{LookupService, LoopbackTransport};
pub use wire::{LookupRequest, LookupResponse};

/// Carries encoded lookups to the peer hosting the cache
///
/// A transport may block. Any failure to reach the peer should be reported
/// as `Unavailable`; other errors are converted to `Unavailable` by
/// `RemoteLookup`.
pub trait LookupTransport: Send + Sync {
    /// Send one encoded request and wait for the encoded response
    fn round_trip(&self, request: Vec<u8>) -> KilnResult<Vec<u8>>;

    /// Description of the peer, for diagnostics
    fn peer(&self) -> String;
}

/// Lookup against a cache in another process
pub struct RemoteLookup<T: LookupTransport> {
    transport: T,
    config: RemoteConfig,
    stats: LookupStats,
}

impl<T: LookupTransport> RemoteLookup<T> {
    /// Resolve through `transport` with default limits
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, RemoteConfig::default())
    }

    /// Resolve through `transport` with explicit limits
    pub fn with_config(transport: T, config: RemoteConfig) -> Self {
        RemoteLookup {
            transport,
            config,
            stats: LookupStats::new(),
        }
    }

    /// The underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Counters for this lookup
    pub fn stats(&self) -> LookupStatsSnapshot {
        self.stats.snapshot()
    }

    fn resolve(&self, request: LookupRequest) -> KilnResult<CacheEntryRef> {
        let target = request.target();
        let result = self
            .call(&request)
            .map(|lease| CacheEntryRef::new(lease, target));
        self.stats.record(&result);
        result
    }

    fn call(&self, request: &LookupRequest) -> KilnResult<EntryLease> {
        let bytes = self.transport.round_trip(request.encode()?).map_err(|e| {
            warn!(
                target: "kiln::lookup",
                peer = %self.transport.peer(),
                error = %e,
                "Lookup transport failed"
            );
            if e.is_unavailable() {
                e
            } else {
                KilnError::unavailable(format!("transport failed: {}", e))
            }
        })?;

        if bytes.len() > self.config.max_response_bytes {
            return Err(KilnError::internal(format!(
                "lookup response of {} bytes exceeds limit of {} bytes",
                bytes.len(),
                self.config.max_response_bytes
            )));
        }

        let response = LookupResponse::decode(&bytes).map_err(|e| {
            KilnError::internal(format!("undecodable lookup response: {}", e))
        })?;
        match response {
            LookupResponse::Found {
                key,
                identity,
                program,
            } => {
                if !request.matches(&key, identity) {
                    warn!(
                        target: "kiln::lookup",
                        peer = %self.transport.peer(),
                        %key,
                        %identity,
                        "Peer answered with a different program"
                    );
                    return Err(KilnError::internal(format!(
                        "peer answered '{}' ({}) for a lookup {}",
                        key,
                        identity,
                        request.describe()
                    )));
                }
                Ok(EntryLease::detached(key, identity, program))
            }
            LookupResponse::NotFound(what) => Err(KilnError::not_found(what)),
            LookupResponse::Unavailable(reason) => Err(KilnError::unavailable(reason)),
            LookupResponse::Internal(reason) => Err(KilnError::internal(reason)),
        }
    }
}

impl<T: LookupTransport> ProgramLookup for RemoteLookup<T> {
    fn lookup_key_target(
        &self,
        key: &ProgramKey,
        target: FetchTarget,
    ) -> KilnResult<CacheEntryRef> {
        debug!(target: "kiln::lookup", %key, fetch = %target, "Remote lookup by key");
        self.resolve(LookupRequest::ByKey {
            key: key.clone(),
            target,
        })
    }

    fn lookup_uid_target(
        &self,
        uid: ProgramUid,
        partition: PartitionIndex,
        target: FetchTarget,
    ) -> KilnResult<CacheEntryRef> {
        debug!(target: "kiln::lookup", uid, partition, fetch = %target, "Remote lookup by uid");
        self.resolve(LookupRequest::ByIdentity {
            uid,
            partition,
            target,
        })
    }

    fn debug_string(&self) -> String {
        format!(
            "RemoteLookup {{ peer: {}, {} }}",
            self.transport.peer(),
            self.stats.snapshot()
        )
    }
}

impl<T: LookupTransport> fmt::Debug for RemoteLookup<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.debug_string())
    }
}
