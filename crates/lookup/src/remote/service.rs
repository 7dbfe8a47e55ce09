//! Serving side of remote lookups and an in-process transport

use kiln_core::{CacheView, KilnError, KilnResult, ProgramIdentity};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};

use super::wire::{LookupRequest, LookupResponse};
use super::LookupTransport;

/// Answers encoded lookup requests from a cache in this process
///
/// The server-side lease is released before the response is returned; the
/// caller receives a copy of the program.
pub struct LookupService {
    cache: Arc<dyn CacheView>,
}

impl LookupService {
    /// Serve lookups from `cache`
    pub fn new(cache: Arc<dyn CacheView>) -> Self {
        LookupService { cache }
    }

    /// Decode a request, resolve it and encode the response
    ///
    /// Malformed requests are answered with `LookupResponse::Internal`.
    pub fn handle(&self, request: &[u8]) -> KilnResult<Vec<u8>> {
        let response = match LookupRequest::decode(request) {
            Ok(request) => self.respond(&request),
            Err(e) => {
                warn!(target: "kiln::service", error = %e, "Malformed lookup request");
                LookupResponse::Internal(format!("malformed request: {}", e))
            }
        };
        response.encode()
    }

    /// Resolve one decoded request
    pub fn respond(&self, request: &LookupRequest) -> LookupResponse {
        debug!(target: "kiln::service", ?request, "Serving lookup");
        let lease = match request {
            LookupRequest::ByKey { key, .. } => self.cache.acquire_by_key(key),
            LookupRequest::ByIdentity { uid, partition, .. } => self
                .cache
                .acquire_by_identity(ProgramIdentity::new(*uid, *partition)),
        };
        match lease {
            Ok(lease) => LookupResponse::Found {
                key: lease.key().clone(),
                identity: lease.identity(),
                program: lease.program().clone(),
            },
            Err(KilnError::NotFound { what }) => LookupResponse::NotFound(what),
            Err(KilnError::Unavailable { reason }) => LookupResponse::Unavailable(reason),
            Err(other) => LookupResponse::Internal(other.to_string()),
        }
    }
}

/// Transport that calls a `LookupService` directly
///
/// Requests and responses are still fully encoded. `disconnect` simulates
/// the peer going away.
#[derive(Default)]
pub struct LoopbackTransport {
    peer: RwLock<Option<Arc<LookupService>>>,
}

impl LoopbackTransport {
    /// Connected to `service`
    pub fn new(service: Arc<LookupService>) -> Self {
        LoopbackTransport {
            peer: RwLock::new(Some(service)),
        }
    }

    /// Attach (or replace) the serving peer
    pub fn connect(&self, service: Arc<LookupService>) {
        *self.peer.write() = Some(service);
    }

    /// Drop the serving peer
    pub fn disconnect(&self) {
        *self.peer.write() = None;
    }

    /// True while a peer is attached
    pub fn is_connected(&self) -> bool {
        self.peer.read().is_some()
    }
}

impl LookupTransport for LoopbackTransport {
    fn round_trip(&self, request: Vec<u8>) -> KilnResult<Vec<u8>> {
        let peer = self
            .peer
            .read()
            .clone()
            .ok_or_else(|| KilnError::unavailable("loopback peer disconnected"))?;
        peer.handle(&request)
    }

    fn peer(&self) -> String {
        if self.is_connected() {
            "loopback".to_string()
        } else {
            "loopback (disconnected)".to_string()
        }
    }
}
