//! Lookup request/response messages
//!
//! Encoded with bincode. Both sides of a transport link against this module,
//! so there is no separate schema.

use kiln_core::{
    CompiledProgram, FetchTarget, KilnResult, PartitionIndex, ProgramIdentity, ProgramKey,
    ProgramUid,
};
use serde::{Deserialize, Serialize};

/// A lookup sent to the peer hosting the cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookupRequest {
    /// Resolve by program key
    ByKey {
        /// Key to resolve
        key: ProgramKey,
        /// Requested executable
        target: FetchTarget,
    },
    /// Resolve by compilation uid and partition
    ByIdentity {
        /// Compilation uid
        uid: ProgramUid,
        /// Partition index
        partition: PartitionIndex,
        /// Requested executable
        target: FetchTarget,
    },
}

impl LookupRequest {
    /// The requested target
    pub fn target(&self) -> FetchTarget {
        match self {
            LookupRequest::ByKey { target, .. } | LookupRequest::ByIdentity { target, .. } => {
                *target
            }
        }
    }

    /// True if an entry stored under `key` and `identity` answers this request
    pub fn matches(&self, key: &ProgramKey, identity: ProgramIdentity) -> bool {
        match self {
            LookupRequest::ByKey { key: wanted, .. } => wanted == key,
            LookupRequest::ByIdentity { uid, partition, .. } => {
                identity == ProgramIdentity::new(*uid, *partition)
            }
        }
    }

    /// Short description of what is being resolved, for errors and logs
    pub fn describe(&self) -> String {
        match self {
            LookupRequest::ByKey { key, .. } => format!("by key '{}'", key),
            LookupRequest::ByIdentity { uid, partition, .. } => {
                format!("by {}", ProgramIdentity::new(*uid, *partition))
            }
        }
    }

    /// Encode for the transport
    pub fn encode(&self) -> KilnResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a received request
    pub fn decode(bytes: &[u8]) -> KilnResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// The peer's answer to a `LookupRequest`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookupResponse {
    /// Entry found; the whole program is shipped back
    Found {
        /// Key of the entry
        key: ProgramKey,
        /// Identity of the entry
        identity: ProgramIdentity,
        /// Copy of the cached program
        program: CompiledProgram,
    },
    /// No entry for the request
    NotFound(String),
    /// The peer's cache is torn down
    Unavailable(String),
    /// The peer could not process the request
    Internal(String),
}

impl LookupResponse {
    /// Encode for the transport
    pub fn encode(&self) -> KilnResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a received response
    pub fn decode(bytes: &[u8]) -> KilnResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}
