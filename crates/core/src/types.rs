//! Addressing types for cached programs
//!
//! A cached program can be addressed two ways:
//! - `ProgramKey`: an opaque, non-empty string assigned by the compiler
//! - `ProgramIdentity`: a numeric compilation uid plus a partition index
//!
//! Both resolve into the same entry space. `FetchTarget` selects which of the
//! (up to three) executables of one compilation a lookup resolves.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{KilnError, KilnResult};

/// Unique identifier assigned per distinct compilation
pub type ProgramUid = u64;

/// Index of one model-parallel partition produced by a compilation
pub type PartitionIndex = u32;

/// String key identifying one compiled subgraph instance
///
/// Immutable once created. Never empty, including when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProgramKey(String);

impl ProgramKey {
    /// Create a key, rejecting the empty string
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `key` is empty.
    pub fn new(key: impl Into<String>) -> KilnResult<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(KilnError::invalid_input("program key must not be empty"));
        }
        Ok(ProgramKey(key))
    }

    /// Key for one partition of a compilation: `"{prefix}:{partition}"`
    pub fn for_partition(prefix: &str, partition: PartitionIndex) -> KilnResult<Self> {
        if prefix.is_empty() {
            return Err(KilnError::invalid_input("program key prefix must not be empty"));
        }
        Ok(ProgramKey(format!("{}:{}", prefix, partition)))
    }

    /// Borrow the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProgramKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProgramKey {
    type Err = KilnError;

    fn from_str(s: &str) -> KilnResult<Self> {
        ProgramKey::new(s)
    }
}

impl TryFrom<String> for ProgramKey {
    type Error = KilnError;

    fn try_from(key: String) -> KilnResult<Self> {
        ProgramKey::new(key)
    }
}

impl From<ProgramKey> for String {
    fn from(key: ProgramKey) -> Self {
        key.0
    }
}

impl AsRef<str> for ProgramKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Composite (uid, partition) address of one cached program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProgramIdentity {
    /// Compilation uid
    pub uid: ProgramUid,
    /// Partition within the compilation
    pub partition: PartitionIndex,
}

impl ProgramIdentity {
    /// Create an identity
    pub fn new(uid: ProgramUid, partition: PartitionIndex) -> Self {
        ProgramIdentity { uid, partition }
    }
}

impl fmt::Display for ProgramIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "uid={} partition={}", self.uid, self.partition)
    }
}

/// Which executable of a compilation a lookup resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FetchTarget {
    /// The primary program
    #[default]
    Main,
    /// Companion that redistributes inputs across partitions
    Sharding,
    /// Companion that gathers outputs back from partitions
    Unsharding,
}

impl FetchTarget {
    /// All targets, main first
    pub const ALL: [FetchTarget; 3] = [
        FetchTarget::Main,
        FetchTarget::Sharding,
        FetchTarget::Unsharding,
    ];

    /// Lowercase name used in config files and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchTarget::Main => "main",
            FetchTarget::Sharding => "sharding",
            FetchTarget::Unsharding => "unsharding",
        }
    }
}

impl fmt::Display for FetchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FetchTarget {
    type Err = KilnError;

    fn from_str(s: &str) -> KilnResult<Self> {
        match s {
            "main" => Ok(FetchTarget::Main),
            "sharding" => Ok(FetchTarget::Sharding),
            "unsharding" => Ok(FetchTarget::Unsharding),
            other => Err(KilnError::invalid_input(format!(
                "unknown fetch target '{}', expected \"main\", \"sharding\" or \"unsharding\"",
                other
            ))),
        }
    }
}
