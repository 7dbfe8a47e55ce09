//! Error types for kiln
//!
//! This module defines the error taxonomy shared by the cache and the lookup
//! layer. We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.
//!
//! A requested fetch target that the compilation never produced is NOT an
//! error: it surfaces as an absent executable inside a successful lookup.

use std::io;
use thiserror::Error;

/// Result type alias for kiln operations
pub type KilnResult<T> = std::result::Result<T, KilnError>;

/// Error types for the compiled-program cache and its lookup layer
#[derive(Debug, Error)]
pub enum KilnError {
    /// No entry exists for the requested key or identity
    #[error("Not found: {what}")]
    NotFound {
        /// Description of what was looked up
        what: String,
    },

    /// Backing store unreachable or torn down
    #[error("Unavailable: {reason}")]
    Unavailable {
        /// Why the backing store could not be used
        reason: String,
    },

    /// Backing store answered but is in an invalid state
    #[error("Internal error: {reason}")]
    Internal {
        /// Description of the invalid state
        reason: String,
    },

    /// Caller supplied an invalid argument
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input
        reason: String,
    },

    /// An entry with the same key or identity is already cached
    #[error("Already exists: {what}")]
    AlreadyExists {
        /// Description of the conflicting entry
        what: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O error (config files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl KilnError {
    /// Create a `NotFound` error
    pub fn not_found(what: impl Into<String>) -> Self {
        KilnError::NotFound { what: what.into() }
    }

    /// Create an `Unavailable` error
    pub fn unavailable(reason: impl Into<String>) -> Self {
        KilnError::Unavailable {
            reason: reason.into(),
        }
    }

    /// Create an `Internal` error
    pub fn internal(reason: impl Into<String>) -> Self {
        KilnError::Internal {
            reason: reason.into(),
        }
    }

    /// Create an `InvalidInput` error
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        KilnError::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create an `AlreadyExists` error
    pub fn already_exists(what: impl Into<String>) -> Self {
        KilnError::AlreadyExists { what: what.into() }
    }

    /// True for `NotFound`
    pub fn is_not_found(&self) -> bool {
        matches!(self, KilnError::NotFound { .. })
    }

    /// True for `Unavailable`
    pub fn is_unavailable(&self) -> bool {
        matches!(self, KilnError::Unavailable { .. })
    }

    /// True for `Internal` and `Serialization`
    pub fn is_internal(&self) -> bool {
        matches!(self, KilnError::Internal { .. } | KilnError::Serialization(_))
    }
}

impl From<bincode::Error> for KilnError {
    fn from(e: bincode::Error) -> Self {
        KilnError::Serialization(e.to_string())
    }
}
