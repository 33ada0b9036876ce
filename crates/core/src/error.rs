//! Error types for the registry
//!
//! Every registry call either commits a full state transition or returns one
//! of these errors with no partial effect. The first seven variants are the
//! call-rejection taxonomy; the rest only surface from persistence and
//! configuration paths.
//!
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use crate::types::Identity;
use std::io;
use thiserror::Error;

/// Result type alias for registry operations
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

/// Error types for the registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Malformed input (empty key, oversized key or value)
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the input
        reason: String,
    },

    /// Create targeted a key that already exists
    #[error("duplicate key: {key}")]
    DuplicateKey {
        /// The existing key
        key: String,
    },

    /// Operation targeted a key that does not exist
    #[error("key not found: {key}")]
    NotFound {
        /// The missing key
        key: String,
    },

    /// Caller lacks the authority the operation requires
    #[error("forbidden: {caller} may not {action}")]
    Forbidden {
        /// Identity that attempted the call
        caller: Identity,
        /// Short description of the refused action
        action: String,
    },

    /// Entry is frozen by a moderator
    #[error("entry is frozen: {key}")]
    Frozen {
        /// The frozen key
        key: String,
    },

    /// Creation is blocked by the global pause flag
    #[error("registry is paused")]
    AlreadyPaused,

    /// Indexed owner lookup past the owner's key count
    #[error("index {index} out of range for {owner} (count {count})")]
    OutOfRange {
        /// Owner whose index was queried
        owner: Identity,
        /// Requested position
        index: u64,
        /// Number of keys the owner holds
        count: u64,
    },

    /// Log or snapshot I/O failed
    #[error("storage error: {message}")]
    Storage {
        /// Underlying failure
        message: String,
    },

    /// Persisted data failed validation
    #[error("data corruption: {message}")]
    Corruption {
        /// What failed to validate
        message: String,
    },

    /// Configuration could not be read or is inconsistent
    #[error("configuration error: {message}")]
    Config {
        /// What was wrong
        message: String,
    },
}

impl RegistryError {
    /// Build an `InvalidArgument` error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        RegistryError::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Build a `Forbidden` error
    pub fn forbidden(caller: &Identity, action: impl Into<String>) -> Self {
        RegistryError::Forbidden {
            caller: caller.clone(),
            action: action.into(),
        }
    }

    /// Build a `NotFound` error
    pub fn not_found(key: impl Into<String>) -> Self {
        RegistryError::NotFound { key: key.into() }
    }

    /// Build a `Storage` error
    pub fn storage(message: impl Into<String>) -> Self {
        RegistryError::Storage {
            message: message.into(),
        }
    }

    /// Build a `Corruption` error
    pub fn corruption(message: impl Into<String>) -> Self {
        RegistryError::Corruption {
            message: message.into(),
        }
    }

    /// Build a `Config` error
    pub fn config(message: impl Into<String>) -> Self {
        RegistryError::Config {
            message: message.into(),
        }
    }

    /// True for the ordinary rejections of an invalid call, false for
    /// infrastructure failures.
    pub fn is_call_rejection(&self) -> bool {
        matches!(
            self,
            RegistryError::InvalidArgument { .. }
                | RegistryError::DuplicateKey { .. }
                | RegistryError::NotFound { .. }
                | RegistryError::Forbidden { .. }
                | RegistryError::Frozen { .. }
                | RegistryError::AlreadyPaused
                | RegistryError::OutOfRange { .. }
        )
    }
}

impl From<io::Error> for RegistryError {
    fn from(e: io::Error) -> Self {
        RegistryError::Storage {
            message: e.to_string(),
        }
    }
}
