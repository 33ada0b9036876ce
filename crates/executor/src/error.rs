//! Error types for command execution.
//!
//! All errors from command execution are represented by the [`Error`] enum.
//! These errors are:
//! - **Structured**: Each variant has typed fields for error details
//! - **Serializable**: Can be converted to/from JSON
//! - **Lossless**: Every engine error maps to exactly one variant with the
//!   same details

use serde::{Deserialize, Serialize};

/// Command execution errors.
///
/// # Categories
///
/// | Category | Variants | Description |
/// |----------|----------|-------------|
/// | Validation | `InvalidArgument` | Bad input |
/// | Existence | `DuplicateKey`, `NotFound`, `OutOfRange` | Entity does or doesn't exist |
/// | Authorization | `Forbidden`, `AccessDenied` | Caller or executor may not do this |
/// | Executor | `Internal` | Unexpected output shape |
/// | State | `Frozen`, `AlreadyPaused` | Blocked by a flag |
/// | System | `Storage`, `Corruption`, `Config` | Infrastructure errors |
///
/// # Example
///
/// ```
/// use keyreg_executor::{Command, Error, Executor, Registry};
///
/// let executor = Executor::new(Registry::ephemeral("admin"));
/// let caller = "wallet_2".into();
///
/// match executor.execute(&caller, Command::GetEntry { key: "nope".into() }) {
///     Err(Error::NotFound { key }) => assert_eq!(key, "nope"),
///     other => panic!("unexpected: {:?}", other),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    // ==================== Call Rejections ====================
    /// Malformed input (empty key, oversized key or value)
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Create on an existing key
    #[error("duplicate key: {key}")]
    DuplicateKey { key: String },

    /// Operation targets a nonexistent key
    #[error("key not found: {key}")]
    NotFound { key: String },

    /// Caller lacks the required authority
    #[error("forbidden: {caller} may not {action}")]
    Forbidden { caller: String, action: String },

    /// Mutation blocked by a freeze flag
    #[error("entry is frozen: {key}")]
    Frozen { key: String },

    /// Create blocked by the global pause flag
    #[error("registry is paused")]
    AlreadyPaused,

    /// Indexed lookup beyond the owner's key count
    #[error("index {index} out of range for {owner} (count {count})")]
    OutOfRange {
        owner: String,
        index: u64,
        count: u64,
    },

    // ==================== Executor ====================
    /// Mutating command sent to a read-only executor
    #[error("access denied: {command} is not allowed in read-only mode")]
    AccessDenied { command: String },

    /// Output variant did not match the command (a bug, not a user error)
    #[error("internal error: {reason}")]
    Internal { reason: String },

    // ==================== System ====================
    /// Log or snapshot I/O failed
    #[error("storage error: {message}")]
    Storage { message: String },

    /// Persisted data failed validation
    #[error("data corruption: {message}")]
    Corruption { message: String },

    /// Configuration could not be read or is inconsistent
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl Error {
    /// Stable variant name, for hosts that key on error kinds.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidArgument { .. } => "InvalidArgument",
            Error::DuplicateKey { .. } => "DuplicateKey",
            Error::NotFound { .. } => "NotFound",
            Error::Forbidden { .. } => "Forbidden",
            Error::Frozen { .. } => "Frozen",
            Error::AlreadyPaused => "AlreadyPaused",
            Error::OutOfRange { .. } => "OutOfRange",
            Error::AccessDenied { .. } => "AccessDenied",
            Error::Internal { .. } => "Internal",
            Error::Storage { .. } => "Storage",
            Error::Corruption { .. } => "Corruption",
            Error::Config { .. } => "Config",
        }
    }
}
