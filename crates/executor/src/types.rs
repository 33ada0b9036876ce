//! Supporting types for commands and outputs.
//!
//! These types are used in output values and executor configuration.
//! All output types are serializable for cross-language use.

use keyreg_core::{Entry, Identity};
use serde::{Deserialize, Serialize};

// =============================================================================
// Entry Types
// =============================================================================

/// Read-only view of one entry, as returned by `GetEntry`.
///
/// Markers and version are flattened to plain integers so the value
/// serializes the same way in every host language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryInfo {
    /// The entry's key
    pub key: String,
    /// Current value
    pub value: String,
    /// Current owner
    pub owner: Identity,
    /// Marker at creation
    pub created_at: u64,
    /// Marker at the last update or transfer
    pub updated_at: u64,
    /// Starts at 1, bumped by each update
    pub version: u64,
    /// Whether a moderator has frozen the entry
    pub frozen: bool,
}

impl From<Entry> for EntryInfo {
    fn from(entry: Entry) -> Self {
        EntryInfo {
            key: entry.key,
            value: entry.value,
            owner: entry.owner,
            created_at: entry.created_at.as_u64(),
            updated_at: entry.updated_at.as_u64(),
            version: entry.version.as_u64(),
            frozen: entry.frozen,
        }
    }
}

// =============================================================================
// Registry Types
// =============================================================================

/// Registry summary returned by `Info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryInfo {
    /// Crate version of the executor
    pub version: String,
    /// Administrative identity
    pub admin: Identity,
    /// Whether creation is paused
    pub paused: bool,
    /// Live entries
    pub entry_count: u64,
    /// Identities owning at least one key
    pub owner_count: u64,
    /// Size of the moderator set
    pub moderator_count: u64,
    /// Sequence number of the last committed mutation
    pub last_sequence: u64,
    /// Durability mode in effect
    pub durability: String,
}

// =============================================================================
// Access Control
// =============================================================================

/// Controls whether an executor allows mutating commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccessMode {
    /// Allow both reads and writes (default).
    #[default]
    ReadWrite,
    /// Read-only mode: every mutating command returns `AccessDenied`.
    ReadOnly,
}
