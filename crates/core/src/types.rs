//! Registry record types
//!
//! - `Identity`: opaque caller handle supplied by the host
//! - `Entry`: one registered key-value record with ownership metadata

use crate::contract::{Timestamp, Version};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, already-authenticated caller handle
///
/// The registry compares identities for equality and uses them as map keys.
/// It never inspects their structure.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wrap a host-supplied handle
    pub fn new(handle: impl Into<String>) -> Self {
        Identity(handle.into())
    }

    /// The handle as presented by the host
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Identity(s.to_string())
    }
}

impl From<String> for Identity {
    fn from(s: String) -> Self {
        Identity(s)
    }
}

/// One registered key-value record
///
/// `created_at`, `updated_at` and `version` are assigned by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Globally unique, non-empty key
    pub key: String,
    /// Bounded text payload
    pub value: String,
    /// Current controlling principal
    pub owner: Identity,
    /// Marker at creation
    pub created_at: Timestamp,
    /// Marker at the last update or transfer
    pub updated_at: Timestamp,
    /// Starts at 1, bumped by each value update
    pub version: Version,
    /// Blocks update/delete/transfer while set
    pub frozen: bool,
}

impl Entry {
    /// A freshly created entry: version 1, not frozen
    pub fn new(key: String, value: String, owner: Identity, at: Timestamp) -> Self {
        Entry {
            key,
            value,
            owner,
            created_at: at,
            updated_at: at,
            version: Version::INITIAL,
            frozen: false,
        }
    }

    /// Check whether `who` currently owns this entry
    pub fn is_owned_by(&self, who: &Identity) -> bool {
        &self.owner == who
    }
}
