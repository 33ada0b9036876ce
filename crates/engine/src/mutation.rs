//! Committed state transitions
//!
//! Every successful mutating call is reduced to exactly one `Mutation`. The
//! same value is written to the WAL and then applied to the in-memory state,
//! so live calls and replay share one application path.
//!
//! Markers (`Timestamp`) and sequence numbers travel in the WAL record
//! header, not in the mutation itself.

use keyreg_core::Identity;
use serde::{Deserialize, Serialize};

/// A single validated state transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutation {
    /// New entry owned by `owner`, appended to the owner's index
    Created {
        /// New key
        key: String,
        /// Initial value
        value: String,
        /// Creating caller
        owner: Identity,
    },
    /// Value replaced, version bumped
    Updated {
        /// Target key
        key: String,
        /// Replacement value
        value: String,
    },
    /// Entry removed together with its owner-index position
    Deleted {
        /// Target key
        key: String,
    },
    /// Ownership moved to `new_owner`
    Transferred {
        /// Target key
        key: String,
        /// Receiving identity
        new_owner: Identity,
    },
    /// Global pause flag set
    PauseSet {
        /// New flag value
        paused: bool,
    },
    /// Identity granted freeze authority
    ModeratorAdded {
        /// Granted identity
        identity: Identity,
    },
    /// Identity's freeze authority revoked
    ModeratorRemoved {
        /// Revoked identity
        identity: Identity,
    },
    /// Per-entry freeze flag set
    FreezeSet {
        /// Target key
        key: String,
        /// New flag value
        frozen: bool,
    },
}

impl Mutation {
    /// Short name used in log lines
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::Created { .. } => "created",
            Mutation::Updated { .. } => "updated",
            Mutation::Deleted { .. } => "deleted",
            Mutation::Transferred { .. } => "transferred",
            Mutation::PauseSet { .. } => "pause_set",
            Mutation::ModeratorAdded { .. } => "moderator_added",
            Mutation::ModeratorRemoved { .. } => "moderator_removed",
            Mutation::FreezeSet { .. } => "freeze_set",
        }
    }

    /// Key touched by this mutation, if it targets an entry
    pub fn key(&self) -> Option<&str> {
        match self {
            Mutation::Created { key, .. }
            | Mutation::Updated { key, .. }
            | Mutation::Deleted { key }
            | Mutation::Transferred { key, .. }
            | Mutation::FreezeSet { key, .. } => Some(key.as_str()),
            Mutation::PauseSet { .. }
            | Mutation::ModeratorAdded { .. }
            | Mutation::ModeratorRemoved { .. } => None,
        }
    }

    /// Encode as a WAL payload (MessagePack with field names)
    pub fn encode(&self) -> Result<Vec<u8>, rmp_serde::encode::Error> {
        rmp_serde::to_vec_named(self)
    }

    /// Decode a WAL payload
    pub fn decode(bytes: &[u8]) -> Result<Self, rmp_serde::decode::Error> {
        rmp_serde::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_decodes_to_same_mutation() {
        let m = Mutation::Transferred {
            key: "hotline:region1".into(),
            new_owner: Identity::from("wallet_2"),
        };
        let bytes = m.encode().unwrap();
        assert_eq!(Mutation::decode(&bytes).unwrap(), m);
    }

    #[test]
    fn test_garbage_payload_rejected() {
        assert!(Mutation::decode(&[0xc1, 0x00, 0x13]).is_err());
    }

    #[test]
    fn test_key_accessor() {
        assert_eq!(
            Mutation::Deleted { key: "k1".into() }.key(),
            Some("k1")
        );
        assert_eq!(Mutation::PauseSet { paused: true }.key(), None);
    }
}
