//! Registry state container
//!
//! All registry data lives in one owned `RegistryState`:
//!
//! - an arena of entry slots addressed by `EntryId`, with a free list
//! - `by_key`: key -> entry id
//! - `owners`: owner -> ordered entry ids (`OwnerKeys`)
//! - the moderator set, the admin, and the pause flag
//!
//! The primary map and both indices are only changed together, inside
//! [`RegistryState::apply`]. `apply` checks every precondition before it
//! touches anything, so an `ApplyError` leaves the state exactly as it was.

mod owner_index;

pub use owner_index::OwnerKeys;

use crate::mutation::Mutation;
use keyreg_core::{Entry, Identity, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

/// Opaque arena slot handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    /// Wrap a raw slot number
    pub const fn new(raw: u64) -> Self {
        EntryId(raw)
    }

    fn slot(self) -> usize {
        self.0 as usize
    }
}

/// A mutation that does not fit the current state.
///
/// Live calls are validated before they are logged, so this only surfaces
/// when replaying a log that disagrees with its snapshot.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApplyError {
    /// Sequence numbers must advance by exactly one
    #[error("sequence {got} does not follow {last}")]
    OutOfSequence {
        /// Last applied sequence
        last: u64,
        /// Sequence of the rejected mutation
        got: u64,
    },

    /// Created for a key that already exists
    #[error("key '{0}' already exists")]
    KeyExists(String),

    /// Mutation targets a key that does not exist
    #[error("no entry for key '{0}'")]
    MissingEntry(String),
}

/// The whole registry: entries, indices, moderators, admin, pause flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryState {
    admin: Identity,
    paused: bool,
    moderators: BTreeSet<Identity>,
    slots: Vec<Option<Entry>>,
    free: Vec<EntryId>,
    by_key: HashMap<String, EntryId>,
    owners: HashMap<Identity, OwnerKeys>,
    last_timestamp: Timestamp,
    last_sequence: u64,
}

impl RegistryState {
    /// Empty registry with a fixed admin
    pub fn new(admin: Identity) -> Self {
        RegistryState {
            admin,
            paused: false,
            moderators: BTreeSet::new(),
            slots: Vec::new(),
            free: Vec::new(),
            by_key: HashMap::new(),
            owners: HashMap::new(),
            last_timestamp: Timestamp::ZERO,
            last_sequence: 0,
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// The admin fixed at construction
    pub fn admin(&self) -> &Identity {
        &self.admin
    }

    /// Global pause flag
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Membership in the moderator set
    pub fn is_moderator(&self, who: &Identity) -> bool {
        self.moderators.contains(who)
    }

    /// Moderators in sorted order
    pub fn moderators(&self) -> impl Iterator<Item = &Identity> {
        self.moderators.iter()
    }

    /// Look up an entry by key
    pub fn entry(&self, key: &str) -> Option<&Entry> {
        let id = self.by_key.get(key)?;
        self.slots.get(id.slot())?.as_ref()
    }

    /// Number of live entries
    pub fn entry_count(&self) -> usize {
        self.by_key.len()
    }

    /// Number of identities owning at least one key
    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }

    /// Number of keys owned by `owner` (0 for unknown owners)
    pub fn key_count(&self, owner: &Identity) -> usize {
        self.owners.get(owner).map_or(0, OwnerKeys::len)
    }

    /// Key at `index` in `owner`'s index
    pub fn key_by_owner(&self, owner: &Identity, index: usize) -> Option<&str> {
        let id = self.owners.get(owner)?.get(index)?;
        self.slots
            .get(id.slot())?
            .as_ref()
            .map(|entry| entry.key.as_str())
    }

    /// All keys owned by `owner`, in index order
    pub fn keys_by_owner(&self, owner: &Identity) -> Vec<String> {
        let Some(keys) = self.owners.get(owner) else {
            return Vec::new();
        };
        keys.iter()
            .filter_map(|id| self.slots.get(id.slot())?.as_ref())
            .map(|entry| entry.key.clone())
            .collect()
    }

    /// Marker of the most recent committed mutation
    pub fn last_timestamp(&self) -> Timestamp {
        self.last_timestamp
    }

    /// Sequence number of the most recent committed mutation
    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    // ========================================================================
    // Application
    // ========================================================================

    /// Apply one mutation at `sequence`, stamping entries with `at`.
    ///
    /// Either the whole mutation takes effect or, on error, nothing does.
    pub fn apply(
        &mut self,
        sequence: u64,
        at: Timestamp,
        mutation: &Mutation,
    ) -> Result<(), ApplyError> {
        if sequence != self.last_sequence + 1 {
            return Err(ApplyError::OutOfSequence {
                last: self.last_sequence,
                got: sequence,
            });
        }
        if let Some(key) = mutation.key() {
            let exists = self.by_key.contains_key(key);
            match mutation {
                Mutation::Created { .. } if exists => {
                    return Err(ApplyError::KeyExists(key.to_string()))
                }
                Mutation::Created { .. } => {}
                _ if !exists => return Err(ApplyError::MissingEntry(key.to_string())),
                _ => {}
            }
        }

        match mutation {
            Mutation::Created { key, value, owner } => {
                self.insert(Entry::new(key.clone(), value.clone(), owner.clone(), at));
            }
            Mutation::Updated { key, value } => {
                if let Some(entry) = self.entry_mut(key) {
                    entry.value = value.clone();
                    entry.version = entry.version.next();
                    entry.updated_at = at;
                }
            }
            Mutation::Deleted { key } => self.remove(key),
            Mutation::Transferred { key, new_owner } => self.transfer(key, new_owner, at),
            Mutation::PauseSet { paused } => self.paused = *paused,
            Mutation::ModeratorAdded { identity } => {
                self.moderators.insert(identity.clone());
            }
            Mutation::ModeratorRemoved { identity } => {
                self.moderators.remove(identity);
            }
            Mutation::FreezeSet { key, frozen } => {
                if let Some(entry) = self.entry_mut(key) {
                    entry.frozen = *frozen;
                }
            }
        }

        self.last_sequence = sequence;
        self.last_timestamp = self.last_timestamp.max(at);
        Ok(())
    }

    fn entry_mut(&mut self, key: &str) -> Option<&mut Entry> {
        let id = *self.by_key.get(key)?;
        self.slots.get_mut(id.slot())?.as_mut()
    }

    fn insert(&mut self, entry: Entry) {
        let id = match self.free.pop() {
            Some(id) => id,
            None => {
                self.slots.push(None);
                EntryId::new(self.slots.len() as u64 - 1)
            }
        };
        self.by_key.insert(entry.key.clone(), id);
        self.owners.entry(entry.owner.clone()).or_default().push(id);
        self.slots[id.slot()] = Some(entry);
    }

    fn remove(&mut self, key: &str) {
        let Some(id) = self.by_key.remove(key) else {
            return;
        };
        if let Some(entry) = self.slots.get_mut(id.slot()).and_then(Option::take) {
            self.unlink_owner(&entry.owner, id);
        }
        self.free.push(id);
    }

    fn transfer(&mut self, key: &str, new_owner: &Identity, at: Timestamp) {
        let Some(id) = self.by_key.get(key).copied() else {
            return;
        };
        let Some(entry) = self.slots.get_mut(id.slot()).and_then(Option::as_mut) else {
            return;
        };
        entry.updated_at = at;
        if &entry.owner == new_owner {
            return;
        }
        let old_owner = std::mem::replace(&mut entry.owner, new_owner.clone());
        self.unlink_owner(&old_owner, id);
        self.owners.entry(new_owner.clone()).or_default().push(id);
    }

    fn unlink_owner(&mut self, owner: &Identity, id: EntryId) {
        if let Some(keys) = self.owners.get_mut(owner) {
            keys.remove(id);
            if keys.is_empty() {
                self.owners.remove(owner);
            }
        }
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    /// Encode the full state for a checkpoint snapshot
    pub fn to_bytes(&self) -> Result<Vec<u8>, rmp_serde::encode::Error> {
        rmp_serde::to_vec_named(self)
    }

    /// Decode a checkpoint snapshot payload
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, rmp_serde::decode::Error> {
        rmp_serde::from_slice(bytes)
    }

    /// Cross-check the primary map against both indices.
    ///
    /// Used on snapshot load and in tests. Returns a description of the
    /// first inconsistency found.
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut indexed = 0usize;
        for (owner, keys) in &self.owners {
            if keys.is_empty() {
                return Err(format!("owner '{}' has an empty index", owner));
            }
            for id in keys.iter() {
                let entry = self
                    .slots
                    .get(id.slot())
                    .and_then(Option::as_ref)
                    .ok_or_else(|| format!("owner '{}' indexes empty slot {:?}", owner, id))?;
                if &entry.owner != owner {
                    return Err(format!(
                        "key '{}' indexed under '{}' but owned by '{}'",
                        entry.key, owner, entry.owner
                    ));
                }
                indexed += 1;
            }
        }
        if indexed != self.by_key.len() {
            return Err(format!(
                "owner indices hold {} keys but {} entries exist",
                indexed,
                self.by_key.len()
            ));
        }

        for (key, id) in &self.by_key {
            let entry = self
                .slots
                .get(id.slot())
                .and_then(Option::as_ref)
                .ok_or_else(|| format!("key '{}' points at empty slot {:?}", key, id))?;
            if &entry.key != key {
                return Err(format!("key '{}' points at entry '{}'", key, entry.key));
            }
            let positions = self
                .owners
                .get(&entry.owner)
                .map_or(0, |keys| keys.iter().filter(|x| x == id).count());
            if positions != 1 {
                return Err(format!(
                    "key '{}' appears {} times in its owner's index",
                    key, positions
                ));
            }
            if entry.version.as_u64() < 1 || entry.updated_at < entry.created_at {
                return Err(format!("entry '{}' has inconsistent metadata", key));
            }
            if entry.updated_at > self.last_timestamp {
                return Err(format!("entry '{}' is newer than the last commit", key));
            }
        }

        for id in &self.free {
            if matches!(self.slots.get(id.slot()), Some(Some(_))) {
                return Err(format!("free slot {:?} is occupied", id));
            }
        }
        Ok(())
    }
}
