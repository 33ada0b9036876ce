//! Per-owner ordered key list
//!
//! New keys are appended at the end. Removal keeps the relative order of the
//! remaining keys, so every key after the removed one moves down by exactly
//! one position and every key before it keeps its index.

use super::EntryId;
use serde::{Deserialize, Serialize};

/// Ordered entry ids owned by one identity
///
/// The count reported for an owner is always `len()`; there is no separate
/// counter to drift.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerKeys {
    ids: Vec<EntryId>,
}

impl OwnerKeys {
    /// Empty key list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry at the end
    pub fn push(&mut self, id: EntryId) {
        self.ids.push(id);
    }

    /// Remove an entry, shifting later positions down by one.
    ///
    /// Returns false if the id was not present.
    pub fn remove(&mut self, id: EntryId) -> bool {
        match self.position(id) {
            Some(pos) => {
                self.ids.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Entry id at `index`
    pub fn get(&self, index: usize) -> Option<EntryId> {
        self.ids.get(index).copied()
    }

    /// Position of `id` in the list
    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.ids.iter().position(|x| *x == id)
    }

    /// Number of keys owned
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True if the owner holds no keys
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate ids in index order
    pub fn iter(&self) -> impl Iterator<Item = EntryId> + '_ {
        self.ids.iter().copied()
    }
}
