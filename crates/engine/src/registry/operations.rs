//! Registry call surface
//!
//! Check order for each mutating call (first failing check wins):
//!
//! | Call | Checks |
//! |------|--------|
//! | `create_entry` | key, value (`InvalidArgument`) -> pause -> duplicate |
//! | `update_entry` | exists -> owner -> frozen -> value |
//! | `delete_entry`, `transfer_entry` | exists -> owner -> frozen |
//! | `set_key_frozen` | exists -> moderator |
//! | `set_paused`, `add_moderator`, `remove_moderator` | admin |

use super::Registry;
use crate::mutation::Mutation;
use crate::state::RegistryState;
use keyreg_core::{validate_key, Entry, Identity, RegistryError, RegistryResult};
use tracing::debug;

impl Registry {
    /// Validate against the locked state, then commit the planned mutation.
    fn mutate<F>(&self, op: &'static str, caller: &Identity, plan: F) -> RegistryResult<()>
    where
        F: FnOnce(&RegistryState) -> RegistryResult<Mutation>,
    {
        let mut inner = self.inner.lock();
        let mutation = match plan(&inner.state) {
            Ok(mutation) => mutation,
            Err(e) => {
                debug!(target: "keyreg::engine", op, caller = %caller, error = %e, "Rejected");
                return Err(e);
            }
        };
        self.commit(&mut inner, caller, mutation)
    }

    // ========================================================================
    // Entry lifecycle
    // ========================================================================

    /// Register `key` with `value`, owned by `caller`.
    ///
    /// The new entry starts at version 1, unfrozen, and is appended to the
    /// end of `caller`'s owner index.
    pub fn create_entry(&self, caller: &Identity, key: &str, value: &str) -> RegistryResult<()> {
        self.mutate("create_entry", caller, |state| {
            validate_key(key, &self.limits)?;
            self.limits.validate_value(value)?;
            if state.is_paused() {
                return Err(RegistryError::AlreadyPaused);
            }
            if state.entry(key).is_some() {
                return Err(RegistryError::DuplicateKey {
                    key: key.to_string(),
                });
            }
            Ok(Mutation::Created {
                key: key.to_string(),
                value: value.to_string(),
                owner: caller.clone(),
            })
        })
    }

    /// Replace the value of an entry the caller owns, bumping its version.
    pub fn update_entry(&self, caller: &Identity, key: &str, value: &str) -> RegistryResult<()> {
        self.mutate("update_entry", caller, |state| {
            owned_and_unfrozen(state, caller, key, "update")?;
            self.limits.validate_value(value)?;
            Ok(Mutation::Updated {
                key: key.to_string(),
                value: value.to_string(),
            })
        })
    }

    /// Remove an entry the caller owns.
    ///
    /// Later keys in the owner's index move down one position.
    pub fn delete_entry(&self, caller: &Identity, key: &str) -> RegistryResult<()> {
        self.mutate("delete_entry", caller, |state| {
            owned_and_unfrozen(state, caller, key, "delete")?;
            Ok(Mutation::Deleted {
                key: key.to_string(),
            })
        })
    }

    /// Hand an entry the caller owns to `new_owner`.
    ///
    /// Value and version are unchanged; `updated_at` is refreshed. The key
    /// is appended to `new_owner`'s index. Transferring to the current owner
    /// leaves the key where it is.
    pub fn transfer_entry(
        &self,
        caller: &Identity,
        key: &str,
        new_owner: &Identity,
    ) -> RegistryResult<()> {
        self.mutate("transfer_entry", caller, |state| {
            owned_and_unfrozen(state, caller, key, "transfer")?;
            Ok(Mutation::Transferred {
                key: key.to_string(),
                new_owner: new_owner.clone(),
            })
        })
    }

    // ========================================================================
    // Administration and moderation
    // ========================================================================

    /// Set the global pause flag (admin only). Pausing blocks creation only.
    pub fn set_paused(&self, caller: &Identity, paused: bool) -> RegistryResult<()> {
        self.mutate("set_paused", caller, |state| {
            require_admin(state, caller, "set the pause flag")?;
            Ok(Mutation::PauseSet { paused })
        })
    }

    /// Grant freeze authority (admin only, idempotent).
    pub fn add_moderator(&self, caller: &Identity, identity: &Identity) -> RegistryResult<()> {
        self.mutate("add_moderator", caller, |state| {
            require_admin(state, caller, "add a moderator")?;
            Ok(Mutation::ModeratorAdded {
                identity: identity.clone(),
            })
        })
    }

    /// Revoke freeze authority (admin only, idempotent).
    pub fn remove_moderator(&self, caller: &Identity, identity: &Identity) -> RegistryResult<()> {
        self.mutate("remove_moderator", caller, |state| {
            require_admin(state, caller, "remove a moderator")?;
            Ok(Mutation::ModeratorRemoved {
                identity: identity.clone(),
            })
        })
    }

    /// Set an entry's freeze flag (moderators only).
    ///
    /// Ownership grants nothing here: an owner who is not a moderator cannot
    /// freeze or unfreeze their own entry.
    pub fn set_key_frozen(&self, caller: &Identity, key: &str, frozen: bool) -> RegistryResult<()> {
        self.mutate("set_key_frozen", caller, |state| {
            if state.entry(key).is_none() {
                return Err(RegistryError::not_found(key));
            }
            if !state.is_moderator(caller) {
                return Err(RegistryError::forbidden(
                    caller,
                    format!("change the freeze flag of {}", key),
                ));
            }
            Ok(Mutation::FreezeSet {
                key: key.to_string(),
                frozen,
            })
        })
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Snapshot of one entry. No authorization required.
    pub fn get_entry(&self, key: &str) -> RegistryResult<Entry> {
        self.inner
            .lock()
            .state
            .entry(key)
            .cloned()
            .ok_or_else(|| RegistryError::not_found(key))
    }

    /// Number of keys `owner` holds (0 if none)
    pub fn get_key_count(&self, owner: &Identity) -> u64 {
        self.inner.lock().state.key_count(owner) as u64
    }

    /// Key at `index` in `owner`'s index.
    ///
    /// # Errors
    ///
    /// `OutOfRange` if `index >= get_key_count(owner)`.
    pub fn get_key_by_owner(&self, owner: &Identity, index: u64) -> RegistryResult<String> {
        let inner = self.inner.lock();
        let count = inner.state.key_count(owner) as u64;
        let out_of_range = || RegistryError::OutOfRange {
            owner: owner.clone(),
            index,
            count,
        };
        let slot = usize::try_from(index).map_err(|_| out_of_range())?;
        inner
            .state
            .key_by_owner(owner, slot)
            .map(str::to_string)
            .ok_or_else(out_of_range)
    }

    /// Every key `owner` holds, in index order
    pub fn keys_by_owner(&self, owner: &Identity) -> Vec<String> {
        self.inner.lock().state.keys_by_owner(owner)
    }

    /// Whether `identity` is a moderator
    pub fn is_moderator(&self, identity: &Identity) -> bool {
        self.inner.lock().state.is_moderator(identity)
    }

    /// All moderators, sorted
    pub fn moderators(&self) -> Vec<Identity> {
        self.inner.lock().state.moderators().cloned().collect()
    }

    /// Global pause flag
    pub fn is_paused(&self) -> bool {
        self.inner.lock().state.is_paused()
    }

    /// The admin fixed at construction
    pub fn admin(&self) -> Identity {
        self.inner.lock().state.admin().clone()
    }

    /// Number of live entries
    pub fn entry_count(&self) -> u64 {
        self.inner.lock().state.entry_count() as u64
    }

    /// Number of identities owning at least one key
    pub fn owner_count(&self) -> u64 {
        self.inner.lock().state.owner_count() as u64
    }
}

/// NotFound -> Forbidden -> Frozen, shared by update, delete, and transfer
fn owned_and_unfrozen<'s>(
    state: &'s RegistryState,
    caller: &Identity,
    key: &str,
    action: &str,
) -> RegistryResult<&'s Entry> {
    let entry = state
        .entry(key)
        .ok_or_else(|| RegistryError::not_found(key))?;
    if !entry.is_owned_by(caller) {
        return Err(RegistryError::forbidden(caller, format!("{} {}", action, key)));
    }
    if entry.frozen {
        return Err(RegistryError::Frozen {
            key: key.to_string(),
        });
    }
    Ok(entry)
}

fn require_admin(state: &RegistryState, caller: &Identity, action: &str) -> RegistryResult<()> {
    if state.admin() != caller {
        return Err(RegistryError::forbidden(caller, action));
    }
    Ok(())
}
