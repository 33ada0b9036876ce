//! Administration and moderation handlers.

use std::sync::Arc;

use keyreg_core::Identity;
use keyreg_engine::Registry;

use crate::convert::convert_result;
use crate::{Output, Result};

/// Handle SetPaused command.
pub fn set_paused(reg: &Arc<Registry>, caller: &Identity, paused: bool) -> Result<Output> {
    convert_result(reg.set_paused(caller, paused))?;
    Ok(Output::Unit)
}

/// Handle AddModerator command.
pub fn add_moderator(reg: &Arc<Registry>, caller: &Identity, identity: Identity) -> Result<Output> {
    convert_result(reg.add_moderator(caller, &identity))?;
    Ok(Output::Unit)
}

/// Handle RemoveModerator command.
pub fn remove_moderator(
    reg: &Arc<Registry>,
    caller: &Identity,
    identity: Identity,
) -> Result<Output> {
    convert_result(reg.remove_moderator(caller, &identity))?;
    Ok(Output::Unit)
}

/// Handle SetKeyFrozen command.
pub fn set_key_frozen(
    reg: &Arc<Registry>,
    caller: &Identity,
    key: String,
    frozen: bool,
) -> Result<Output> {
    convert_result(reg.set_key_frozen(caller, &key, frozen))?;
    Ok(Output::Unit)
}

/// Handle IsModerator command.
pub fn is_moderator(reg: &Arc<Registry>, identity: Identity) -> Result<Output> {
    Ok(Output::Bool(reg.is_moderator(&identity)))
}

/// Handle IsPaused command.
pub fn is_paused(reg: &Arc<Registry>) -> Result<Output> {
    Ok(Output::Bool(reg.is_paused()))
}
