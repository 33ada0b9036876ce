//! Owner index handlers and key composition.

use std::sync::Arc;

use keyreg_core::{concat_keys, Identity};
use keyreg_engine::Registry;

use crate::convert::convert_result;
use crate::{Output, Result};

/// Handle GetKeyCount command.
pub fn get_key_count(reg: &Arc<Registry>, owner: Identity) -> Result<Output> {
    Ok(Output::Uint(reg.get_key_count(&owner)))
}

/// Handle GetKeyByOwner command.
pub fn get_key_by_owner(reg: &Arc<Registry>, owner: Identity, index: u64) -> Result<Output> {
    let key = convert_result(reg.get_key_by_owner(&owner, index))?;
    Ok(Output::Key(key))
}

/// Handle KeysByOwner command.
pub fn keys_by_owner(reg: &Arc<Registry>, owner: Identity) -> Result<Output> {
    Ok(Output::Keys(reg.keys_by_owner(&owner)))
}

/// Handle ConcatKeys command.
///
/// Uses the registry's limits, so a composed key is accepted here exactly
/// when `CreateEntry` would accept it.
pub fn concat(reg: &Arc<Registry>, a: String, b: String) -> Result<Output> {
    let key = convert_result(concat_keys(&a, &b, &reg.limits()))?;
    Ok(Output::Key(key))
}
