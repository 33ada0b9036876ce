//! Entry lifecycle handlers.

use std::sync::Arc;

use keyreg_core::Identity;
use keyreg_engine::Registry;

use crate::convert::convert_result;
use crate::types::EntryInfo;
use crate::{Output, Result};

/// Handle CreateEntry command.
pub fn create_entry(
    reg: &Arc<Registry>,
    caller: &Identity,
    key: String,
    value: String,
) -> Result<Output> {
    convert_result(reg.create_entry(caller, &key, &value))?;
    Ok(Output::Unit)
}

/// Handle GetEntry command.
pub fn get_entry(reg: &Arc<Registry>, key: String) -> Result<Output> {
    let entry = convert_result(reg.get_entry(&key))?;
    Ok(Output::Entry(EntryInfo::from(entry)))
}

/// Handle UpdateEntry command.
pub fn update_entry(
    reg: &Arc<Registry>,
    caller: &Identity,
    key: String,
    value: String,
) -> Result<Output> {
    convert_result(reg.update_entry(caller, &key, &value))?;
    Ok(Output::Unit)
}

/// Handle DeleteEntry command.
pub fn delete_entry(reg: &Arc<Registry>, caller: &Identity, key: String) -> Result<Output> {
    convert_result(reg.delete_entry(caller, &key))?;
    Ok(Output::Unit)
}

/// Handle TransferEntry command.
pub fn transfer_entry(
    reg: &Arc<Registry>,
    caller: &Identity,
    key: String,
    new_owner: Identity,
) -> Result<Output> {
    convert_result(reg.transfer_entry(caller, &key, &new_owner))?;
    Ok(Output::Unit)
}
